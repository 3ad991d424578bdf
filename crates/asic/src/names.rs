//! Member-name conventions of ASiC containers.
//!
//! Containers are classified purely by member names: signatures, manifests
//! and timestamps live under `META-INF/`, signed content lives outside it,
//! and the content type is declared by the `mimetype` member.

/// Name of the member declaring the container's content type.
pub const MIMETYPE: &str = "mimetype";

/// Fallback name for signed documents without a name.
pub const DETACHED_FILE: &str = "detached-file";

/// Prefix of the optional archive comment.
pub const MIME_TYPE_COMMENT: &str = "mimetype=";

pub const META_INF: &str = "META-INF/";

pub const MIME_TYPE_ASICS: &str = "application/vnd.etsi.asic-s+zip";
pub const MIME_TYPE_ASICE: &str = "application/vnd.etsi.asic-e+zip";

/// Extension of XAdES signature members.
pub const XML_EXTENSION: &str = ".xml";
/// Extension of CAdES signature members.
pub const P7S_EXTENSION: &str = ".p7s";
/// Extension of timestamp token members.
pub const TST_EXTENSION: &str = ".tst";

const SIGNATURE_MARKER: &str = "signature";
const TIMESTAMP_MARKER: &str = "timestamp";
const MANIFEST_MARKER: &str = "Manifest";
const XADES_MANIFEST: &str = "META-INF/manifest.xml";
const CADES_MANIFEST_PREFIX: &str = "META-INF/ASiCManifest";
const ARCHIVE_MANIFEST_PREFIX: &str = "META-INF/ASiCArchiveManifest";

/// Signature member of any scheme.
pub fn is_signature(name: &str) -> bool {
    name.starts_with(META_INF) && name.contains(SIGNATURE_MARKER) && !name.contains(MANIFEST_MARKER)
}

/// XAdES signature member (`META-INF/signatures*.xml`).
pub fn is_xades_signature(name: &str) -> bool {
    is_signature(name) && name.ends_with(XML_EXTENSION)
}

/// CAdES signature member (`META-INF/signature*.p7s`).
pub fn is_cades_signature(name: &str) -> bool {
    is_signature(name) && name.ends_with(P7S_EXTENSION)
}

pub fn is_timestamp(name: &str) -> bool {
    name.starts_with(META_INF) && name.contains(TIMESTAMP_MARKER) && name.ends_with(TST_EXTENSION)
}

/// `META-INF/manifest.xml`, the ODF-style manifest used with XAdES.
pub fn is_xades_manifest(name: &str) -> bool {
    name == XADES_MANIFEST
}

/// `META-INF/ASiCManifest*.xml`, used with CAdES.
pub fn is_cades_manifest(name: &str) -> bool {
    name.starts_with(CADES_MANIFEST_PREFIX) && name.ends_with(XML_EXTENSION)
}

pub fn is_archive_manifest(name: &str) -> bool {
    name.starts_with(ARCHIVE_MANIFEST_PREFIX) && name.ends_with(XML_EXTENSION)
}

pub fn is_mimetype(name: &str) -> bool {
    name == MIMETYPE
}

/// Directory entries end with a slash.
pub fn is_folder(name: &str) -> bool {
    name.ends_with('/')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_names() {
        assert!(is_signature("META-INF/signatures.xml"));
        assert!(is_signature("META-INF/signature001.p7s"));
        assert!(!is_signature("signatures.xml"));
        assert!(!is_signature("META-INF/ASiCManifest_signature.xml"));

        assert!(is_xades_signature("META-INF/signatures001.xml"));
        assert!(!is_xades_signature("META-INF/signature.p7s"));
        assert!(is_cades_signature("META-INF/signature.p7s"));
        assert!(!is_cades_signature("META-INF/signatures.xml"));
    }

    #[test]
    fn test_manifest_names() {
        assert!(is_xades_manifest("META-INF/manifest.xml"));
        assert!(!is_xades_manifest("META-INF/ASiCManifest001.xml"));
        assert!(is_cades_manifest("META-INF/ASiCManifest001.xml"));
        assert!(!is_cades_manifest("META-INF/manifest.xml"));
        assert!(is_archive_manifest("META-INF/ASiCArchiveManifest.xml"));
        assert!(!is_cades_manifest("META-INF/ASiCArchiveManifest.xml"));
    }

    #[test]
    fn test_other_names() {
        assert!(is_timestamp("META-INF/timestamp.tst"));
        assert!(!is_timestamp("META-INF/timestamp.xml"));
        assert!(is_mimetype("mimetype"));
        assert!(!is_mimetype("META-INF/mimetype"));
        assert!(is_folder("META-INF/"));
        assert!(!is_folder("doc.txt"));
    }
}
