//! Container extraction.
//!
//! Splits an existing container into categorized members. Extraction is a
//! collaborator seam: [`ArchiveExtractor`] can be implemented for any
//! scheme, and [`ZipContainerExtractor`] classifies members by the naming
//! rules of a [`SignatureProfile`].

use crate::document::{Document, InMemoryDocument, MimeType};
use crate::names;
use crate::profile::SignatureProfile;
use crate::Result;
use std::io::{Cursor, Read};
use tracing::{debug, trace};
use zip::ZipArchive;

/// Categorized members of a parsed container.
///
/// Every category keeps archive order. The default value is the empty
/// snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractResult {
    pub signature_documents: Vec<InMemoryDocument>,
    pub manifest_documents: Vec<InMemoryDocument>,
    pub archive_manifest_documents: Vec<InMemoryDocument>,
    pub timestamp_documents: Vec<InMemoryDocument>,
    pub signed_documents: Vec<InMemoryDocument>,
    pub mimetype_document: Option<InMemoryDocument>,
}

impl ExtractResult {
    /// Whether nothing was extracted.
    pub fn is_empty(&self) -> bool {
        self.signature_documents.is_empty()
            && self.manifest_documents.is_empty()
            && self.archive_manifest_documents.is_empty()
            && self.timestamp_documents.is_empty()
            && self.signed_documents.is_empty()
            && self.mimetype_document.is_none()
    }

    /// Content type declared by the `mimetype` member, if any.
    pub fn declared_mime_type(&self) -> Option<MimeType> {
        let mimetype = self.mimetype_document.as_ref()?;
        let value = String::from_utf8_lossy(mimetype.bytes()).trim().to_string();
        Some(MimeType::new(value))
    }
}

/// Parses a container into an [`ExtractResult`].
pub trait ArchiveExtractor {
    fn extract(&self, archive: &dyn Document) -> Result<ExtractResult>;
}

/// ZIP extractor classifying members by a profile's naming rules.
///
/// Directories and unrecognized `META-INF/` members are skipped; every
/// other member outside `META-INF/` is a signed document.
#[derive(Debug, Clone, Copy)]
pub struct ZipContainerExtractor {
    profile: SignatureProfile,
}

impl ZipContainerExtractor {
    pub fn new(profile: SignatureProfile) -> Self {
        Self { profile }
    }
}

impl ArchiveExtractor for ZipContainerExtractor {
    fn extract(&self, archive: &dyn Document) -> Result<ExtractResult> {
        let mut zip = ZipArchive::new(Cursor::new(archive.to_bytes()?))?;
        let mut result = ExtractResult::default();

        for i in 0..zip.len() {
            let mut entry = zip.by_index(i)?;
            let name = entry.name().to_string();
            if entry.is_dir() || names::is_folder(&name) {
                continue;
            }

            let mut content = Vec::with_capacity(entry.size() as usize);
            entry.read_to_end(&mut content)?;

            if names::is_mimetype(&name) {
                result.mimetype_document =
                    Some(InMemoryDocument::new(content, Some(name.as_str())).with_mime_type(MimeType::TEXT));
                continue;
            }

            let document = InMemoryDocument::new(content, Some(name.as_str()));
            if self.profile.is_signature_name(&name) {
                result.signature_documents.push(document);
            } else if names::is_archive_manifest(&name) {
                result.archive_manifest_documents.push(document);
            } else if self.profile.is_manifest_name(&name) {
                result.manifest_documents.push(document);
            } else if names::is_timestamp(&name) {
                result.timestamp_documents.push(document);
            } else if !name.starts_with(names::META_INF) {
                result.signed_documents.push(document);
            } else {
                trace!(member = %name, "ignoring unrecognized META-INF member");
            }
        }

        debug!(
            signatures = result.signature_documents.len(),
            manifests = result.manifest_documents.len(),
            archive_manifests = result.archive_manifest_documents.len(),
            timestamps = result.timestamp_documents.len(),
            signed_documents = result.signed_documents.len(),
            profile = self.profile.name,
            "extracted container"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn container(members: &[(&str, &str)]) -> InMemoryDocument {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in members {
            if name.ends_with('/') {
                zip.add_directory(*name, SimpleFileOptions::default()).unwrap();
            } else {
                zip.start_file(*name, SimpleFileOptions::default()).unwrap();
                zip.write_all(content.as_bytes()).unwrap();
            }
        }
        let bytes = zip.finish().unwrap().into_inner();
        InMemoryDocument::new(bytes, Some("container.asice"))
    }

    fn member_names(documents: &[InMemoryDocument]) -> Vec<&str> {
        documents.iter().filter_map(|d| d.name()).collect()
    }

    #[test]
    fn test_extract_cades_container() {
        let archive = container(&[
            ("mimetype", "application/vnd.etsi.asic-e+zip"),
            ("META-INF/", ""),
            ("META-INF/ASiCManifest001.xml", "<m/>"),
            ("META-INF/ASiCArchiveManifest.xml", "<am/>"),
            ("META-INF/signature001.p7s", "cms"),
            ("META-INF/timestamp001.tst", "tst"),
            ("META-INF/unknown.bin", "?"),
            ("docs/", ""),
            ("docs/a.txt", "a"),
            ("b.pdf", "b"),
        ]);

        let result = ZipContainerExtractor::new(SignatureProfile::CADES)
            .extract(&archive)
            .unwrap();

        assert_eq!(member_names(&result.signature_documents), vec!["META-INF/signature001.p7s"]);
        assert_eq!(member_names(&result.manifest_documents), vec!["META-INF/ASiCManifest001.xml"]);
        assert_eq!(
            member_names(&result.archive_manifest_documents),
            vec!["META-INF/ASiCArchiveManifest.xml"]
        );
        assert_eq!(member_names(&result.timestamp_documents), vec!["META-INF/timestamp001.tst"]);
        assert_eq!(member_names(&result.signed_documents), vec!["docs/a.txt", "b.pdf"]);
        assert_eq!(result.declared_mime_type(), Some(MimeType::ASICE));
        assert_eq!(result.signed_documents[1].mime_type(), &MimeType::PDF);
    }

    #[test]
    fn test_extract_xades_container() {
        let archive = container(&[
            ("META-INF/manifest.xml", "<manifest/>"),
            ("META-INF/signatures001.xml", "<sig1/>"),
            ("META-INF/signatures002.xml", "<sig2/>"),
            ("doc.txt", "doc"),
            ("mimetype", "application/vnd.etsi.asic-e+zip"),
        ]);

        let result = SignatureProfile::XADES.extractor().extract(&archive).unwrap();
        assert_eq!(
            member_names(&result.signature_documents),
            vec!["META-INF/signatures001.xml", "META-INF/signatures002.xml"]
        );
        assert_eq!(result.signature_documents[1].bytes(), b"<sig2/>");
        assert_eq!(member_names(&result.manifest_documents), vec!["META-INF/manifest.xml"]);
        assert_eq!(member_names(&result.signed_documents), vec!["doc.txt"]);
    }

    #[test]
    fn test_empty_result() {
        let result = ExtractResult::default();
        assert!(result.is_empty());
        assert_eq!(result.declared_mime_type(), None);
    }

    #[test]
    fn test_extract_not_a_zip() {
        let document = InMemoryDocument::new(b"plain text".to_vec(), Some("a.txt"));
        assert!(SignatureProfile::XADES.extractor().extract(&document).is_err());
    }
}
