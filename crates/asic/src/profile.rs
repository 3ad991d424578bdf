//! Signature profiles.
//!
//! A [`SignatureProfile`] is the per-scheme configuration the engine needs:
//! which extension existing signatures must carry, which member names are
//! signatures or manifests, and which extractor parses containers of this
//! scheme. XAdES and CAdES profiles are provided; custom schemes can build
//! their own value.

use crate::extract::{ArchiveExtractor, ZipContainerExtractor};
use crate::names;
use std::fmt;

/// Per-scheme container conventions.
#[derive(Clone, Copy)]
pub struct SignatureProfile {
    /// Human-readable scheme name.
    pub name: &'static str,
    /// Extension every existing signature member must end with.
    pub signature_extension: &'static str,
    /// Identifies signature members; these are dropped on extension.
    pub is_signature_name: fn(&str) -> bool,
    /// Identifies manifest members.
    pub is_manifest_name: fn(&str) -> bool,
    /// Creates the extractor used to parse containers of this scheme.
    pub extractor_factory: fn(&SignatureProfile) -> Box<dyn ArchiveExtractor>,
}

impl SignatureProfile {
    /// XML signatures (`META-INF/signatures*.xml`, `META-INF/manifest.xml`).
    pub const XADES: SignatureProfile = SignatureProfile {
        name: "XAdES",
        signature_extension: names::XML_EXTENSION,
        is_signature_name: names::is_xades_signature,
        is_manifest_name: names::is_xades_manifest,
        extractor_factory: zip_extractor,
    };

    /// CMS signatures (`META-INF/signature*.p7s`, `META-INF/ASiCManifest*.xml`).
    pub const CADES: SignatureProfile = SignatureProfile {
        name: "CAdES",
        signature_extension: names::P7S_EXTENSION,
        is_signature_name: names::is_cades_signature,
        is_manifest_name: names::is_cades_manifest,
        extractor_factory: zip_extractor,
    };

    pub fn is_signature_name(&self, name: &str) -> bool {
        (self.is_signature_name)(name)
    }

    pub fn is_manifest_name(&self, name: &str) -> bool {
        (self.is_manifest_name)(name)
    }

    pub fn extractor(&self) -> Box<dyn ArchiveExtractor> {
        (self.extractor_factory)(self)
    }
}

impl fmt::Debug for SignatureProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignatureProfile")
            .field("name", &self.name)
            .field("signature_extension", &self.signature_extension)
            .finish_non_exhaustive()
    }
}

fn zip_extractor(profile: &SignatureProfile) -> Box<dyn ArchiveExtractor> {
    Box::new(ZipContainerExtractor::new(*profile))
}
