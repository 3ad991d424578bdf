//! Container parameters.
//!
//! [`ContainerParameters`] selects the container flavor, the optional
//! archive comment, the declared content type and the compression level
//! used for every member except `mimetype`.
//!
//! # Examples
//!
//! ```
//! use asic_rs::{ContainerParameters, ContainerType};
//!
//! let params = ContainerParameters::new(ContainerType::Extended)
//!     .zip_comment(true)
//!     .compression_level(9);
//! assert_eq!(params.mime_type_string(), "application/vnd.etsi.asic-e+zip");
//! assert_eq!(
//!     params.comment().as_deref(),
//!     Some("mimetype=application/vnd.etsi.asic-e+zip")
//! );
//! ```

use crate::document::MimeType;
use crate::names::{MIME_TYPE_ASICE, MIME_TYPE_ASICS, MIME_TYPE_COMMENT};

/// Packaging profile of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerType {
    /// ASiC-S: one signed document, no manifests.
    Simple,
    /// ASiC-E: any number of signed documents, manifest-bearing.
    Extended,
}

impl ContainerType {
    /// Default content type of the flavor.
    pub fn default_mime_type(&self) -> MimeType {
        match self {
            ContainerType::Simple => MimeType::ASICS,
            ContainerType::Extended => MimeType::ASICE,
        }
    }

    /// Whether manifest members are written for this flavor.
    pub fn supports_manifests(&self) -> bool {
        matches!(self, ContainerType::Extended)
    }
}

/// ZIP compression level for container members.
///
/// Controls the trade-off between compression speed and output size. The
/// `mimetype` member ignores it and is always stored.
///
/// # Examples
///
/// ```
/// use asic_rs::CompressionLevel;
///
/// let stored = CompressionLevel::NONE;
/// let custom = CompressionLevel::new(12);
/// assert_eq!(stored.level(), 0);
/// assert_eq!(custom.level(), 9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionLevel(u32);

impl CompressionLevel {
    /// No compression (level 0). Members are stored.
    pub const NONE: CompressionLevel = CompressionLevel(0);

    /// Default deflate level (6).
    pub const DEFAULT: CompressionLevel = CompressionLevel(6);

    /// Maximum deflate level (9).
    pub const MAX: CompressionLevel = CompressionLevel(9);

    /// Creates a compression level from 0-9.
    ///
    /// Values greater than 9 are clamped to 9.
    #[must_use]
    pub fn new(level: u32) -> Self {
        CompressionLevel(level.min(9))
    }

    /// Returns the compression level value (0-9).
    #[must_use]
    pub fn level(&self) -> u32 {
        self.0
    }
}

impl Default for CompressionLevel {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<u32> for CompressionLevel {
    fn from(level: u32) -> Self {
        CompressionLevel::new(level)
    }
}

/// Parameters for building a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerParameters {
    container_type: ContainerType,
    zip_comment: bool,
    mime_type: Option<String>,
    compression_level: CompressionLevel,
}

impl ContainerParameters {
    /// Creates parameters for the given flavor without comment or
    /// content-type override.
    pub fn new(container_type: ContainerType) -> Self {
        Self {
            container_type,
            zip_comment: false,
            mime_type: None,
            compression_level: CompressionLevel::DEFAULT,
        }
    }

    /// Emit the `mimetype=<content type>` archive comment.
    pub fn zip_comment(mut self, enabled: bool) -> Self {
        self.zip_comment = enabled;
        self
    }

    /// Declare an explicit content type instead of the flavor default.
    ///
    /// A blank value falls back to the flavor default.
    pub fn mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Set the ZIP compression level (0-9) for non-mimetype members.
    pub fn compression_level(mut self, level: u32) -> Self {
        self.compression_level = CompressionLevel::new(level);
        self
    }

    pub fn container_type(&self) -> ContainerType {
        self.container_type
    }

    pub fn is_zip_comment(&self) -> bool {
        self.zip_comment
    }

    pub fn level(&self) -> CompressionLevel {
        self.compression_level
    }

    /// The canonical content-type string of the container.
    pub fn mime_type_string(&self) -> &str {
        match self.mime_type.as_deref() {
            Some(explicit) if !explicit.trim().is_empty() => explicit,
            _ => match self.container_type {
                ContainerType::Simple => MIME_TYPE_ASICS,
                ContainerType::Extended => MIME_TYPE_ASICE,
            },
        }
    }

    /// The content type as a [`MimeType`].
    pub fn declared_mime_type(&self) -> MimeType {
        MimeType::new(self.mime_type_string())
    }

    /// The archive comment, when enabled.
    pub fn comment(&self) -> Option<String> {
        self.zip_comment
            .then(|| format!("{}{}", MIME_TYPE_COMMENT, self.mime_type_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mime_types() {
        let simple = ContainerParameters::new(ContainerType::Simple);
        let extended = ContainerParameters::new(ContainerType::Extended);
        assert_eq!(simple.mime_type_string(), "application/vnd.etsi.asic-s+zip");
        assert_eq!(extended.mime_type_string(), "application/vnd.etsi.asic-e+zip");
        assert_eq!(ContainerType::Simple.default_mime_type(), MimeType::ASICS);
    }

    #[test]
    fn test_explicit_mime_type() {
        let params = ContainerParameters::new(ContainerType::Simple).mime_type("application/x-custom");
        assert_eq!(params.mime_type_string(), "application/x-custom");
        assert_eq!(params.declared_mime_type(), MimeType::new("application/x-custom"));
    }

    #[test]
    fn test_blank_mime_type_falls_back() {
        let params = ContainerParameters::new(ContainerType::Extended).mime_type("  ");
        assert_eq!(params.mime_type_string(), "application/vnd.etsi.asic-e+zip");
    }

    #[test]
    fn test_comment() {
        let params = ContainerParameters::new(ContainerType::Simple);
        assert_eq!(params.comment(), None);

        let params = params.zip_comment(true);
        assert_eq!(
            params.comment().as_deref(),
            Some("mimetype=application/vnd.etsi.asic-s+zip")
        );
    }

    #[test]
    fn test_manifest_support() {
        assert!(!ContainerType::Simple.supports_manifests());
        assert!(ContainerType::Extended.supports_manifests());
    }

    #[test]
    fn test_compression_level() {
        assert_eq!(CompressionLevel::NONE.level(), 0);
        assert_eq!(CompressionLevel::DEFAULT.level(), 6);
        assert_eq!(CompressionLevel::MAX.level(), 9);
        assert_eq!(CompressionLevel::new(15).level(), 9); // Clamped
        assert_eq!(CompressionLevel::from(5).level(), 5);

        let params = ContainerParameters::new(ContainerType::Simple).compression_level(0);
        assert_eq!(params.level(), CompressionLevel::NONE);
    }
}
