//! Document abstraction.
//!
//! Every member that goes into or comes out of a container is a
//! [`Document`]: named (or not) binary content with a declared
//! [`MimeType`]. The core only reads documents; it never mutates them.

use crate::names::{MIME_TYPE_ASICE, MIME_TYPE_ASICS};
use crate::Result;
use std::borrow::Cow;
use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::{Path, PathBuf};

/// Declared content type of a document.
///
/// Comparisons between content types are case-insensitive, see
/// [`MimeType::matches`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MimeType(Cow<'static, str>);

impl MimeType {
    /// Content type of a simple (single-document) container.
    pub const ASICS: MimeType = MimeType(Cow::Borrowed(MIME_TYPE_ASICS));
    /// Content type of an extended (multi-document) container.
    pub const ASICE: MimeType = MimeType(Cow::Borrowed(MIME_TYPE_ASICE));
    pub const BINARY: MimeType = MimeType(Cow::Borrowed("application/octet-stream"));
    pub const XML: MimeType = MimeType(Cow::Borrowed("text/xml"));
    pub const TEXT: MimeType = MimeType(Cow::Borrowed("text/plain"));
    pub const PDF: MimeType = MimeType(Cow::Borrowed("application/pdf"));
    pub const ZIP: MimeType = MimeType(Cow::Borrowed("application/zip"));
    pub const PKCS7: MimeType = MimeType(Cow::Borrowed("application/pkcs7-signature"));
    pub const TST: MimeType = MimeType(Cow::Borrowed("application/vnd.etsi.timestamp-token"));

    /// Creates a content type from an arbitrary string.
    pub fn new(value: impl Into<String>) -> Self {
        MimeType(Cow::Owned(value.into()))
    }

    /// Guesses the content type from a file name's extension.
    ///
    /// Unknown or missing extensions map to [`MimeType::BINARY`].
    pub fn from_file_name(name: &str) -> Self {
        let ext = match name.rsplit_once('.') {
            Some((_, ext)) => ext.to_ascii_lowercase(),
            None => return Self::BINARY,
        };
        match ext.as_str() {
            "xml" => Self::XML,
            "txt" => Self::TEXT,
            "pdf" => Self::PDF,
            "zip" => Self::ZIP,
            "p7s" | "p7m" => Self::PKCS7,
            "tst" => Self::TST,
            "asics" | "scs" => Self::ASICS,
            "asice" | "sce" => Self::ASICE,
            _ => Self::BINARY,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive comparison against a content-type string.
    pub fn matches(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other)
    }
}

impl fmt::Display for MimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Binary content handed to or produced by the container engine.
///
/// Implementors only need to provide the name, the content type and a way
/// to open a fresh read stream; `write_to` and `to_bytes` are derived from
/// `open_stream`. Streams are scoped: each call returns a new reader that
/// is released when dropped.
pub trait Document {
    /// Member name, if the document has one.
    fn name(&self) -> Option<&str>;

    /// Declared content type.
    fn mime_type(&self) -> &MimeType;

    /// Opens a new stream over the full content.
    fn open_stream(&self) -> Result<Box<dyn Read + '_>>;

    /// Copies the full content into `out`, returning the byte count.
    fn write_to(&self, out: &mut dyn Write) -> Result<u64> {
        let mut stream = self.open_stream()?;
        Ok(io::copy(&mut stream, out)?)
    }

    /// Reads the full content into memory.
    fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.open_stream()?.read_to_end(&mut buffer)?;
        Ok(buffer)
    }
}

impl<D: Document + ?Sized> Document for &D {
    fn name(&self) -> Option<&str> {
        (**self).name()
    }

    fn mime_type(&self) -> &MimeType {
        (**self).mime_type()
    }

    fn open_stream(&self) -> Result<Box<dyn Read + '_>> {
        (**self).open_stream()
    }

    fn write_to(&self, out: &mut dyn Write) -> Result<u64> {
        (**self).write_to(out)
    }

    fn to_bytes(&self) -> Result<Vec<u8>> {
        (**self).to_bytes()
    }
}

/// A document whose content lives in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InMemoryDocument {
    bytes: Vec<u8>,
    name: Option<String>,
    mime_type: MimeType,
}

impl InMemoryDocument {
    /// Creates a document, guessing the content type from `name`.
    pub fn new(bytes: impl Into<Vec<u8>>, name: Option<&str>) -> Self {
        let mime_type = name.map_or(MimeType::BINARY, MimeType::from_file_name);
        Self {
            bytes: bytes.into(),
            name: name.map(str::to_owned),
            mime_type,
        }
    }

    /// Overrides the declared content type.
    pub fn with_mime_type(mut self, mime_type: MimeType) -> Self {
        self.mime_type = mime_type;
        self
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl Document for InMemoryDocument {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn mime_type(&self) -> &MimeType {
        &self.mime_type
    }

    fn open_stream(&self) -> Result<Box<dyn Read + '_>> {
        Ok(Box::new(self.bytes.as_slice()))
    }

    fn write_to(&self, out: &mut dyn Write) -> Result<u64> {
        out.write_all(&self.bytes)?;
        Ok(self.bytes.len() as u64)
    }

    fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(self.bytes.clone())
    }
}

/// A document backed by a file on disk.
///
/// The file is opened on every [`Document::open_stream`] call and closed
/// when the returned stream is dropped. The member name defaults to the
/// file name.
#[derive(Debug, Clone)]
pub struct FileDocument {
    path: PathBuf,
    name: Option<String>,
    mime_type: MimeType,
}

impl FileDocument {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned());
        let mime_type = name
            .as_deref()
            .map_or(MimeType::BINARY, MimeType::from_file_name);
        Self {
            path,
            name,
            mime_type,
        }
    }

    /// Overrides the member name used inside the container.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Overrides the declared content type.
    pub fn with_mime_type(mut self, mime_type: MimeType) -> Self {
        self.mime_type = mime_type;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Document for FileDocument {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn mime_type(&self) -> &MimeType {
        &self.mime_type
    }

    fn open_stream(&self) -> Result<Box<dyn Read + '_>> {
        let file = File::open(&self.path)?;
        Ok(Box::new(BufReader::new(file)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_mime_type_from_file_name() {
        assert_eq!(MimeType::from_file_name("doc.XML"), MimeType::XML);
        assert_eq!(MimeType::from_file_name("META-INF/signature.p7s"), MimeType::PKCS7);
        assert_eq!(MimeType::from_file_name("container.asice"), MimeType::ASICE);
        assert_eq!(MimeType::from_file_name("noext"), MimeType::BINARY);
        assert_eq!(MimeType::from_file_name("archive.rar"), MimeType::BINARY);
    }

    #[test]
    fn test_mime_type_matches_ignores_case() {
        assert!(MimeType::ASICE.matches("APPLICATION/vnd.etsi.ASIC-E+zip"));
        assert!(!MimeType::ASICE.matches("application/vnd.etsi.asic-s+zip"));
    }

    #[test]
    fn test_in_memory_document() {
        let doc = InMemoryDocument::new(b"content".to_vec(), Some("a.txt"));
        assert_eq!(doc.name(), Some("a.txt"));
        assert_eq!(doc.mime_type(), &MimeType::TEXT);
        assert_eq!(doc.to_bytes().unwrap(), b"content");

        let mut out = Vec::new();
        assert_eq!(doc.write_to(&mut out).unwrap(), 7);
        assert_eq!(out, b"content");

        let unnamed = InMemoryDocument::new(Vec::new(), None);
        assert_eq!(unnamed.name(), None);
        assert_eq!(unnamed.mime_type(), &MimeType::BINARY);
        assert!(unnamed.is_empty());
    }

    #[test]
    fn test_file_document() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("report.pdf");
        std::fs::write(&path, b"%PDF-1.7").unwrap();

        let doc = FileDocument::new(&path);
        assert_eq!(doc.name(), Some("report.pdf"));
        assert_eq!(doc.mime_type(), &MimeType::PDF);
        assert_eq!(doc.to_bytes().unwrap(), b"%PDF-1.7");

        let renamed = doc.with_name("docs/report.pdf");
        assert_eq!(renamed.name(), Some("docs/report.pdf"));
    }

    #[test]
    fn test_file_document_missing_file() {
        let doc = FileDocument::new("/nonexistent/file.bin");
        assert!(doc.open_stream().is_err());
    }

    #[test]
    fn test_reference_is_document() {
        let doc = InMemoryDocument::new(b"x".to_vec(), Some("x.bin"));
        fn name_of(document: impl Document) -> Option<String> {
            document.name().map(str::to_owned)
        }
        let by_ref: &dyn Document = &doc;
        assert_eq!(name_of(by_ref), Some("x.bin".to_string()));
    }
}
