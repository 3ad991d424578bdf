//! Container creation.
//!
//! Assembles a new ASiC container in memory. Members are written in a
//! fixed order:
//!
//! 1. manifests (extended containers only)
//! 2. signatures
//! 3. signed documents, named after the document or `detached-file`
//! 4. `mimetype`, always stored
//!
//! followed by the optional `mimetype=<content type>` archive comment.
//!
//! # Examples
//!
//! ```
//! use asic_rs::{build_container, ContainerParameters, ContainerType, Document, InMemoryDocument};
//!
//! let doc = InMemoryDocument::new(b"hello".to_vec(), Some("doc1.txt"));
//! let sig = InMemoryDocument::new(b"<sig/>".to_vec(), Some("META-INF/signatures001.xml"));
//! let manifest = InMemoryDocument::new(b"<manifest/>".to_vec(), Some("META-INF/manifest.xml"));
//!
//! let params = ContainerParameters::new(ContainerType::Extended).zip_comment(true);
//! let container = build_container(&[doc], &[sig], &[manifest], &params)?;
//! assert_eq!(container.mime_type().as_str(), "application/vnd.etsi.asic-e+zip");
//! # Ok::<(), asic_rs::Error>(())
//! ```

use super::{member_options, mimetype_entry, store_documents};
use crate::document::{Document, InMemoryDocument};
use crate::names::DETACHED_FILE;
use crate::parameters::ContainerParameters;
use crate::{Error, Result};
use std::io::Cursor;
use tracing::debug;
use zip::ZipWriter;

const BUILD_FAILURE: &str = "Unable to build the ASiC container";

/// Builds a new container from signed documents, signatures and manifests.
///
/// Manifests are ignored for simple containers. The returned document is
/// unnamed and carries the parameters' content type.
///
/// # Errors
///
/// Returns [`Error::Container`] wrapping the root cause if any member cannot
/// be read or written (including duplicate member names or unnamed
/// signatures and manifests). No partial output is returned.
pub fn build_container(
    documents_to_sign: &[impl Document],
    signatures: &[impl Document],
    manifests: &[impl Document],
    parameters: &ContainerParameters,
) -> Result<InMemoryDocument> {
    let bytes = assemble(documents_to_sign, signatures, manifests, parameters)
        .map_err(|e| Error::container(BUILD_FAILURE, e))?;

    debug!(
        bytes = bytes.len(),
        mime_type = parameters.mime_type_string(),
        "built container"
    );
    Ok(InMemoryDocument::new(bytes, None).with_mime_type(parameters.declared_mime_type()))
}

fn assemble(
    documents_to_sign: &[impl Document],
    signatures: &[impl Document],
    manifests: &[impl Document],
    parameters: &ContainerParameters,
) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = member_options(parameters.level());

    if parameters.container_type().supports_manifests() {
        store_documents(&mut zip, manifests, options)?;
    }

    store_documents(&mut zip, signatures, options)?;

    for document in documents_to_sign {
        let name = document.name().unwrap_or(DETACHED_FILE);
        zip.start_file(name, options)?;
        let mut stream = document.open_stream()?;
        std::io::copy(&mut stream, &mut zip)?;
    }

    mimetype_entry(parameters).write_to(&mut zip)?;

    if let Some(comment) = parameters.comment() {
        zip.set_comment(comment);
    }

    Ok(zip.finish()?.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::MimeType;
    use crate::parameters::ContainerType;
    use std::io::Read;
    use zip::{CompressionMethod, ZipArchive};

    fn doc(content: &[u8], name: &str) -> InMemoryDocument {
        InMemoryDocument::new(content.to_vec(), Some(name))
    }

    fn member_names(container: &InMemoryDocument) -> Vec<String> {
        let mut archive = ZipArchive::new(Cursor::new(container.bytes())).unwrap();
        (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect()
    }

    #[test]
    fn test_build_extended_container() {
        let params = ContainerParameters::new(ContainerType::Extended);
        let container = build_container(
            &[doc(b"hello", "doc1.txt")],
            &[doc(b"<sig/>", "sig1.xml")],
            &[doc(b"<manifest/>", "manifest.xml")],
            &params,
        )
        .unwrap();

        assert_eq!(container.mime_type(), &MimeType::new("application/vnd.etsi.asic-e+zip"));
        assert_eq!(container.name(), None);
        assert_eq!(
            member_names(&container),
            vec!["manifest.xml", "sig1.xml", "doc1.txt", "mimetype"]
        );

        let archive = ZipArchive::new(Cursor::new(container.bytes())).unwrap();
        assert!(archive.comment().is_empty());
    }

    #[test]
    fn test_build_with_comment() {
        let params = ContainerParameters::new(ContainerType::Extended).zip_comment(true);
        let container = build_container(
            &[doc(b"hello", "doc1.txt")],
            &[doc(b"<sig/>", "sig1.xml")],
            &[doc(b"<manifest/>", "manifest.xml")],
            &params,
        )
        .unwrap();

        let archive = ZipArchive::new(Cursor::new(container.bytes())).unwrap();
        assert_eq!(archive.comment(), b"mimetype=application/vnd.etsi.asic-e+zip");
    }

    #[test]
    fn test_simple_container_skips_manifests() {
        let params = ContainerParameters::new(ContainerType::Simple);
        let container = build_container(
            &[doc(b"hello", "doc1.txt")],
            &[doc(b"<sig/>", "META-INF/signatures.xml")],
            &[doc(b"<manifest/>", "META-INF/manifest.xml")],
            &params,
        )
        .unwrap();

        assert_eq!(
            member_names(&container),
            vec!["META-INF/signatures.xml", "doc1.txt", "mimetype"]
        );
        assert_eq!(container.mime_type(), &MimeType::ASICS);
    }

    #[test]
    fn test_unnamed_document_uses_detached_file() {
        let params = ContainerParameters::new(ContainerType::Simple);
        let unnamed = InMemoryDocument::new(b"payload".to_vec(), None);
        let none: [InMemoryDocument; 0] = [];
        let container = build_container(&[unnamed], &none, &none, &params).unwrap();

        assert_eq!(member_names(&container), vec!["detached-file", "mimetype"]);

        let mut archive = ZipArchive::new(Cursor::new(container.bytes())).unwrap();
        let mut content = Vec::new();
        archive.by_name("detached-file").unwrap().read_to_end(&mut content).unwrap();
        assert_eq!(content, b"payload");
    }

    #[test]
    fn test_mimetype_stored_regardless_of_level() {
        let params = ContainerParameters::new(ContainerType::Extended).compression_level(9);
        let none: [InMemoryDocument; 0] = [];
        let container = build_container(&[doc(&[b'a'; 4096], "big.txt")], &none, &none, &params).unwrap();

        let mut archive = ZipArchive::new(Cursor::new(container.bytes())).unwrap();
        assert_eq!(
            archive.by_name("big.txt").unwrap().compression(),
            CompressionMethod::Deflated
        );
        let mimetype = archive.by_name("mimetype").unwrap();
        assert_eq!(mimetype.compression(), CompressionMethod::Stored);
        assert_eq!(mimetype.size(), 31);
        assert_eq!(mimetype.crc32(), crc32fast::hash(b"application/vnd.etsi.asic-e+zip"));
    }

    #[test]
    fn test_duplicate_member_aborts_build() {
        let params = ContainerParameters::new(ContainerType::Simple);
        let none: [InMemoryDocument; 0] = [];
        let result = build_container(
            &[doc(b"one", "same.txt"), doc(b"two", "same.txt")],
            &none,
            &none,
            &params,
        );

        match result {
            Err(Error::Container { message, source }) => {
                assert_eq!(message, "Unable to build the ASiC container");
                assert!(matches!(*source, Error::Zip(_)));
            }
            other => panic!("expected container error, got {other:?}"),
        }
    }

    #[test]
    fn test_document_named_mimetype_aborts_build() {
        let params = ContainerParameters::new(ContainerType::Simple);
        let none: [InMemoryDocument; 0] = [];
        let result = build_container(&[doc(b"x", "mimetype")], &none, &none, &params);
        assert!(matches!(result, Err(Error::Container { .. })));
    }
}
