//! Assembly and extension of ASiC (Associated Signature Containers).
//!
//! An ASiC container is a ZIP archive bundling signed documents, signature
//! files, optional manifests and a `mimetype` member declaring the package's
//! content type. This crate arranges those members into byte-correct
//! containers; computing signatures is left to a [`SignatureEngine`].
//!
//! - [`build_container`] assembles a new container
//! - [`extend_container`] replaces the signatures of an existing one
//! - [`assert_can_be_signed`] rejects re-signing with another container
//!   type or signature scheme
//! - [`AsicSignatureService`] drives the two-step signing workflow

pub mod container;
pub mod document;
pub mod error;
pub mod extract;
pub mod names;
pub mod parameters;
pub mod profile;
pub mod service;

pub use container::{
    assert_can_be_signed, build_container, can_be_signed, extend_container,
    extend_container_with_manifests, is_archive, mimetype_entry, ContainerEntry, EntryChecksum,
    StorageMode,
};
pub use document::{Document, FileDocument, InMemoryDocument, MimeType};
pub use error::Error;
pub use extract::{ArchiveExtractor, ExtractResult, ZipContainerExtractor};
pub use parameters::{CompressionLevel, ContainerParameters, ContainerType};
pub use profile::SignatureProfile;
pub use service::{
    AsicSignatureService, MultipleDocumentsSignatureService, SignatureEngine, SignatureOutput,
    SignatureValue, ToBeSigned,
};

pub type Result<T> = std::result::Result<T, Error>;
