//! Error types for ASiC container operations.
//!
//! This module defines the [`enum@Error`] enum covering all failure cases
//! when assembling, extending or inspecting containers, including I/O,
//! ZIP codec, eligibility and signature-engine errors.
//!
//! # See Also
//!
//! - [`crate::Result`] - Convenience type alias using this error

use thiserror::Error;

/// Error type for ASiC container operations.
///
/// All public functions in this crate return [`crate::Result<T>`], which uses this error type.
/// Match on variants to handle specific failure cases.
///
/// # Examples
///
/// ```no_run
/// use asic_rs::{build_container, ContainerParameters, ContainerType, Error, InMemoryDocument};
///
/// let doc = InMemoryDocument::new(b"hello".to_vec(), Some("hello.txt"));
/// let params = ContainerParameters::new(ContainerType::Simple);
/// let none: [InMemoryDocument; 0] = [];
/// match build_container(&[doc], &none, &none, &params) {
///     Ok(container) => println!("{} bytes", container.len()),
///     Err(Error::Container { message, source }) => eprintln!("{message}: {source}"),
///     Err(e) => eprintln!("Other error: {e}"),
/// }
/// ```
#[derive(Debug, Error)]
pub enum Error {
    /// I/O operation failed.
    ///
    /// Occurs when reading a document stream or writing container bytes.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP archive operation failed.
    ///
    /// Malformed entries, duplicate member names and truncated archives
    /// surface here before being wrapped into [`Error::Container`].
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// The document set cannot be signed with the requested parameters.
    ///
    /// Raised by [`crate::container::guard::assert_can_be_signed`] when an
    /// existing container declares another content type or carries
    /// signatures of another scheme.
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// Building or extending a container failed.
    ///
    /// The whole operation was aborted and no output was produced; `source`
    /// holds the root cause.
    #[error("{message}")]
    Container {
        message: &'static str,
        #[source]
        source: Box<Error>,
    },

    /// The signature engine reported a failure.
    #[error("Signature error: {0}")]
    Signature(String),

    /// Invalid input supplied by the caller.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl Error {
    /// Wraps `source` into an aggregate [`Error::Container`].
    pub(crate) fn container(message: &'static str, source: Error) -> Self {
        Error::Container {
            message,
            source: Box::new(source),
        }
    }
}
