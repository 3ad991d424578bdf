//! Container assembly.
//!
//! Provides the operations that arrange documents into ASiC ZIP containers:
//!
//! - [`builder::build_container`] - assemble a new container
//! - [`extend::extend_container`] - replace the signatures of an existing container
//! - [`guard::assert_can_be_signed`] - reject mismatched re-signing up front
//! - [`mimetype::mimetype_entry`] - synthesize the `mimetype` member
//!
//! Containers are always materialized in memory; a failed operation
//! returns an error and no bytes.

pub mod builder;
pub mod extend;
pub mod guard;
pub mod mimetype;

pub use builder::build_container;
pub use extend::{extend_container, extend_container_with_manifests};
pub use guard::{assert_can_be_signed, can_be_signed, is_archive};
pub use mimetype::mimetype_entry;

use crate::document::Document;
use crate::parameters::CompressionLevel;
use crate::{Error, Result};
use std::io::{Seek, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// How a member's payload is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageMode {
    Stored,
    Deflated,
}

impl From<StorageMode> for CompressionMethod {
    fn from(mode: StorageMode) -> Self {
        match mode {
            StorageMode::Stored => CompressionMethod::Stored,
            StorageMode::Deflated => CompressionMethod::Deflated,
        }
    }
}

/// Sizes and checksum fixed ahead of writing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryChecksum {
    pub size: u64,
    pub compressed_size: u64,
    pub crc32: u32,
}

/// A member to write into a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerEntry {
    pub name: String,
    pub payload: Vec<u8>,
    pub mode: StorageMode,
    /// Only set for members whose layout must be reproducible exactly.
    pub checksum: Option<EntryChecksum>,
}

impl ContainerEntry {
    /// Writes the member. Stored members carry no compression level, so
    /// the codec emits size and CRC exactly as precomputed.
    ///
    /// A precomputed checksum that does not describe the payload is
    /// rejected before anything is written.
    pub(crate) fn write_to<W: Write + Seek>(&self, zip: &mut ZipWriter<W>) -> Result<()> {
        if let Some(expected) = self.checksum {
            self.verify(expected)?;
        }
        let options = SimpleFileOptions::default().compression_method(self.mode.into());
        zip.start_file(self.name.as_str(), options)?;
        zip.write_all(&self.payload)?;
        Ok(())
    }

    fn verify(&self, expected: EntryChecksum) -> Result<()> {
        let size = self.payload.len() as u64;
        let stored_size_differs =
            self.mode == StorageMode::Stored && expected.compressed_size != size;
        if expected.size != size
            || stored_size_differs
            || expected.crc32 != crc32fast::hash(&self.payload)
        {
            return Err(Error::InvalidArgument(format!(
                "checksum of member '{}' does not match its payload",
                self.name
            )));
        }
        Ok(())
    }
}

/// File options for every member except `mimetype`.
pub(crate) fn member_options(level: CompressionLevel) -> SimpleFileOptions {
    if level.level() == 0 {
        SimpleFileOptions::default().compression_method(CompressionMethod::Stored)
    } else {
        SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(level.level() as i64))
    }
}

/// Writes named documents (signatures, manifests) as members, in order.
pub(crate) fn store_documents<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    documents: &[impl Document],
    options: SimpleFileOptions,
) -> Result<()> {
    for document in documents {
        let name = document.name().ok_or_else(|| {
            Error::InvalidArgument("container member requires a name".into())
        })?;
        tracing::trace!(member = name, "storing member");
        zip.start_file(name, options)?;
        document.write_to(zip)?;
    }
    Ok(())
}
