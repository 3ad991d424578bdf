//! The `mimetype` member.
//!
//! Validators classify a container by reading its `mimetype` member without
//! decompressing anything, so the member is always stored uncompressed with
//! size and CRC-32 computed over the exact UTF-8 bytes of the content type.

use super::{ContainerEntry, EntryChecksum, StorageMode};
use crate::names::MIMETYPE;
use crate::parameters::ContainerParameters;

/// Synthesizes the `mimetype` member for `parameters`.
pub fn mimetype_entry(parameters: &ContainerParameters) -> ContainerEntry {
    synthesize(parameters.mime_type_string())
}

/// Synthesizes the `mimetype` member declaring `mime_type`.
pub fn synthesize(mime_type: &str) -> ContainerEntry {
    let payload = mime_type.as_bytes().to_vec();
    let size = payload.len() as u64;
    ContainerEntry {
        name: MIMETYPE.to_string(),
        checksum: Some(EntryChecksum {
            size,
            compressed_size: size,
            crc32: crc32fast::hash(&payload),
        }),
        payload,
        mode: StorageMode::Stored,
    }
}
