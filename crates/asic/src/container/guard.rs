//! Eligibility checks before signing.
//!
//! Re-signing an existing container is only allowed with the same container
//! type and the same signature scheme. A document set counts as an existing
//! container when it is a single document starting with the ZIP magic.

use crate::document::Document;
use crate::names;
use crate::parameters::ContainerParameters;
use crate::profile::SignatureProfile;
use crate::{Error, Result};
use std::io::{Cursor, Read};
use tracing::debug;
use zip::ZipArchive;

const ZIP_MAGIC: &[u8; 2] = b"PK";

/// Whether `document` starts with the ZIP magic bytes.
pub fn is_zip(document: &impl Document) -> Result<bool> {
    let mut preamble = Vec::with_capacity(2);
    document.open_stream()?.take(2).read_to_end(&mut preamble)?;
    Ok(preamble.as_slice() == ZIP_MAGIC)
}

/// Whether the document set is a single existing container.
pub fn is_archive(documents: &[impl Document]) -> Result<bool> {
    match documents {
        [document] => is_zip(document),
        _ => Ok(false),
    }
}

/// Whether every signature member of `archive` ends with `extension`.
///
/// Signature members are recognized by the scheme-independent naming
/// convention, so signatures of another scheme are detected too. An
/// archive without signatures passes.
pub fn archive_contains_correct_signature_extension(
    archive: &impl Document,
    extension: &str,
) -> Result<bool> {
    let mut zip = ZipArchive::new(Cursor::new(archive.to_bytes()?))?;
    for i in 0..zip.len() {
        let entry = zip.by_index_raw(i)?;
        let name = entry.name();
        if names::is_signature(name) && !name.ends_with(extension) {
            debug!(member = name, expected = extension, "signature extension mismatch");
            return Ok(false);
        }
    }
    Ok(true)
}

/// Decides whether `documents` may be signed under `parameters` with
/// `profile`.
///
/// Anything but a single existing container is always eligible. An
/// existing container must declare the parameters' content type
/// (case-insensitive) and its signatures must use the profile's extension.
pub fn can_be_signed(
    documents: &[impl Document],
    parameters: &ContainerParameters,
    profile: &SignatureProfile,
) -> Result<bool> {
    if !is_archive(documents)? {
        return Ok(true);
    }
    let archive = &documents[0];

    let expected = parameters.mime_type_string();
    if !archive.mime_type().matches(expected) {
        debug!(
            declared = archive.mime_type().as_str(),
            expected, "container content type mismatch"
        );
        return Ok(false);
    }

    archive_contains_correct_signature_extension(archive, profile.signature_extension)
}

/// Fails with [`Error::UnsupportedOperation`] unless [`can_be_signed`]
/// holds.
pub fn assert_can_be_signed(
    documents: &[impl Document],
    parameters: &ContainerParameters,
    profile: &SignatureProfile,
) -> Result<()> {
    if can_be_signed(documents, parameters, profile)? {
        Ok(())
    } else {
        Err(Error::UnsupportedOperation(
            "You only can sign an ASiC container by using the same type of container and of signature"
                .into(),
        ))
    }
}
