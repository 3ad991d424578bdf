//! Container extension.
//!
//! Produces a copy of an existing container in which every signature member
//! is replaced by a new set of signatures. All other members are copied
//! raw: names, compression, CRCs and compressed bytes are untouched.

use super::{member_options, store_documents};
use crate::document::{Document, InMemoryDocument};
use crate::parameters::CompressionLevel;
use crate::profile::SignatureProfile;
use crate::{Error, Result};
use std::io::Cursor;
use tracing::{debug, trace};
use zip::{ZipArchive, ZipWriter};

const EXTEND_FAILURE: &str = "Unable to extend the ASiC container";

/// Copies `existing_archive` without its signature members and appends
/// `new_signatures`.
///
/// Signature members are recognized by `profile`'s name predicate only.
/// The archive comment and the declared content type of the existing
/// container are preserved. A container without signatures is not an
/// error.
///
/// # Errors
///
/// Returns [`Error::Container`] wrapping the root cause if the existing
/// container cannot be read or the new one cannot be written. No partial
/// output is returned.
pub fn extend_container(
    existing_archive: &impl Document,
    new_signatures: &[impl Document],
    profile: &SignatureProfile,
) -> Result<InMemoryDocument> {
    let none: [InMemoryDocument; 0] = [];
    extend_container_with_manifests(existing_archive, new_signatures, &none, profile)
}

/// Like [`extend_container`], and also adds `new_manifests`.
///
/// Existing manifests, archive manifests and timestamps stay in place; an
/// existing member is only dropped when a new manifest has the same name.
/// New manifests are written before the new signatures.
pub fn extend_container_with_manifests(
    existing_archive: &impl Document,
    new_signatures: &[impl Document],
    new_manifests: &[impl Document],
    profile: &SignatureProfile,
) -> Result<InMemoryDocument> {
    let bytes = merge(existing_archive, new_signatures, new_manifests, profile)
        .map_err(|e| Error::container(EXTEND_FAILURE, e))?;

    debug!(
        bytes = bytes.len(),
        signatures = new_signatures.len(),
        manifests = new_manifests.len(),
        profile = profile.name,
        "extended container"
    );
    Ok(InMemoryDocument::new(bytes, None).with_mime_type(existing_archive.mime_type().clone()))
}

fn merge(
    existing_archive: &impl Document,
    new_signatures: &[impl Document],
    new_manifests: &[impl Document],
    profile: &SignatureProfile,
) -> Result<Vec<u8>> {
    let mut source = ZipArchive::new(Cursor::new(existing_archive.to_bytes()?))?;
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    for i in 0..source.len() {
        let entry = source.by_index_raw(i)?;
        if profile.is_signature_name(entry.name()) {
            trace!(member = entry.name(), "dropping signature");
            continue;
        }
        if new_manifests.iter().any(|m| m.name() == Some(entry.name())) {
            trace!(member = entry.name(), "replacing manifest");
            continue;
        }
        zip.raw_copy_file(entry)?;
    }

    let comment = source.comment();
    if !comment.is_empty() {
        zip.set_raw_comment(comment.into());
    }

    let options = member_options(CompressionLevel::DEFAULT);
    store_documents(&mut zip, new_manifests, options)?;
    store_documents(&mut zip, new_signatures, options)?;

    Ok(zip.finish()?.into_inner())
}
