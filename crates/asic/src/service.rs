//! Signing workflow over ASiC containers.
//!
//! [`AsicSignatureService`] ties the container operations to an external
//! [`SignatureEngine`] that performs the cryptography. The service decides
//! what the engine signs (plain documents, or the signed documents of an
//! existing container) and how the engine's signatures end up in a
//! container (fresh build, or extension of the existing one).
//!
//! # Extraction cache
//!
//! Each service instance caches the categorized content of the last
//! container it extracted. Extraction replaces the cache wholesale
//! (last write wins, nothing accumulates) and requires `&mut self`, so a
//! shared instance cannot be extracted into concurrently. Use one service
//! per concurrent signing flow.

use crate::container::{
    assert_can_be_signed, build_container, extend_container, extend_container_with_manifests,
    is_archive,
};
use crate::document::{Document, InMemoryDocument};
use crate::extract::ExtractResult;
use crate::parameters::ContainerParameters;
use crate::profile::SignatureProfile;
use crate::Result;
use tracing::debug;

/// Bytes the signature engine asks to be signed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToBeSigned(pub Vec<u8>);

/// Raw signature value computed over a [`ToBeSigned`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureValue(pub Vec<u8>);

/// Members produced by [`SignatureEngine::sign`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignatureOutput {
    /// Every signature member the container must carry afterwards.
    pub signatures: Vec<InMemoryDocument>,
    /// New manifest members; empty when existing manifests stay valid.
    pub manifests: Vec<InMemoryDocument>,
}

/// Cryptographic collaborator.
///
/// `existing` is the content of the container being re-signed, or the
/// empty snapshot when plain documents are signed.
pub trait SignatureEngine {
    fn data_to_sign(
        &self,
        documents: &[&dyn Document],
        existing: &ExtractResult,
        parameters: &ContainerParameters,
    ) -> Result<ToBeSigned>;

    fn sign(
        &self,
        documents: &[&dyn Document],
        existing: &ExtractResult,
        parameters: &ContainerParameters,
        signature_value: &SignatureValue,
    ) -> Result<SignatureOutput>;

    /// Returns the upgraded versions of the existing signatures.
    fn extend_signatures(
        &self,
        existing: &ExtractResult,
        parameters: &ContainerParameters,
    ) -> Result<Vec<InMemoryDocument>>;
}

/// Two-step signing over document sets.
///
/// The single-document operations wrap their document into a one-element
/// set and delegate, so they go through exactly the same checks.
pub trait MultipleDocumentsSignatureService {
    fn get_data_to_sign_multiple(
        &mut self,
        documents: &[&dyn Document],
        parameters: &ContainerParameters,
    ) -> Result<ToBeSigned>;

    fn sign_documents(
        &mut self,
        documents: &[&dyn Document],
        parameters: &ContainerParameters,
        signature_value: &SignatureValue,
    ) -> Result<InMemoryDocument>;

    fn get_data_to_sign(
        &mut self,
        document: &dyn Document,
        parameters: &ContainerParameters,
    ) -> Result<ToBeSigned> {
        self.get_data_to_sign_multiple(std::slice::from_ref(&document), parameters)
    }

    fn sign_document(
        &mut self,
        document: &dyn Document,
        parameters: &ContainerParameters,
        signature_value: &SignatureValue,
    ) -> Result<InMemoryDocument> {
        self.sign_documents(std::slice::from_ref(&document), parameters, signature_value)
    }
}

/// ASiC signing service for one signature profile.
pub struct AsicSignatureService<E> {
    engine: E,
    profile: SignatureProfile,
    archive_content: ExtractResult,
}

impl<E: SignatureEngine> AsicSignatureService<E> {
    pub fn new(engine: E, profile: SignatureProfile) -> Self {
        Self {
            engine,
            profile,
            archive_content: ExtractResult::default(),
        }
    }

    pub fn profile(&self) -> &SignatureProfile {
        &self.profile
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Extracts `archive` without touching the cache.
    pub fn extract(&self, archive: &dyn Document) -> Result<ExtractResult> {
        self.profile.extractor().extract(archive)
    }

    /// Extracts `archive` and replaces the cached snapshot.
    ///
    /// On failure the previous snapshot is kept.
    pub fn extract_current_archive(&mut self, archive: &dyn Document) -> Result<()> {
        self.archive_content = self.extract(archive)?;
        Ok(())
    }

    /// The last extracted snapshot.
    pub fn archive_content(&self) -> &ExtractResult {
        &self.archive_content
    }

    pub fn embedded_signatures(&self) -> &[InMemoryDocument] {
        &self.archive_content.signature_documents
    }

    pub fn embedded_manifests(&self) -> &[InMemoryDocument] {
        &self.archive_content.manifest_documents
    }

    pub fn embedded_archive_manifests(&self) -> &[InMemoryDocument] {
        &self.archive_content.archive_manifest_documents
    }

    pub fn embedded_timestamps(&self) -> &[InMemoryDocument] {
        &self.archive_content.timestamp_documents
    }

    pub fn embedded_signed_documents(&self) -> &[InMemoryDocument] {
        &self.archive_content.signed_documents
    }

    pub fn embedded_mimetype(&self) -> Option<&InMemoryDocument> {
        self.archive_content.mimetype_document.as_ref()
    }

    /// Upgrades the signatures of an existing container in place.
    ///
    /// The container must match `parameters` and the service profile, as
    /// for re-signing.
    ///
    /// The engine's extended signatures replace the container's signature
    /// members; everything else is copied unchanged.
    pub fn extend_document(
        &mut self,
        archive: &dyn Document,
        parameters: &ContainerParameters,
    ) -> Result<InMemoryDocument> {
        assert_can_be_signed(std::slice::from_ref(&archive), parameters, &self.profile)?;
        self.extract_current_archive(archive)?;
        let signatures = self
            .engine
            .extend_signatures(&self.archive_content, parameters)?;
        extend_container(&archive, &signatures, &self.profile)
    }
}

impl<E: SignatureEngine> MultipleDocumentsSignatureService for AsicSignatureService<E> {
    fn get_data_to_sign_multiple(
        &mut self,
        documents: &[&dyn Document],
        parameters: &ContainerParameters,
    ) -> Result<ToBeSigned> {
        assert_can_be_signed(documents, parameters, &self.profile)?;

        if is_archive(documents)? {
            self.extract_current_archive(documents[0])?;
            let signed = as_documents(&self.archive_content.signed_documents);
            self.engine
                .data_to_sign(&signed, &self.archive_content, parameters)
        } else {
            self.engine
                .data_to_sign(documents, &ExtractResult::default(), parameters)
        }
    }

    fn sign_documents(
        &mut self,
        documents: &[&dyn Document],
        parameters: &ContainerParameters,
        signature_value: &SignatureValue,
    ) -> Result<InMemoryDocument> {
        assert_can_be_signed(documents, parameters, &self.profile)?;

        if !is_archive(documents)? {
            let output = self.engine.sign(
                documents,
                &ExtractResult::default(),
                parameters,
                signature_value,
            )?;
            return build_container(documents, &output.signatures, &output.manifests, parameters);
        }

        let archive = documents[0];
        self.extract_current_archive(archive)?;
        let signed = as_documents(&self.archive_content.signed_documents);
        let output = self
            .engine
            .sign(&signed, &self.archive_content, parameters, signature_value)?;

        let manifests: &[InMemoryDocument] = if parameters.container_type().supports_manifests() {
            &output.manifests
        } else {
            &[]
        };
        debug!(
            signatures = output.signatures.len(),
            manifests = manifests.len(),
            "re-signing by extension"
        );
        extend_container_with_manifests(&archive, &output.signatures, manifests, &self.profile)
    }
}

fn as_documents(documents: &[InMemoryDocument]) -> Vec<&dyn Document> {
    documents.iter().map(|d| d as &dyn Document).collect()
}
