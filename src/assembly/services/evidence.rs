//! Uploading evidence documents.

use crate::{
    assembly::{
        domain::{EvidenceDraft, EvidenceKind},
        ports::{DocumentStore, DocumentStoreError, DocumentUpload},
    },
    schedule::domain::JobId,
};
use std::sync::Arc;
use tracing::info;

/// Uploads photos and signatures and collects their URLs.
#[derive(Clone)]
pub struct EvidenceUploader<D: DocumentStore> {
    store: Arc<D>,
}

impl<D: DocumentStore> EvidenceUploader<D> {
    /// Creates an uploader backed by `store`.
    #[must_use]
    pub const fn new(store: Arc<D>) -> Self {
        Self { store }
    }

    /// Uploads one file and records its URL in `draft`.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::EmptyFile`] without uploading when
    /// `bytes` is empty, or the store's error when the upload fails. The
    /// draft is unchanged on error.
    pub async fn upload(
        &self,
        draft: &mut EvidenceDraft,
        owner_id: &JobId,
        kind: EvidenceKind,
        file_name: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Result<String, DocumentStoreError> {
        let name: String = file_name.into();
        if bytes.is_empty() {
            return Err(DocumentStoreError::EmptyFile(name));
        }
        let upload = DocumentUpload {
            file_name: name,
            bytes,
            owner_id: owner_id.clone(),
            kind,
            description: Some(format!("{} evidence", kind.doc_type())),
        };
        let stored = self.store.upload_document(&upload).await?;
        info!(
            job_id = %owner_id,
            doc_type = kind.doc_type(),
            url = %stored.url,
            "evidence uploaded"
        );
        draft.attach(kind, stored.url.clone());
        Ok(stored.url)
    }
}
