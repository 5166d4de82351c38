//! Document archive port used for evidence uploads.

use crate::{assembly::domain::EvidenceKind, schedule::domain::JobId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// File to store in the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentUpload {
    /// Original file name.
    pub file_name: String,
    /// File contents.
    pub bytes: Vec<u8>,
    /// Job the document belongs to.
    pub owner_id: JobId,
    /// What the document shows.
    pub kind: EvidenceKind,
    /// Optional description.
    pub description: Option<String>,
}

/// Archive answer to an upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedDocument {
    /// Public URL of the stored file.
    pub url: String,
}

/// Document archive contract.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Stores a file and returns its URL.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError`] when the archive refuses the file or
    /// cannot be reached.
    async fn upload_document(
        &self,
        upload: &DocumentUpload,
    ) -> Result<UploadedDocument, DocumentStoreError>;
}

/// Errors returned by document archives.
#[derive(Debug, Clone, Error)]
pub enum DocumentStoreError {
    /// The file has no content.
    #[error("file {0} is empty")]
    EmptyFile(String),

    /// The archive refused the file.
    #[error("{0}")]
    Rejected(String),

    /// Transport or storage failure.
    #[error("document storage error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl DocumentStoreError {
    /// Wraps a storage error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
