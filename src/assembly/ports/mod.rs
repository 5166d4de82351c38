//! Port contracts for assembly workflows.

pub mod backend;
pub mod documents;

pub use backend::{AssemblyBackend, ReportedIssue};
pub use documents::{DocumentStore, DocumentStoreError, DocumentUpload, UploadedDocument};
