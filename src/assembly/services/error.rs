//! Service-level errors for assembly workflows.

use crate::{
    assembly::domain::{AssemblyDomainError, EvidenceError, IssueId, IssueReportError},
    schedule::{
        domain::{ItemId, JobId},
        ports::BackendError,
    },
};
use thiserror::Error;

/// Errors returned by [`super::StageWorkflowEngine`].
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// The task is not in the loaded collection.
    #[error("assembly task not found: {0}")]
    TaskNotFound(ItemId),

    /// The job has no open task.
    #[error("job {0} has no open assembly task")]
    NothingToComplete(JobId),

    /// Moving a planned task later must go through the delay gate.
    #[error("postponing task {0} needs a delay justification")]
    RequiresJustification(ItemId),

    /// A task of the job is blocked or carries an unresolved issue.
    #[error("job {0} has blocked tasks or unresolved issues")]
    JobBlocked(JobId),

    /// A state machine or ordering rule was violated.
    #[error(transparent)]
    Domain(#[from] AssemblyDomainError),

    /// Completion evidence is insufficient; nothing was sent.
    #[error(transparent)]
    Evidence(#[from] EvidenceError),

    /// The backend rejected the action; local state was reloaded.
    #[error(transparent)]
    Persistence(#[from] BackendError),
}

/// Result type for workflow operations.
pub type WorkflowResult<T> = Result<T, WorkflowError>;

/// Errors returned by [`super::IssueLedger`].
#[derive(Debug, Error)]
pub enum IssueLedgerError {
    /// The task is not in the loaded collection.
    #[error("assembly task not found: {0}")]
    TaskNotFound(ItemId),

    /// The issue is not attached to the task.
    #[error("issue not found: {0}")]
    IssueNotFound(IssueId),

    /// The issue has no corrective order yet.
    #[error("issue {0} has no replacement order yet")]
    ReplacementMissing(IssueId),

    /// The issue is already resolved.
    #[error("issue {0} is already resolved")]
    AlreadyResolved(IssueId),

    /// The report is incomplete; nothing was sent.
    #[error(transparent)]
    Report(#[from] IssueReportError),

    /// The task cannot take an issue in its current status.
    #[error(transparent)]
    Domain(#[from] AssemblyDomainError),

    /// The backend rejected the action.
    #[error(transparent)]
    Persistence(#[from] BackendError),
}
