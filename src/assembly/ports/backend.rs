//! Backend port for assembly task actions.

use crate::{
    assembly::domain::{AssemblyTask, CompletionEvidence, Issue, IssueId, IssueReport},
    schedule::{
        domain::{ItemId, JobId},
        ports::{BackendResult, ScheduleBackend},
    },
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Backend answer to an issue report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportedIssue {
    /// The stored issue.
    pub issue: Issue,
    /// Corrective order, when it was created synchronously.
    pub replacement_order_id: Option<ItemId>,
}

/// Assembly task actions on top of plan changes.
///
/// Implementations apply their own business rules and may reject any
/// action with [`BackendError::Rejected`](crate::schedule::ports::BackendError::Rejected).
#[async_trait]
pub trait AssemblyBackend: ScheduleBackend<AssemblyTask> {
    /// Starts or resumes a task.
    async fn start_task(&self, id: &ItemId) -> BackendResult<()>;

    /// Completes one task with its evidence.
    async fn complete_task(&self, id: &ItemId, evidence: &CompletionEvidence)
    -> BackendResult<()>;

    /// Completes every open task of a job with one evidence bundle and
    /// returns how many were completed.
    async fn complete_all_tasks(
        &self,
        job_id: &JobId,
        evidence: &CompletionEvidence,
    ) -> BackendResult<usize>;

    /// Records an issue and blocks the task.
    async fn report_issue(&self, id: &ItemId, report: &IssueReport)
    -> BackendResult<ReportedIssue>;

    /// Marks an issue resolved.
    async fn resolve_issue(&self, id: &ItemId, issue_id: &IssueId) -> BackendResult<()>;
}
