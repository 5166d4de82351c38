//! Issue reporting and resolution.

use super::{IssueLedgerError, StageWorkflowEngine};
use crate::{
    assembly::{
        domain::{AssemblyTask, Issue, IssueId, IssueReport, TaskEvent},
        ports::{AssemblyBackend, ReportedIssue},
    },
    config::{CatalogEntry, SchedulingConfig},
    schedule::domain::{ItemId, Schedulable},
};
use tracing::{debug, info, warn};

/// Records issues against assembly tasks and gates their resolution.
///
/// An issue blocks its task until it is resolved, and it can only be
/// resolved once the backend has linked a replacement order.
#[derive(Debug, Clone)]
pub struct IssueLedger {
    issue_types: Vec<CatalogEntry>,
    fault_sources: Vec<CatalogEntry>,
}

impl IssueLedger {
    /// Creates a ledger using the catalogs of `config`.
    #[must_use]
    pub fn new(config: &SchedulingConfig) -> Self {
        Self {
            issue_types: config.issue_types.clone(),
            fault_sources: config.fault_sources.clone(),
        }
    }

    /// Issue types offered for selection.
    pub fn issue_types(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.issue_types.iter().filter(|entry| entry.active)
    }

    /// Fault sources offered for selection.
    pub fn fault_sources(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.fault_sources.iter().filter(|entry| entry.active)
    }

    /// Reports an issue on a started or blocked task.
    ///
    /// The report is validated before anything is sent. A requested
    /// replacement order may appear on the issue only after a later reload.
    ///
    /// # Errors
    ///
    /// Returns [`IssueLedgerError::Report`] for an incomplete report,
    /// [`IssueLedgerError::Domain`] when the task is not in progress or
    /// blocked and [`IssueLedgerError::Persistence`] when the backend
    /// rejects it.
    pub async fn report_issue<B: AssemblyBackend>(
        &self,
        engine: &mut StageWorkflowEngine<B>,
        task_id: &ItemId,
        report: &IssueReport,
    ) -> Result<ReportedIssue, IssueLedgerError> {
        let task = engine
            .task(task_id)
            .ok_or_else(|| IssueLedgerError::TaskNotFound(task_id.clone()))?;
        report.validate(&self.issue_types, &self.fault_sources)?;
        task.status().transition(TaskEvent::ReportIssue)?;

        let reported = match engine.backend().report_issue(task_id, report).await {
            Ok(reported) => reported,
            Err(err) => {
                warn!(task_id = %task_id, error = %err, "issue report rejected");
                reload(engine).await;
                return Err(err.into());
            }
        };
        info!(
            task_id = %task_id,
            issue_id = %reported.issue.id(),
            replacement = reported.replacement_order_id.is_some(),
            "assembly issue reported"
        );
        reload(engine).await;
        Ok(reported)
    }

    /// Unresolved issues across the loaded tasks, with their task.
    #[must_use]
    pub fn pending_issues<'a, B: AssemblyBackend>(
        &self,
        engine: &'a StageWorkflowEngine<B>,
    ) -> Vec<(&'a AssemblyTask, &'a Issue)> {
        engine
            .tasks()
            .iter()
            .flat_map(|task| task.pending_issues().map(move |issue| (task, issue)))
            .collect()
    }

    /// Returns whether resolution can be offered for `issue`.
    #[must_use]
    pub fn can_resolve(&self, issue: &Issue) -> bool {
        issue.can_resolve()
    }

    /// Resolves an issue that has a replacement order.
    ///
    /// The task stays blocked until it is started again.
    ///
    /// # Errors
    ///
    /// Returns [`IssueLedgerError::ReplacementMissing`] without calling the
    /// backend when no replacement order is linked, and
    /// [`IssueLedgerError::Persistence`] when the backend rejects it.
    pub async fn resolve_issue<B: AssemblyBackend>(
        &self,
        engine: &mut StageWorkflowEngine<B>,
        task_id: &ItemId,
        issue_id: &IssueId,
    ) -> Result<(), IssueLedgerError> {
        let task = engine
            .task(task_id)
            .ok_or_else(|| IssueLedgerError::TaskNotFound(task_id.clone()))?;
        let issue = task
            .issue(issue_id)
            .ok_or_else(|| IssueLedgerError::IssueNotFound(issue_id.clone()))?;
        if !issue.is_pending() {
            return Err(IssueLedgerError::AlreadyResolved(issue_id.clone()));
        }
        if !self.can_resolve(issue) {
            debug!(issue_id = %issue_id, "resolution waits for a replacement order");
            return Err(IssueLedgerError::ReplacementMissing(issue_id.clone()));
        }

        let result = engine.backend().resolve_issue(task_id, issue_id).await;
        reload(engine).await;
        result?;
        info!(task_id = %task_id, issue_id = %issue_id, "assembly issue resolved");
        Ok(())
    }
}

async fn reload<B: AssemblyBackend>(engine: &mut StageWorkflowEngine<B>) {
    if let Err(err) = engine.refresh().await {
        warn!(error = %err, "reload after issue change failed");
    }
}
