//! In-memory assembly backend and document store.

use crate::{
    assembly::{
        domain::{
            AssemblyTask, CompletionEvidence, Issue, IssueId, IssueReport, TaskEvent, TaskStatus,
            is_last_stage,
        },
        ports::{
            AssemblyBackend, DocumentStore, DocumentStoreError, DocumentUpload, ReportedIssue,
            UploadedDocument,
        },
    },
    schedule::{
        adapters::memory::{BackendOperation, InMemoryScheduleBackend},
        domain::{
            CollectionFilter, DelayRecord, ItemId, JobId, PlanUpdate, ProductionOrder,
            Schedulable, TeamId,
        },
        ports::{
            AvailabilityError, AvailabilityPort, AvailabilityReport, BackendError, BackendResult,
            ScheduleBackend,
        },
    },
};
use async_trait::async_trait;
use chrono::NaiveDate;
use mockable::{Clock, DefaultClock};
use std::sync::{Arc, RwLock};
use uuid::Uuid;

fn generated_id(prefix: &str) -> String {
    let suffix: String = Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(8)
        .collect();
    format!("{prefix}-{}", suffix.to_uppercase())
}

fn rejected(err: impl ToString) -> BackendError {
    BackendError::Rejected(err.to_string())
}

fn lock_error(err: impl ToString) -> BackendError {
    BackendError::persistence(std::io::Error::other(err.to_string()))
}

/// Replacement order waiting to be created.
#[derive(Debug, Clone)]
struct QueuedReplacement {
    task_id: ItemId,
    issue_id: IssueId,
}

#[derive(Debug, Default)]
struct ReplacementQueue {
    deferred: bool,
    queued: Vec<QueuedReplacement>,
}

/// Thread-safe in-memory assembly backend.
///
/// Tasks live in an [`InMemoryScheduleBackend`], so plan changes, delay
/// records, call tracking and failure injection behave exactly as for the
/// other calendars. Replacement orders are created as pending
/// [`ProductionOrder`]s in a companion backend.
pub struct InMemoryAssemblyBackend<C = DefaultClock> {
    tasks: InMemoryScheduleBackend<AssemblyTask>,
    production: InMemoryScheduleBackend<ProductionOrder>,
    replacements: Arc<RwLock<ReplacementQueue>>,
    clock: Arc<C>,
}

impl<C> Clone for InMemoryAssemblyBackend<C> {
    fn clone(&self) -> Self {
        Self {
            tasks: self.tasks.clone(),
            production: self.production.clone(),
            replacements: Arc::clone(&self.replacements),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl InMemoryAssemblyBackend<DefaultClock> {
    /// Creates a backend seeded with `tasks`, using the system clock.
    #[must_use]
    pub fn with_tasks(tasks: impl IntoIterator<Item = AssemblyTask>) -> Self {
        Self::new(
            InMemoryScheduleBackend::with_items(tasks),
            Arc::new(DefaultClock),
        )
    }
}

impl<C: Clock + Send + Sync> InMemoryAssemblyBackend<C> {
    /// Creates a backend over `tasks` stamping issues with `clock`.
    #[must_use]
    pub fn new(tasks: InMemoryScheduleBackend<AssemblyTask>, clock: Arc<C>) -> Self {
        Self {
            tasks,
            production: InMemoryScheduleBackend::new(),
            replacements: Arc::new(RwLock::new(ReplacementQueue::default())),
            clock,
        }
    }

    /// Creates replacement orders only when
    /// [`Self::fulfil_replacement_orders`] is called, like a backend that
    /// spawns them asynchronously.
    #[must_use]
    pub fn with_deferred_replacements(self) -> Self {
        if let Ok(mut queue) = self.replacements.write() {
            queue.deferred = true;
        }
        self
    }

    /// Returns the task store.
    #[must_use]
    pub const fn tasks(&self) -> &InMemoryScheduleBackend<AssemblyTask> {
        &self.tasks
    }

    /// Returns the production orders created as replacements.
    #[must_use]
    pub const fn production_orders(&self) -> &InMemoryScheduleBackend<ProductionOrder> {
        &self.production
    }

    /// Makes the next call of `operation` fail with `message`.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Persistence`] when the state lock is
    /// poisoned.
    pub fn fail_next(
        &self,
        operation: BackendOperation,
        message: impl Into<String>,
    ) -> BackendResult<()> {
        self.tasks.fail_next(operation, message)
    }

    /// Creates every queued replacement order and links it to its issue.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] when a store cannot be updated.
    pub fn fulfil_replacement_orders(&self) -> BackendResult<usize> {
        let queued = {
            let mut queue = self.replacements.write().map_err(lock_error)?;
            std::mem::take(&mut queue.queued)
        };
        let count = queued.len();
        for entry in queued {
            let order_id = self.create_replacement(&entry.task_id)?;
            self.tasks.write(|state| {
                let issue = state
                    .item_mut(&entry.task_id)?
                    .issue_mut(&entry.issue_id)
                    .ok_or_else(|| rejected(format!("issue not found: {}", entry.issue_id)))?;
                issue.link_replacement(order_id);
                Ok(())
            })?;
        }
        Ok(count)
    }

    fn create_replacement(&self, task_id: &ItemId) -> BackendResult<ItemId> {
        let task = self
            .tasks
            .item(task_id)?
            .ok_or_else(|| BackendError::NotFound(task_id.clone()))?;
        let order_id = ItemId::new(generated_id("PROD")).map_err(rejected)?;
        let order =
            ProductionOrder::new(order_id.clone(), task.job().clone(), task.role().clone());
        self.production.insert(order)?;
        Ok(order_id)
    }

    fn replacements_deferred(&self) -> BackendResult<bool> {
        let queue = self.replacements.read().map_err(lock_error)?;
        Ok(queue.deferred)
    }

    fn queue_replacement(&self, task_id: &ItemId, issue_id: &IssueId) -> BackendResult<()> {
        let mut queue = self.replacements.write().map_err(lock_error)?;
        queue.queued.push(QueuedReplacement {
            task_id: task_id.clone(),
            issue_id: issue_id.clone(),
        });
        Ok(())
    }
}

fn check_evidence(
    tasks: &[AssemblyTask],
    task: &AssemblyTask,
    evidence: &CompletionEvidence,
) -> BackendResult<()> {
    evidence
        .check(is_last_stage(tasks, task))
        .map_err(rejected)
}

fn complete_in_place(task: &mut AssemblyTask) -> BackendResult<()> {
    if task.status() == TaskStatus::Planned {
        task.apply_event(TaskEvent::Start).map_err(rejected)?;
    }
    task.apply_event(TaskEvent::Complete).map_err(rejected)?;
    Ok(())
}

#[async_trait]
impl<C: Clock + Send + Sync> ScheduleBackend<AssemblyTask> for InMemoryAssemblyBackend<C> {
    async fn fetch_collection(
        &self,
        filter: &CollectionFilter,
    ) -> BackendResult<Vec<AssemblyTask>> {
        self.tasks.fetch_collection(filter).await
    }

    async fn update_plan(
        &self,
        id: &ItemId,
        update: &PlanUpdate<TaskStatus>,
    ) -> BackendResult<()> {
        self.tasks.update_plan(id, update).await
    }

    async fn record_delay(&self, record: &DelayRecord) -> BackendResult<()> {
        ScheduleBackend::<AssemblyTask>::record_delay(&self.tasks, record).await
    }
}

#[async_trait]
impl<C: Clock + Send + Sync> AssemblyBackend for InMemoryAssemblyBackend<C> {
    async fn start_task(&self, id: &ItemId) -> BackendResult<()> {
        self.tasks.write(|state| {
            state.enter(BackendOperation::StartTask)?;
            let task = state.item_mut(id)?;
            task.ensure_no_pending_issues().map_err(rejected)?;
            task.apply_event(TaskEvent::Start).map_err(rejected)?;
            Ok(())
        })
    }

    async fn complete_task(
        &self,
        id: &ItemId,
        evidence: &CompletionEvidence,
    ) -> BackendResult<()> {
        self.tasks.write(|state| {
            state.enter(BackendOperation::CompleteTask)?;
            let task = state
                .items
                .iter()
                .find(|task| task.id() == id)
                .ok_or_else(|| BackendError::NotFound(id.clone()))?;
            task.ensure_no_pending_issues().map_err(rejected)?;
            check_evidence(&state.items, task, evidence)?;
            state
                .item_mut(id)?
                .apply_event(TaskEvent::Complete)
                .map_err(rejected)?;
            Ok(())
        })
    }

    async fn complete_all_tasks(
        &self,
        job_id: &JobId,
        evidence: &CompletionEvidence,
    ) -> BackendResult<usize> {
        self.tasks.write(|state| {
            state.enter(BackendOperation::CompleteAllTasks)?;
            let job_tasks: Vec<&AssemblyTask> =
                state.items.iter().filter(|task| task.job() == job_id).collect();
            if job_tasks.is_empty() {
                return Err(rejected(format!("no assembly tasks for job {job_id}")));
            }
            let pending: usize = job_tasks
                .iter()
                .map(|task| task.pending_issues().count())
                .sum();
            if pending > 0 {
                return Err(rejected(format!(
                    "{pending} pending issue(s); resolve them first"
                )));
            }
            evidence.check(true).map_err(rejected)?;

            let mut updated = Vec::with_capacity(job_tasks.len());
            for task in job_tasks.into_iter().filter(|task| !task.is_terminal()) {
                let mut next = task.clone();
                complete_in_place(&mut next)?;
                updated.push(next);
            }
            let completed = updated.len();
            for next in updated {
                let id = next.id().clone();
                *state.item_mut(&id)? = next;
            }
            Ok(completed)
        })
    }

    async fn report_issue(
        &self,
        id: &ItemId,
        report: &IssueReport,
    ) -> BackendResult<ReportedIssue> {
        let issue_id = IssueId::new(generated_id("ISS")).map_err(rejected)?;
        let issue = Issue::new(issue_id.clone(), id.clone(), report, self.clock.utc());

        self.tasks.write(|state| {
            state.enter(BackendOperation::ReportIssue)?;
            let task = state.item_mut(id)?;
            task.apply_event(TaskEvent::ReportIssue).map_err(rejected)?;
            task.push_issue(issue);
            Ok(())
        })?;

        let replacement_order_id = if !report.create_replacement {
            None
        } else if self.replacements_deferred()? {
            self.queue_replacement(id, &issue_id)?;
            None
        } else {
            let order_id = self.create_replacement(id)?;
            let linked = order_id.clone();
            self.tasks.write(|state| {
                if let Some(issue) = state.item_mut(id)?.issue_mut(&issue_id) {
                    issue.link_replacement(linked);
                }
                Ok(())
            })?;
            Some(order_id)
        };

        let stored = self
            .tasks
            .item(id)?
            .and_then(|task| task.issue(&issue_id).cloned())
            .ok_or_else(|| rejected(format!("issue not found: {issue_id}")))?;
        Ok(ReportedIssue {
            issue: stored,
            replacement_order_id,
        })
    }

    async fn resolve_issue(&self, id: &ItemId, issue_id: &IssueId) -> BackendResult<()> {
        self.tasks.write(|state| {
            state.enter(BackendOperation::ResolveIssue)?;
            let issue = state
                .item_mut(id)?
                .issue_mut(issue_id)
                .ok_or_else(|| rejected(format!("issue not found: {issue_id}")))?;
            issue.resolve();
            Ok(())
        })
    }
}

#[async_trait]
impl<C: Clock + Send + Sync> AvailabilityPort for InMemoryAssemblyBackend<C> {
    async fn check_availability(
        &self,
        team_id: &TeamId,
        date: NaiveDate,
    ) -> Result<AvailabilityReport, AvailabilityError> {
        self.tasks.check_availability(team_id, date).await
    }
}

fn store_lock_error(err: impl ToString) -> DocumentStoreError {
    DocumentStoreError::persistence(std::io::Error::other(err.to_string()))
}

/// In-memory document archive.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDocumentStore {
    documents: Arc<RwLock<Vec<(String, DocumentUpload)>>>,
}

impl InMemoryDocumentStore {
    /// Creates an empty archive.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the stored documents with their URLs.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::Persistence`] when the lock is
    /// poisoned.
    pub fn documents(&self) -> Result<Vec<(String, DocumentUpload)>, DocumentStoreError> {
        let documents = self
            .documents
            .read()
            .map_err(store_lock_error)?;
        Ok(documents.clone())
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn upload_document(
        &self,
        upload: &DocumentUpload,
    ) -> Result<UploadedDocument, DocumentStoreError> {
        let mut documents = self
            .documents
            .write()
            .map_err(store_lock_error)?;
        let url = format!(
            "/uploads/{}/{}/{}-{}",
            upload.owner_id,
            upload.kind.doc_type(),
            Uuid::new_v4().simple(),
            upload.file_name
        );
        documents.push((url.clone(), upload.clone()));
        Ok(UploadedDocument { url })
    }
}
