//! Stage workflow: planning, starting and completing assembly tasks.

use super::{WorkflowError, WorkflowResult};
use crate::{
    assembly::{
        domain::{
            AssemblyDomainError, AssemblyTask, CompletionEvidence, TaskEvent, TaskStatus,
            check_stage_sequence, is_first_stage, is_last_stage, stage_group,
        },
        ports::AssemblyBackend,
    },
    calendar::PlannedAt,
    schedule::{
        domain::{CollectionFilter, ItemId, JobId, PlanUpdate, RoleId, Schedulable, TeamId},
        ports::BackendError,
    },
};
use chrono::NaiveDate;
use std::{collections::BTreeSet, sync::Arc};
use tracing::{debug, info, warn};

/// Drives assembly tasks through their state machine.
///
/// The engine keeps a local copy of the tasks it loaded. Every action is
/// checked locally first, applied to the copy, then sent to the backend;
/// a rejection replaces the copy with a fresh load. First and last stage
/// are answered from the loaded copy, so load whole job roles (the default
/// filter, or a job filter) rather than a team's slice.
pub struct StageWorkflowEngine<B: AssemblyBackend> {
    backend: Arc<B>,
    filter: CollectionFilter,
    tasks: Vec<AssemblyTask>,
}

impl<B: AssemblyBackend> StageWorkflowEngine<B> {
    /// Creates an engine with an empty collection.
    #[must_use]
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            filter: CollectionFilter::default(),
            tasks: Vec::new(),
        }
    }

    /// Sets the filter used by [`Self::load`].
    #[must_use]
    pub fn with_filter(mut self, filter: CollectionFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Returns the backend.
    #[must_use]
    pub const fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    /// Replaces the local tasks with the backend's.
    ///
    /// Stage groups whose orders are not contiguous are logged, not
    /// rejected.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Persistence`] when the fetch fails.
    pub async fn load(&mut self) -> WorkflowResult<&[AssemblyTask]> {
        self.refresh().await?;
        Ok(&self.tasks)
    }

    pub(crate) async fn refresh(&mut self) -> Result<(), BackendError> {
        let fetched = self.backend.fetch_collection(&self.filter).await?;
        let filter = &self.filter;
        self.tasks = fetched
            .into_iter()
            .filter(|task| filter.matches(task))
            .collect();

        let groups: BTreeSet<(&JobId, &RoleId)> =
            self.tasks.iter().map(|task| (task.job(), task.role())).collect();
        for (job_id, role_id) in groups {
            if let Err(err) = check_stage_sequence(&self.tasks, job_id, role_id) {
                warn!(error = %err, "inconsistent stage orders");
            }
        }
        debug!(count = self.tasks.len(), "assembly tasks loaded");
        Ok(())
    }

    /// Returns the loaded tasks.
    #[must_use]
    pub fn tasks(&self) -> &[AssemblyTask] {
        &self.tasks
    }

    /// Looks up a loaded task.
    #[must_use]
    pub fn task(&self, id: &ItemId) -> Option<&AssemblyTask> {
        self.tasks.iter().find(|task| task.id() == id)
    }

    fn require(&self, id: &ItemId) -> WorkflowResult<&AssemblyTask> {
        self.task(id)
            .ok_or_else(|| WorkflowError::TaskNotFound(id.clone()))
    }

    /// Tasks of a job, grouped by role and ordered by stage.
    #[must_use]
    pub fn job_tasks(&self, job_id: &JobId) -> Vec<&AssemblyTask> {
        let mut tasks: Vec<_> = self.tasks.iter().filter(|task| task.job() == job_id).collect();
        tasks.sort_by(|a, b| {
            a.role()
                .cmp(b.role())
                .then_with(|| a.stage_order().cmp(&b.stage_order()))
        });
        tasks
    }

    /// Stages of `task`'s job role in order.
    #[must_use]
    pub fn stage_group(&self, task: &AssemblyTask) -> Vec<&AssemblyTask> {
        stage_group(&self.tasks, task.job(), task.role())
    }

    /// Returns whether `task` is currently the first stage of its role.
    #[must_use]
    pub fn is_first_stage(&self, task: &AssemblyTask) -> bool {
        is_first_stage(&self.tasks, task)
    }

    /// Returns whether `task` is currently the last stage of its role.
    #[must_use]
    pub fn is_last_stage(&self, task: &AssemblyTask) -> bool {
        is_last_stage(&self.tasks, task)
    }

    /// Tasks whose estimated date passed before `today` without completion.
    #[must_use]
    pub fn overdue_tasks(&self, today: NaiveDate) -> Vec<&AssemblyTask> {
        self.tasks
            .iter()
            .filter(|task| task.is_overdue(today))
            .collect()
    }

    /// Plans a task on `planned_at` with `team_id`.
    ///
    /// Postponing an already planned task is refused here; drag it on the
    /// calendar so the delay gate records a justification.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Domain`] when the task is neither pending nor
    /// planned, [`WorkflowError::RequiresJustification`] for a postponement
    /// and [`WorkflowError::Persistence`] when the backend rejects it.
    pub async fn plan_task(
        &mut self,
        id: &ItemId,
        planned_at: PlannedAt,
        team_id: Option<TeamId>,
    ) -> WorkflowResult<()> {
        let task = self.require(id)?;
        let status = task.status().transition(TaskEvent::Plan)?;
        let postponed = task
            .planned_date()
            .is_some_and(|current| current.is_postponed_by(planned_at.date()));
        if postponed {
            return Err(WorkflowError::RequiresJustification(id.clone()));
        }

        let update = PlanUpdate {
            planned_date: Some(planned_at),
            team_id,
            status,
        };
        let snapshot = self.tasks.clone();
        if let Some(task) = self.task_mut(id) {
            task.apply_plan(&update);
        }
        match self.backend.update_plan(id, &update).await {
            Ok(()) => {
                info!(task_id = %id, %planned_at, "assembly task planned");
                Ok(())
            }
            Err(err) => Err(self.reconcile(err, snapshot).await),
        }
    }

    /// Starts a planned task or resumes a blocked one.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Domain`] when the task has unresolved issues
    /// or is not planned or blocked, and [`WorkflowError::Persistence`] when
    /// the backend rejects it.
    pub async fn start_task(&mut self, id: &ItemId) -> WorkflowResult<()> {
        let task = self.require(id)?;
        task.ensure_no_pending_issues()?;
        task.status().transition(TaskEvent::Start)?;

        let snapshot = self.tasks.clone();
        self.apply_event(id, TaskEvent::Start)?;
        match self.backend.start_task(id).await {
            Ok(()) => {
                info!(task_id = %id, "assembly task started");
                Ok(())
            }
            Err(err) => Err(self.reconcile(err, snapshot).await),
        }
    }

    /// Completes a task with `evidence`.
    ///
    /// Photos before and after are always required; the customer signature
    /// only for the last stage of the role. Nothing is sent unless every
    /// local check passes.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Evidence`] for missing evidence,
    /// [`WorkflowError::Domain`] for unresolved issues or a task that is not
    /// in progress and [`WorkflowError::Persistence`] when the backend
    /// rejects it.
    pub async fn complete_task(
        &mut self,
        id: &ItemId,
        evidence: &CompletionEvidence,
    ) -> WorkflowResult<()> {
        let task = self.require(id)?;
        evidence.check(self.is_last_stage(task))?;
        task.ensure_no_pending_issues()?;
        task.status().transition(TaskEvent::Complete)?;

        let snapshot = self.tasks.clone();
        self.apply_event(id, TaskEvent::Complete)?;
        match self.backend.complete_task(id, evidence).await {
            Ok(()) => {
                info!(task_id = %id, "assembly task completed");
                Ok(())
            }
            Err(err) => Err(self.reconcile(err, snapshot).await),
        }
    }

    fn open_tasks(&self, job_id: &JobId) -> Vec<&AssemblyTask> {
        self.job_tasks(job_id)
            .into_iter()
            .filter(|task| !task.is_terminal())
            .collect()
    }

    fn job_is_blocked(&self, job_id: &JobId) -> bool {
        self.job_tasks(job_id)
            .iter()
            .any(|task| task.status() == TaskStatus::Blocked || task.has_pending_issues())
    }

    /// Returns whether "complete all" can be offered for a job.
    #[must_use]
    pub fn can_complete_all(&self, job_id: &JobId) -> bool {
        let open = self.open_tasks(job_id);
        !open.is_empty()
            && !self.job_is_blocked(job_id)
            && open
                .iter()
                .all(|task| matches!(task.status(), TaskStatus::Planned | TaskStatus::InProgress))
    }

    /// Completes every open task of a job with one evidence bundle.
    ///
    /// The checks of [`Self::complete_task`] run once for the batch. The
    /// customer signature is always required, even when every open task
    /// is an intermediate stage.
    /// Planned tasks are started and completed in one step.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::NothingToComplete`] when no task is open,
    /// [`WorkflowError::Evidence`] for missing evidence,
    /// [`WorkflowError::JobBlocked`] when a task is blocked or has issues,
    /// [`WorkflowError::Domain`] when an open task is still pending and
    /// [`WorkflowError::Persistence`] when the backend rejects the batch.
    pub async fn complete_all_tasks(
        &mut self,
        job_id: &JobId,
        evidence: &CompletionEvidence,
    ) -> WorkflowResult<usize> {
        let open = self.open_tasks(job_id);
        if open.is_empty() {
            return Err(WorkflowError::NothingToComplete(job_id.clone()));
        }
        evidence.check(true)?;
        if self.job_is_blocked(job_id) {
            return Err(WorkflowError::JobBlocked(job_id.clone()));
        }
        let mut targets = Vec::with_capacity(open.len());
        for task in open {
            let steps: &[TaskEvent] = match task.status() {
                TaskStatus::Planned => &[TaskEvent::Start, TaskEvent::Complete],
                TaskStatus::InProgress => &[TaskEvent::Complete],
                from => {
                    return Err(AssemblyDomainError::InvalidTransition {
                        from,
                        event: TaskEvent::Complete,
                    }
                    .into());
                }
            };
            targets.push((task.id().clone(), steps));
        }

        let snapshot = self.tasks.clone();
        for (id, steps) in &targets {
            for event in *steps {
                self.apply_event(id, *event)?;
            }
        }
        match self.backend.complete_all_tasks(job_id, evidence).await {
            Ok(completed) => {
                info!(job_id = %job_id, completed, "job assembly completed");
                Ok(completed)
            }
            Err(err) => Err(self.reconcile(err, snapshot).await),
        }
    }

    fn task_mut(&mut self, id: &ItemId) -> Option<&mut AssemblyTask> {
        self.tasks.iter_mut().find(|task| task.id() == id)
    }

    fn apply_event(&mut self, id: &ItemId, event: TaskEvent) -> WorkflowResult<()> {
        let task = self
            .task_mut(id)
            .ok_or_else(|| WorkflowError::TaskNotFound(id.clone()))?;
        task.apply_event(event)?;
        Ok(())
    }

    /// Reloads after a rejected action, restoring `snapshot` when the
    /// reload fails too.
    async fn reconcile(
        &mut self,
        err: BackendError,
        snapshot: Vec<AssemblyTask>,
    ) -> WorkflowError {
        warn!(error = %err, "assembly action rejected, reloading");
        if let Err(reload_err) = self.refresh().await {
            warn!(error = %reload_err, "reload failed, reverting local change");
            self.tasks = snapshot;
        }
        err.into()
    }
}
