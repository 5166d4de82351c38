//! Assembly tasks.

use super::{AssemblyDomainError, Issue, IssueId, TaskEvent, TaskStatus};
use crate::{
    calendar::PlannedAt,
    schedule::domain::{ItemId, ItemKind, JobId, PlanUpdate, RoleId, Schedulable, TeamId},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 1-based position of a stage within its job role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct StageOrder(u32);

impl StageOrder {
    /// Creates a validated stage order.
    ///
    /// # Errors
    ///
    /// Returns [`AssemblyDomainError::InvalidStageOrder`] for zero.
    pub const fn new(value: u32) -> Result<Self, AssemblyDomainError> {
        if value == 0 {
            return Err(AssemblyDomainError::InvalidStageOrder(value));
        }
        Ok(Self(value))
    }

    /// Returns the order as an integer.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for StageOrder {
    type Error = AssemblyDomainError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<StageOrder> for u32 {
    fn from(value: StageOrder) -> Self {
        value.0
    }
}

impl fmt::Display for StageOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One installation stage of a job role.
///
/// Whether a task is the first or last stage is never stored; ask
/// [`super::is_first_stage`] or [`super::is_last_stage`] against the
/// current collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssemblyTask {
    id: ItemId,
    job_id: JobId,
    role_id: RoleId,
    stage_name: String,
    stage_order: StageOrder,
    status: TaskStatus,
    team_id: Option<TeamId>,
    planned_date: Option<PlannedAt>,
    estimated_date: Option<NaiveDate>,
    #[serde(default)]
    issues: Vec<Issue>,
}

impl AssemblyTask {
    /// Creates a pending, unplanned stage.
    #[must_use]
    pub fn new(
        id: ItemId,
        job_id: JobId,
        role_id: RoleId,
        stage_name: impl Into<String>,
        stage_order: StageOrder,
    ) -> Self {
        Self {
            id,
            job_id,
            role_id,
            stage_name: stage_name.into(),
            stage_order,
            status: TaskStatus::Pending,
            team_id: None,
            planned_date: None,
            estimated_date: None,
            issues: Vec::new(),
        }
    }

    /// Plans the stage on `planned_at`, marking it planned.
    #[must_use]
    pub const fn planned_at(mut self, planned_at: PlannedAt) -> Self {
        self.planned_date = Some(planned_at);
        self.status = TaskStatus::Planned;
        self
    }

    /// Assigns the team.
    #[must_use]
    pub fn with_team(mut self, team_id: TeamId) -> Self {
        self.team_id = Some(team_id);
        self
    }

    /// Sets the status as loaded from the backend.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the job's estimated assembly date.
    #[must_use]
    pub const fn with_estimated_date(mut self, date: NaiveDate) -> Self {
        self.estimated_date = Some(date);
        self
    }

    /// Attaches an issue as loaded from the backend.
    #[must_use]
    pub fn with_issue(mut self, issue: Issue) -> Self {
        self.issues.push(issue);
        self
    }

    /// Returns the stage name.
    #[must_use]
    pub fn stage(&self) -> &str {
        &self.stage_name
    }

    /// Returns the stage order.
    #[must_use]
    pub const fn stage_order(&self) -> StageOrder {
        self.stage_order
    }

    /// Returns the owning job.
    #[must_use]
    pub const fn job(&self) -> &JobId {
        &self.job_id
    }

    /// Returns the job role.
    #[must_use]
    pub const fn role(&self) -> &RoleId {
        &self.role_id
    }

    /// Returns the assigned team.
    #[must_use]
    pub const fn team(&self) -> Option<&TeamId> {
        self.team_id.as_ref()
    }

    /// Returns the estimated assembly date.
    #[must_use]
    pub const fn estimated_date(&self) -> Option<NaiveDate> {
        self.estimated_date
    }

    /// Returns every issue of the task.
    #[must_use]
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// Returns the unresolved issues.
    pub fn pending_issues(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|issue| issue.is_pending())
    }

    /// Returns whether unresolved issues remain.
    #[must_use]
    pub fn has_pending_issues(&self) -> bool {
        self.pending_issues().next().is_some()
    }

    /// Looks up an issue.
    #[must_use]
    pub fn issue(&self, id: &IssueId) -> Option<&Issue> {
        self.issues.iter().find(|issue| issue.id() == id)
    }

    /// Returns whether the estimated date passed without completion.
    #[must_use]
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.status.is_terminal() && self.estimated_date.is_some_and(|date| date < today)
    }

    /// Fails when unresolved issues remain.
    ///
    /// # Errors
    ///
    /// Returns [`AssemblyDomainError::PendingIssues`] with the open count.
    pub fn ensure_no_pending_issues(&self) -> Result<(), AssemblyDomainError> {
        match self.pending_issues().count() {
            0 => Ok(()),
            count => Err(AssemblyDomainError::PendingIssues {
                task_id: self.id.clone(),
                count,
            }),
        }
    }

    /// Applies `event` through the state machine.
    ///
    /// # Errors
    ///
    /// Returns [`AssemblyDomainError::InvalidTransition`] when the event is
    /// not allowed in the current status.
    pub fn apply_event(&mut self, event: TaskEvent) -> Result<TaskStatus, AssemblyDomainError> {
        self.status = self.status.transition(event)?;
        Ok(self.status)
    }

    pub(crate) fn push_issue(&mut self, issue: Issue) {
        self.issues.push(issue);
    }

    pub(crate) fn issue_mut(&mut self, id: &IssueId) -> Option<&mut Issue> {
        self.issues.iter_mut().find(|issue| issue.id() == id)
    }
}

impl Schedulable for AssemblyTask {
    type Status = TaskStatus;

    const KIND: ItemKind = ItemKind::AssemblyTask;

    fn id(&self) -> &ItemId {
        &self.id
    }

    fn planned_date(&self) -> Option<PlannedAt> {
        self.planned_date
    }

    fn status(&self) -> TaskStatus {
        self.status
    }

    fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Moving a started or blocked task keeps its status.
    fn planned_status(&self) -> TaskStatus {
        self.status.transition(TaskEvent::Plan).unwrap_or(self.status)
    }

    fn unplanned_status(&self) -> Option<TaskStatus> {
        self.status.transition(TaskEvent::Unplan).ok()
    }

    fn apply_plan(&mut self, update: &PlanUpdate<TaskStatus>) {
        self.planned_date = update.planned_date;
        self.team_id.clone_from(&update.team_id);
        self.status = update.status;
    }

    fn team_id(&self) -> Option<&TeamId> {
        self.team_id.as_ref()
    }

    fn job_id(&self) -> Option<&JobId> {
        Some(&self.job_id)
    }

    fn role_id(&self) -> Option<&RoleId> {
        Some(&self.role_id)
    }

    fn stage_name(&self) -> Option<&str> {
        Some(&self.stage_name)
    }
}
