//! The schedulable-item capability shared by every calendar.

use super::{ItemId, JobId, RoleId, TeamId};
use crate::{calendar::PlannedAt, config::SchedulingConfig};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of item placed on a calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// Measurement appointment for a job.
    Appointment,
    /// Manufacturing order for a job role.
    ProductionOrder,
    /// On-site assembly stage for a job role.
    AssemblyTask,
}

impl ItemKind {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Appointment => "appointment",
            Self::ProductionOrder => "production_order",
            Self::AssemblyTask => "assembly_task",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Plan change sent to the backend: `{plannedDate, teamId, status}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanUpdate<S> {
    /// New plan, or `None` to return the item to the unplanned pool.
    pub planned_date: Option<PlannedAt>,
    /// Team assigned to the item, if any.
    pub team_id: Option<TeamId>,
    /// Status the item has after the change.
    pub status: S,
}

/// Filters applied when fetching and displaying a collection.
///
/// Unset fields do not constrain the result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionFilter {
    /// Only items assigned to this team.
    pub team_id: Option<TeamId>,
    /// Only items of this job.
    pub job_id: Option<JobId>,
    /// Only items of this job role.
    pub role_id: Option<RoleId>,
    /// Only assembly stages with this name.
    pub stage_name: Option<String>,
}

impl CollectionFilter {
    /// Returns a filter restricted to one team.
    #[must_use]
    pub fn for_team(team_id: TeamId) -> Self {
        Self {
            team_id: Some(team_id),
            ..Self::default()
        }
    }

    /// Returns a filter restricted to one job.
    #[must_use]
    pub fn for_job(job_id: JobId) -> Self {
        Self {
            job_id: Some(job_id),
            ..Self::default()
        }
    }

    /// Returns whether `item` passes every set constraint.
    #[must_use]
    pub fn matches<T: Schedulable>(&self, item: &T) -> bool {
        fn passes<V: PartialEq + ?Sized>(wanted: Option<&V>, actual: Option<&V>) -> bool {
            wanted.is_none_or(|value| actual == Some(value))
        }

        passes(self.team_id.as_ref(), item.team_id())
            && passes(self.job_id.as_ref(), item.job_id())
            && passes(self.role_id.as_ref(), item.role_id())
            && passes(self.stage_name.as_deref(), item.stage_name())
    }
}

/// Capability of anything that can be placed on a calendar day.
///
/// Implemented by appointments, production orders and assembly tasks. The
/// drag controller and the delay gate work only through this trait, so the
/// same rescheduling contract applies to every kind.
pub trait Schedulable: Clone + fmt::Debug + Send + Sync + 'static {
    /// Status type of the item.
    type Status: Copy + fmt::Debug + Eq + Serialize + Send + Sync + 'static;

    /// Kind recorded in delay audit entries.
    const KIND: ItemKind;

    /// Returns the item identifier.
    fn id(&self) -> &ItemId;

    /// Returns the current plan, if any.
    fn planned_date(&self) -> Option<PlannedAt>;

    /// Returns the current status.
    fn status(&self) -> Self::Status;

    /// Returns whether the item is finished and can no longer move.
    fn is_terminal(&self) -> bool;

    /// Status the item takes once a date is assigned.
    fn planned_status(&self) -> Self::Status;

    /// Status the item takes when returned to the unplanned pool, or
    /// `None` when it may not be unplanned in its current state.
    fn unplanned_status(&self) -> Option<Self::Status>;

    /// Applies a plan change.
    fn apply_plan(&mut self, update: &PlanUpdate<Self::Status>);

    /// Plan produced by dropping the item on `date`.
    fn placement_on(&self, date: NaiveDate, _config: &SchedulingConfig) -> PlannedAt {
        PlannedAt::on(date)
    }

    /// Latest day the item may be planned on.
    fn latest_allowed_date(&self) -> Option<NaiveDate> {
        None
    }

    /// Returns the assigned team, if any.
    fn team_id(&self) -> Option<&TeamId> {
        None
    }

    /// Returns the owning job, if known.
    fn job_id(&self) -> Option<&JobId> {
        None
    }

    /// Returns the job role, if any.
    fn role_id(&self) -> Option<&RoleId> {
        None
    }

    /// Returns the assembly stage name, if any.
    fn stage_name(&self) -> Option<&str> {
        None
    }

    /// Builds the plan change for assigning `planned_date`.
    fn plan_update_for(&self, planned_date: PlannedAt) -> PlanUpdate<Self::Status> {
        PlanUpdate {
            planned_date: Some(planned_date),
            team_id: self.team_id().cloned(),
            status: self.planned_status(),
        }
    }

    /// Builds the plan change restoring the item's current plan.
    fn current_plan(&self) -> PlanUpdate<Self::Status> {
        PlanUpdate {
            planned_date: self.planned_date(),
            team_id: self.team_id().cloned(),
            status: self.status(),
        }
    }
}

/// Items that have no date and are not finished, in input order.
pub fn unplanned_items<'a, T: Schedulable>(
    items: impl IntoIterator<Item = &'a T>,
) -> Vec<&'a T> {
    items
        .into_iter()
        .filter(|item| item.planned_date().is_none() && !item.is_terminal())
        .collect()
}
