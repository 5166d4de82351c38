//! Advisory conflict warnings while planning.

use crate::schedule::{domain::TeamId, ports::AvailabilityPort};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{debug, warn};

/// Turns availability lookups into an optional warning message.
///
/// The advice never blocks a submission: lookup failures are logged and
/// reported as "no warning".
#[derive(Clone)]
pub struct AvailabilityAdvisor<P: AvailabilityPort> {
    port: Arc<P>,
}

impl<P: AvailabilityPort> AvailabilityAdvisor<P> {
    /// Creates an advisor backed by `port`.
    #[must_use]
    pub const fn new(port: Arc<P>) -> Self {
        Self { port }
    }

    /// Returns the conflict warning for `team_id` on `date`, if any.
    pub async fn check(&self, team_id: &TeamId, date: NaiveDate) -> Option<String> {
        match self.port.check_availability(team_id, date).await {
            Ok(report) => {
                debug!(
                    team_id = %team_id,
                    %date,
                    existing = report.existing_task_count,
                    "availability checked"
                );
                report.warning.filter(|warning| !warning.trim().is_empty())
            }
            Err(err) => {
                warn!(team_id = %team_id, %date, error = %err, "availability check failed");
                None
            }
        }
    }
}

/// Team and date chosen in a planning form, with the current warning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanningDraft {
    team_id: Option<TeamId>,
    date: Option<NaiveDate>,
    warning: Option<String>,
}

impl PlanningDraft {
    /// Creates an empty draft.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the chosen team.
    #[must_use]
    pub const fn team_id(&self) -> Option<&TeamId> {
        self.team_id.as_ref()
    }

    /// Returns the chosen day.
    #[must_use]
    pub const fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    /// Returns the current warning.
    #[must_use]
    pub fn warning(&self) -> Option<&str> {
        self.warning.as_deref()
    }

    /// Changes the team and refreshes the warning.
    pub async fn set_team<P: AvailabilityPort>(
        &mut self,
        advisor: &AvailabilityAdvisor<P>,
        team_id: Option<TeamId>,
    ) {
        self.team_id = team_id;
        self.refresh(advisor).await;
    }

    /// Changes the day and refreshes the warning.
    pub async fn set_date<P: AvailabilityPort>(
        &mut self,
        advisor: &AvailabilityAdvisor<P>,
        date: Option<NaiveDate>,
    ) {
        self.date = date;
        self.refresh(advisor).await;
    }

    async fn refresh<P: AvailabilityPort>(&mut self, advisor: &AvailabilityAdvisor<P>) {
        self.warning = match (&self.team_id, self.date) {
            (Some(team_id), Some(date)) => advisor.check(team_id, date).await,
            _ => None,
        };
    }
}
