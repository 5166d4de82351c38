//! Measurement appointments.

use super::{ItemId, ItemKind, JobId, ParseStatusError, PlanUpdate, Schedulable, TeamId};
use crate::{calendar::PlannedAt, config::SchedulingConfig};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Appointment lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    /// The job is waiting for a measurement appointment.
    AwaitingAppointment,
    /// An appointment has been set.
    Scheduled,
    /// The measurement has been taken.
    Measured,
}

impl AppointmentStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AwaitingAppointment => "awaiting_appointment",
            Self::Scheduled => "scheduled",
            Self::Measured => "measured",
        }
    }
}

impl TryFrom<&str> for AppointmentStatus {
    type Error = ParseStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "awaiting_appointment" => Ok(Self::AwaitingAppointment),
            "scheduled" => Ok(Self::Scheduled),
            "measured" => Ok(Self::Measured),
            _ => Err(ParseStatusError(value.to_owned())),
        }
    }
}

/// Measurement appointment of a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    id: ItemId,
    job_id: JobId,
    customer_name: String,
    appointment_at: Option<PlannedAt>,
    team_id: Option<TeamId>,
    status: AppointmentStatus,
}

impl Appointment {
    /// Creates an appointment request still waiting for a date.
    #[must_use]
    pub fn new(id: ItemId, job_id: JobId, customer_name: impl Into<String>) -> Self {
        Self {
            id,
            job_id,
            customer_name: customer_name.into(),
            appointment_at: None,
            team_id: None,
            status: AppointmentStatus::AwaitingAppointment,
        }
    }

    /// Sets the appointment date and time, marking it scheduled.
    #[must_use]
    pub const fn scheduled_at(mut self, appointment_at: PlannedAt) -> Self {
        self.appointment_at = Some(appointment_at);
        self.status = AppointmentStatus::Scheduled;
        self
    }

    /// Assigns the measuring team.
    #[must_use]
    pub fn with_team(mut self, team_id: TeamId) -> Self {
        self.team_id = Some(team_id);
        self
    }

    /// Marks the measurement as taken.
    #[must_use]
    pub const fn measured(mut self) -> Self {
        self.status = AppointmentStatus::Measured;
        self
    }

    /// Returns the customer name.
    #[must_use]
    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    /// Returns the appointment slot, if set.
    #[must_use]
    pub const fn appointment_at(&self) -> Option<PlannedAt> {
        self.appointment_at
    }
}

impl Schedulable for Appointment {
    type Status = AppointmentStatus;

    const KIND: ItemKind = ItemKind::Appointment;

    fn id(&self) -> &ItemId {
        &self.id
    }

    fn planned_date(&self) -> Option<PlannedAt> {
        self.appointment_at
    }

    fn status(&self) -> AppointmentStatus {
        self.status
    }

    fn is_terminal(&self) -> bool {
        self.status == AppointmentStatus::Measured
    }

    fn planned_status(&self) -> AppointmentStatus {
        AppointmentStatus::Scheduled
    }

    fn unplanned_status(&self) -> Option<AppointmentStatus> {
        match self.status {
            AppointmentStatus::AwaitingAppointment | AppointmentStatus::Scheduled => {
                Some(AppointmentStatus::AwaitingAppointment)
            }
            AppointmentStatus::Measured => None,
        }
    }

    fn apply_plan(&mut self, update: &PlanUpdate<AppointmentStatus>) {
        self.appointment_at = update.planned_date;
        self.team_id.clone_from(&update.team_id);
        self.status = update.status;
    }

    /// Moved appointments keep their time of day; first placements use the
    /// configured default time.
    fn placement_on(&self, date: NaiveDate, config: &SchedulingConfig) -> PlannedAt {
        match self.appointment_at.and_then(PlannedAt::time) {
            Some(time) => PlannedAt::at(date, time),
            None => PlannedAt::at(date, config.default_appointment_time),
        }
    }

    fn team_id(&self) -> Option<&TeamId> {
        self.team_id.as_ref()
    }

    fn job_id(&self) -> Option<&JobId> {
        Some(&self.job_id)
    }
}
