//! Assembly task status and its state machine.

use super::AssemblyDomainError;
use crate::schedule::domain::ParseStatusError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of an assembly task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Created, no date yet.
    Pending,
    /// Date (and usually a team) assigned.
    Planned,
    /// Work on site has started.
    InProgress,
    /// Finished with evidence.
    Completed,
    /// Stopped by a reported issue.
    Blocked,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Planned => "planned",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Blocked => "blocked",
        }
    }

    /// Returns whether the status is terminal.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Applies `event`, returning the next status.
    ///
    /// # Errors
    ///
    /// Returns [`AssemblyDomainError::InvalidTransition`] when `event` is
    /// not allowed from this status.
    pub fn transition(self, event: TaskEvent) -> Result<Self, AssemblyDomainError> {
        match (self, event) {
            (Self::Pending | Self::Planned, TaskEvent::Plan) => Ok(Self::Planned),
            (Self::Pending | Self::Planned, TaskEvent::Unplan) => Ok(Self::Pending),
            (Self::Planned | Self::Blocked, TaskEvent::Start) => Ok(Self::InProgress),
            (Self::InProgress | Self::Blocked, TaskEvent::ReportIssue) => Ok(Self::Blocked),
            (Self::InProgress, TaskEvent::Complete) => Ok(Self::Completed),
            (from, event) => Err(AssemblyDomainError::InvalidTransition { from, event }),
        }
    }

    /// Returns whether `event` is allowed from this status.
    #[must_use]
    pub fn can_apply(self, event: TaskEvent) -> bool {
        self.transition(event).is_ok()
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "planned" => Ok(Self::Planned),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "blocked" => Ok(Self::Blocked),
            _ => Err(ParseStatusError(value.to_owned())),
        }
    }
}

/// Action applied to an assembly task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskEvent {
    /// Assign a date and team.
    Plan,
    /// Remove the date.
    Unplan,
    /// Begin or resume work.
    Start,
    /// Report an issue found on site.
    ReportIssue,
    /// Finish with evidence.
    Complete,
}

impl TaskEvent {
    /// Returns a lowercase verb for messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Plan => "plan",
            Self::Unplan => "unplan",
            Self::Start => "start",
            Self::ReportIssue => "report an issue on",
            Self::Complete => "complete",
        }
    }
}

impl fmt::Display for TaskEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
