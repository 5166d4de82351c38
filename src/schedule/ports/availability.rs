//! Advisory team availability lookup.

use crate::schedule::domain::TeamId;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Availability answer for one team and day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityReport {
    /// Team that was checked.
    pub team_id: TeamId,
    /// Day that was checked.
    pub date: NaiveDate,
    /// Number of other items the team already has that day.
    pub existing_task_count: usize,
    /// Human-readable conflict warning, if any.
    pub warning: Option<String>,
}

/// Conflict lookup contract.
#[async_trait]
pub trait AvailabilityPort: Send + Sync {
    /// Looks up existing commitments of `team_id` on `date`.
    ///
    /// # Errors
    ///
    /// Returns [`AvailabilityError`] when the lookup cannot be answered.
    async fn check_availability(
        &self,
        team_id: &TeamId,
        date: NaiveDate,
    ) -> Result<AvailabilityReport, AvailabilityError>;
}

/// Errors returned by availability lookups.
#[derive(Debug, Clone, Error)]
pub enum AvailabilityError {
    /// The backend refused the lookup.
    #[error("{0}")]
    Rejected(String),

    /// Transport or storage failure.
    #[error("availability lookup failed: {0}")]
    Unavailable(Arc<dyn std::error::Error + Send + Sync>),
}

impl AvailabilityError {
    /// Wraps a transport error.
    pub fn unavailable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unavailable(Arc::new(err))
    }
}
