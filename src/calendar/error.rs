//! Error types for calendar value parsing.

use thiserror::Error;

/// Errors returned while parsing calendar values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CalendarError {
    /// The value is not an ISO date or date-time.
    #[error("invalid ISO date or timestamp: '{0}'")]
    InvalidTimestamp(String),
}
