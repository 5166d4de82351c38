//! Error types for scheduling domain validation and parsing.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors returned while constructing or changing scheduling values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ScheduleDomainError {
    /// An identifier is blank after trimming.
    #[error("{0} identifier must not be empty")]
    EmptyIdentifier(&'static str),

    /// The requested day is later than the item allows.
    #[error("requested date {requested} is after the latest allowed date {latest}")]
    AfterLatestAllowedDate {
        /// Day the item was dropped on.
        requested: NaiveDate,
        /// Latest day the item may be planned on.
        latest: NaiveDate,
    },
}

/// Error returned while parsing status strings from the backend.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown status: {0}")]
pub struct ParseStatusError(pub String);
