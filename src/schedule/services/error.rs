//! Service-level errors for rescheduling.

use crate::schedule::{
    domain::{JustificationError, ScheduleDomainError},
    ports::BackendError,
};
use thiserror::Error;

/// Errors returned by the drag controller and the delay gate.
#[derive(Debug, Error)]
pub enum RescheduleError {
    /// The drop target is not allowed for the item; nothing was written.
    #[error(transparent)]
    Validation(#[from] ScheduleDomainError),

    /// The justification form is incomplete; the gate stays open.
    #[error(transparent)]
    Justification(#[from] JustificationError),

    /// A confirmation arrived while no postponement was pending.
    #[error("no postponement is awaiting justification")]
    GateClosed,

    /// The backend rejected a write; local state was reloaded.
    #[error(transparent)]
    Persistence(#[from] BackendError),
}

/// Result type for rescheduling operations.
pub type RescheduleResult<T> = Result<T, RescheduleError>;
