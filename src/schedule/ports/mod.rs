//! Port contracts for scheduling.
//!
//! Ports define the backend operations the calendar controllers depend on,
//! independent of how the backend is reached.

pub mod availability;
pub mod backend;

pub use availability::{AvailabilityError, AvailabilityPort, AvailabilityReport};
pub use backend::{BackendError, BackendResult, ScheduleBackend};
