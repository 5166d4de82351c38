//! Application services for calendar rescheduling.

mod availability;
mod drag;
mod error;
mod gate;

pub use availability::{AvailabilityAdvisor, PlanningDraft};
pub use drag::{
    DragPayload, DragRescheduleController, DragState, DropOutcome, DropTarget, IgnoreReason,
};
pub use error::{RescheduleError, RescheduleResult};
pub use gate::DelayJustificationGate;
