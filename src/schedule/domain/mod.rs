//! Domain model for calendar scheduling.
//!
//! The scheduling domain describes what can be placed on a calendar, how a
//! plan change is expressed, and the immutable audit entry written when a
//! date is postponed.

mod appointment;
mod delay;
mod error;
mod ids;
mod item;
mod production_order;

pub use appointment::{Appointment, AppointmentStatus};
pub use delay::{
    DelayJustification, DelayReasonCatalog, DelayRecord, JustificationError, PendingReschedule,
    ValidJustification,
};
pub use error::{ParseStatusError, ScheduleDomainError};
pub(crate) use ids::backend_identifier;
pub use ids::{ItemId, JobId, PersonId, RoleId, TeamId};
pub use item::{CollectionFilter, ItemKind, PlanUpdate, Schedulable, unplanned_items};
pub use production_order::{ProductionOrder, ProductionOrderStatus};
