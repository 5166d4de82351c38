//! Error types for assembly domain rules.

use super::{TaskEvent, TaskStatus};
use crate::schedule::domain::{ItemId, JobId, RoleId, ScheduleDomainError};
use thiserror::Error;

/// Errors returned when an assembly rule is violated.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AssemblyDomainError {
    /// The event is not allowed in the current status.
    #[error("cannot {event} a task that is {from}")]
    InvalidTransition {
        /// Current status.
        from: TaskStatus,
        /// Rejected event.
        event: TaskEvent,
    },

    /// Stage orders start at 1.
    #[error("stage order must be at least 1, got {0}")]
    InvalidStageOrder(u32),

    /// The task still carries unresolved issues.
    #[error("task {task_id} has {count} pending issue(s)")]
    PendingIssues {
        /// Blocked task.
        task_id: ItemId,
        /// Number of unresolved issues.
        count: usize,
    },

    /// Stage orders of a job role are not `1..=n` without gaps.
    #[error("stage orders of job {job_id} role {role_id} are not contiguous: {orders:?}")]
    BrokenStageSequence {
        /// Job of the group.
        job_id: JobId,
        /// Role of the group.
        role_id: RoleId,
        /// Orders found, ascending.
        orders: Vec<u32>,
    },

    /// An identifier is invalid.
    #[error(transparent)]
    Identifier(#[from] ScheduleDomainError),
}
