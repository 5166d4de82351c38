//! Backend port for loading and replanning schedulable items.

use crate::schedule::domain::{CollectionFilter, DelayRecord, ItemId, PlanUpdate, Schedulable};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for backend operations.
pub type BackendResult<T> = Result<T, BackendError>;

/// Persistence contract for one kind of schedulable item.
///
/// The backend owns the authoritative collection; controllers only hold a
/// local copy that is replaced wholesale on reload.
#[async_trait]
pub trait ScheduleBackend<T: Schedulable>: Send + Sync {
    /// Returns every item matching `filter`.
    async fn fetch_collection(&self, filter: &CollectionFilter) -> BackendResult<Vec<T>>;

    /// Writes a plan change: date, team and the resulting status.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::NotFound`] when the item does not exist and
    /// [`BackendError::Rejected`] when the backend refuses the change.
    async fn update_plan(&self, id: &ItemId, update: &PlanUpdate<T::Status>) -> BackendResult<()>;

    /// Appends a postponement audit entry.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] when the entry could not be stored.
    async fn record_delay(&self, record: &DelayRecord) -> BackendResult<()>;
}

/// Errors returned by backend implementations.
#[derive(Debug, Clone, Error)]
pub enum BackendError {
    /// The addressed item does not exist.
    #[error("item not found: {0}")]
    NotFound(ItemId),

    /// The backend refused the request with a human-readable message.
    #[error("{0}")]
    Rejected(String),

    /// Transport or storage failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl BackendError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }

    /// Creates a rejection carrying the backend's message.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected(message.into())
    }
}
