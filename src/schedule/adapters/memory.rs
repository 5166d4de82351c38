//! In-memory backend for scheduling tests and local runs.

use crate::{
    calendar::PlannedAt,
    schedule::{
        domain::{CollectionFilter, DelayRecord, ItemId, PlanUpdate, Schedulable, TeamId},
        ports::{
            AvailabilityError, AvailabilityPort, AvailabilityReport, BackendError, BackendResult,
            ScheduleBackend,
        },
    },
};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::{Arc, RwLock};

/// Backend operation that can be told to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendOperation {
    /// [`ScheduleBackend::fetch_collection`].
    FetchCollection,
    /// [`ScheduleBackend::update_plan`].
    UpdatePlan,
    /// [`ScheduleBackend::record_delay`].
    RecordDelay,
    /// [`AvailabilityPort::check_availability`].
    CheckAvailability,
    /// Starting an assembly task.
    StartTask,
    /// Completing a single assembly task.
    CompleteTask,
    /// Completing every open task of a job.
    CompleteAllTasks,
    /// Reporting an assembly issue.
    ReportIssue,
    /// Resolving an assembly issue.
    ResolveIssue,
}

#[derive(Debug)]
pub(crate) struct ScheduleState<T> {
    pub(crate) items: Vec<T>,
    pub(crate) delays: Vec<DelayRecord>,
    calls: Vec<BackendOperation>,
    failures: Vec<(BackendOperation, String)>,
}

impl<T> Default for ScheduleState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            delays: Vec::new(),
            calls: Vec::new(),
            failures: Vec::new(),
        }
    }
}

impl<T: Schedulable> ScheduleState<T> {
    /// Records a call and returns the injected failure for it, if any.
    pub(crate) fn enter(&mut self, operation: BackendOperation) -> BackendResult<()> {
        self.calls.push(operation);
        let position = self.failures.iter().position(|(op, _)| *op == operation);
        match position {
            Some(index) => {
                let (_, message) = self.failures.remove(index);
                Err(BackendError::Rejected(message))
            }
            None => Ok(()),
        }
    }

    pub(crate) fn item_mut(&mut self, id: &ItemId) -> BackendResult<&mut T> {
        self.items
            .iter_mut()
            .find(|item| item.id() == id)
            .ok_or_else(|| BackendError::NotFound(id.clone()))
    }
}

/// Thread-safe in-memory backend for one kind of schedulable item.
#[derive(Debug)]
pub struct InMemoryScheduleBackend<T> {
    state: Arc<RwLock<ScheduleState<T>>>,
}

impl<T> Clone for InMemoryScheduleBackend<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<T> Default for InMemoryScheduleBackend<T> {
    fn default() -> Self {
        Self {
            state: Arc::new(RwLock::new(ScheduleState::default())),
        }
    }
}

fn lock_error(err: impl ToString) -> BackendError {
    BackendError::persistence(std::io::Error::other(err.to_string()))
}

impl<T: Schedulable> InMemoryScheduleBackend<T> {
    /// Creates an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend seeded with `items`.
    #[must_use]
    pub fn with_items(items: impl IntoIterator<Item = T>) -> Self {
        let backend = Self::default();
        if let Ok(mut state) = backend.state.write() {
            state.items.extend(items);
        }
        backend
    }

    pub(crate) fn read<R>(&self, f: impl FnOnce(&ScheduleState<T>) -> R) -> BackendResult<R> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(f(&state))
    }

    pub(crate) fn write<R>(
        &self,
        f: impl FnOnce(&mut ScheduleState<T>) -> BackendResult<R>,
    ) -> BackendResult<R> {
        let mut state = self.state.write().map_err(lock_error)?;
        f(&mut state)
    }

    /// Adds an item to the authoritative collection.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Persistence`] when the state lock is
    /// poisoned.
    pub fn insert(&self, item: T) -> BackendResult<()> {
        self.write(|state| {
            state.items.push(item);
            Ok(())
        })
    }

    /// Returns the stored copy of an item.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Persistence`] when the state lock is
    /// poisoned.
    pub fn item(&self, id: &ItemId) -> BackendResult<Option<T>> {
        self.read(|state| state.items.iter().find(|item| item.id() == id).cloned())
    }

    /// Returns every stored postponement record.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Persistence`] when the state lock is
    /// poisoned.
    pub fn delay_records(&self) -> BackendResult<Vec<DelayRecord>> {
        self.read(|state| state.delays.clone())
    }

    /// Returns the operations received so far, in order.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Persistence`] when the state lock is
    /// poisoned.
    pub fn calls(&self) -> BackendResult<Vec<BackendOperation>> {
        self.read(|state| state.calls.clone())
    }

    /// Makes the next call of `operation` fail with `message`.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Persistence`] when the state lock is
    /// poisoned.
    pub fn fail_next(
        &self,
        operation: BackendOperation,
        message: impl Into<String>,
    ) -> BackendResult<()> {
        let reason: String = message.into();
        self.write(|state| {
            state.failures.push((operation, reason));
            Ok(())
        })
    }
}

#[async_trait]
impl<T: Schedulable> ScheduleBackend<T> for InMemoryScheduleBackend<T> {
    async fn fetch_collection(&self, filter: &CollectionFilter) -> BackendResult<Vec<T>> {
        self.write(|state| {
            state.enter(BackendOperation::FetchCollection)?;
            Ok(state
                .items
                .iter()
                .filter(|item| filter.matches(*item))
                .cloned()
                .collect())
        })
    }

    async fn update_plan(&self, id: &ItemId, update: &PlanUpdate<T::Status>) -> BackendResult<()> {
        self.write(|state| {
            state.enter(BackendOperation::UpdatePlan)?;
            state.item_mut(id)?.apply_plan(update);
            Ok(())
        })
    }

    async fn record_delay(&self, record: &DelayRecord) -> BackendResult<()> {
        self.write(|state| {
            state.enter(BackendOperation::RecordDelay)?;
            state.delays.push(record.clone());
            Ok(())
        })
    }
}

#[async_trait]
impl<T: Schedulable> AvailabilityPort for InMemoryScheduleBackend<T> {
    async fn check_availability(
        &self,
        team_id: &TeamId,
        date: NaiveDate,
    ) -> Result<AvailabilityReport, AvailabilityError> {
        let existing = self
            .write(|state| {
                state.enter(BackendOperation::CheckAvailability)?;
                Ok(state
                    .items
                    .iter()
                    .filter(|item| item.team_id() == Some(team_id))
                    .filter(|item| item.planned_date().map(PlannedAt::date) == Some(date))
                    .count())
            })
            .map_err(|err| match err {
                BackendError::Rejected(message) => AvailabilityError::Rejected(message),
                other => AvailabilityError::unavailable(other),
            })?;

        let warning = (existing > 0).then(|| {
            format!("team already assigned to {existing} other task(s) on the same day")
        });
        Ok(AvailabilityReport {
            team_id: team_id.clone(),
            date,
            existing_task_count: existing,
            warning,
        })
    }
}
