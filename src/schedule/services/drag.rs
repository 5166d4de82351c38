//! Drag-and-drop rescheduling on a calendar.

use super::{DelayJustificationGate, RescheduleError, RescheduleResult};
use crate::{
    calendar::{DayLoad, PlannedAt, bucket_items_by_date},
    config::SchedulingConfig,
    schedule::{
        domain::{
            CollectionFilter, DelayJustification, DelayReasonCatalog, DelayRecord, ItemId,
            PendingReschedule, PlanUpdate, Schedulable, ScheduleDomainError, unplanned_items,
        },
        ports::ScheduleBackend,
    },
};
use chrono::NaiveDate;
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, sync::Arc};
use tracing::{debug, info, warn};

/// Data carried by a drag gesture: only the item identifier.
///
/// The item is looked up again when it is dropped, so a payload started
/// from any list always acts on the current copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragPayload {
    /// Dragged item.
    pub item_id: ItemId,
}

impl DragPayload {
    /// Creates a payload for `item_id`.
    #[must_use]
    pub const fn new(item_id: ItemId) -> Self {
        Self { item_id }
    }
}

/// Where an item was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropTarget {
    /// A calendar day cell.
    Date(NaiveDate),
    /// The list of items without a date.
    UnplannedPool,
}

/// Drag session state owned by one controller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DragState {
    /// No drag in progress.
    #[default]
    Idle,
    /// An item is being dragged.
    Dragging(ItemId),
    /// An item was dropped and its postponement awaits justification.
    Dropped {
        /// Dropped item.
        item_id: ItemId,
        /// Drop target.
        target: DropTarget,
    },
}

/// Why a drop did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The payload names an item that is not in the collection.
    UnknownItem,
    /// The item was dropped on the unplanned pool without having a date.
    AlreadyUnplanned,
    /// The item is finished or its status does not allow the move.
    NotReschedulable,
    /// Another postponement is waiting for justification.
    GateOpen,
}

/// Result of a drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome<S> {
    /// The item was planned on the given day and the change persisted.
    Assigned {
        /// Planned item.
        item_id: ItemId,
        /// New plan.
        planned_at: PlannedAt,
    },
    /// The drop postpones the item; nothing changes until the gate is
    /// confirmed.
    DelayGateOpened(PendingReschedule<S>),
    /// The item lost its date and the change persisted.
    Unplanned(ItemId),
    /// The drop had no effect.
    Ignored(IgnoreReason),
}

/// Calendar controller for one kind of schedulable item.
///
/// Each instance owns its drag session and its delay gate, so several
/// calendars can run side by side. Every write is applied to the local
/// collection first; a rejected write replaces the collection with a fresh
/// copy from the backend.
pub struct DragRescheduleController<T, B, C>
where
    T: Schedulable,
    B: ScheduleBackend<T>,
    C: Clock + Send + Sync,
{
    backend: Arc<B>,
    clock: Arc<C>,
    config: SchedulingConfig,
    filter: CollectionFilter,
    items: Vec<T>,
    drag: DragState,
    gate: DelayJustificationGate<T>,
}

impl<T, B, C> DragRescheduleController<T, B, C>
where
    T: Schedulable,
    B: ScheduleBackend<T>,
    C: Clock + Send + Sync,
{
    /// Creates a controller with an empty collection.
    #[must_use]
    pub fn new(backend: Arc<B>, clock: Arc<C>, config: SchedulingConfig) -> Self {
        let catalog = DelayReasonCatalog::new(config.delay_reasons.clone());
        Self {
            backend,
            clock,
            config,
            filter: CollectionFilter::default(),
            items: Vec::new(),
            drag: DragState::Idle,
            gate: DelayJustificationGate::new(catalog),
        }
    }

    /// Sets the filter used by [`Self::load`].
    #[must_use]
    pub fn with_filter(mut self, filter: CollectionFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Replaces the local collection with the backend's.
    ///
    /// # Errors
    ///
    /// Returns [`RescheduleError::Persistence`] when the fetch fails; the
    /// local collection is left untouched.
    pub async fn load(&mut self) -> RescheduleResult<&[T]> {
        self.refresh().await?;
        Ok(&self.items)
    }

    async fn refresh(&mut self) -> RescheduleResult<()> {
        let fetched = self.backend.fetch_collection(&self.filter).await?;
        let filter = &self.filter;
        self.items = fetched
            .into_iter()
            .filter(|item| filter.matches(item))
            .collect();
        debug!(kind = %T::KIND, count = self.items.len(), "collection loaded");
        Ok(())
    }

    /// Changes the filter and reloads.
    ///
    /// # Errors
    ///
    /// Returns [`RescheduleError::Persistence`] when the fetch fails.
    pub async fn set_filter(&mut self, filter: CollectionFilter) -> RescheduleResult<&[T]> {
        self.filter = filter;
        self.load().await
    }

    /// Returns the active filter.
    #[must_use]
    pub const fn filter(&self) -> &CollectionFilter {
        &self.filter
    }

    /// Returns the local collection.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Looks up an item of the local collection.
    #[must_use]
    pub fn item(&self, id: &ItemId) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Items shown in the unplanned pool.
    #[must_use]
    pub fn unplanned(&self) -> Vec<&T> {
        unplanned_items(&self.items)
    }

    /// Planned items keyed by calendar day.
    #[must_use]
    pub fn buckets(&self) -> BTreeMap<NaiveDate, Vec<&T>> {
        bucket_items_by_date(&self.items, |item: &T| item.planned_date())
    }

    /// Load indicator for one calendar cell.
    #[must_use]
    pub fn day_load(&self, date: NaiveDate) -> DayLoad {
        let count = self
            .items
            .iter()
            .filter(|item| item.planned_date().map(PlannedAt::date) == Some(date))
            .count();
        DayLoad::for_count(count, self.config.daily_soft_limit)
    }

    /// Returns the drag session state.
    #[must_use]
    pub const fn drag_state(&self) -> &DragState {
        &self.drag
    }

    /// Returns the delay gate.
    #[must_use]
    pub const fn gate(&self) -> &DelayJustificationGate<T> {
        &self.gate
    }

    /// Starts dragging `id`; returns `None` for unknown items.
    pub fn begin_drag(&mut self, id: &ItemId) -> Option<DragPayload> {
        self.item(id)?;
        self.drag = DragState::Dragging(id.clone());
        Some(DragPayload::new(id.clone()))
    }

    /// Abandons a drag without a drop.
    pub fn end_drag(&mut self) {
        if matches!(self.drag, DragState::Dragging(_)) {
            self.drag = DragState::Idle;
        }
    }

    /// Handles a drop of `payload` on `target`.
    ///
    /// Moving an item to an earlier or the same day, or giving an unplanned
    /// item its first date, is written at once. Moving it later opens the
    /// delay gate and writes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`RescheduleError::Validation`] when the day is after the
    /// item's latest allowed date and [`RescheduleError::Persistence`] when
    /// the backend rejects the write.
    pub async fn drop_item(
        &mut self,
        payload: DragPayload,
        target: DropTarget,
    ) -> RescheduleResult<DropOutcome<T::Status>> {
        if self.gate.is_open() {
            return Ok(DropOutcome::Ignored(IgnoreReason::GateOpen));
        }
        self.drag = DragState::Dropped {
            item_id: payload.item_id.clone(),
            target,
        };

        let outcome = self.resolve_drop(&payload.item_id, target).await;
        if !self.gate.is_open() {
            self.drag = DragState::Idle;
        }
        outcome
    }

    async fn resolve_drop(
        &mut self,
        id: &ItemId,
        target: DropTarget,
    ) -> RescheduleResult<DropOutcome<T::Status>> {
        let Some(item) = self.item(id).cloned() else {
            debug!(item_id = %id, "drop ignored: item not in collection");
            return Ok(DropOutcome::Ignored(IgnoreReason::UnknownItem));
        };
        if item.is_terminal() {
            debug!(item_id = %id, "drop ignored: item is finished");
            return Ok(DropOutcome::Ignored(IgnoreReason::NotReschedulable));
        }

        match target {
            DropTarget::Date(date) => self.drop_on_date(&item, date).await,
            DropTarget::UnplannedPool => self.drop_on_pool(&item).await,
        }
    }

    async fn drop_on_date(
        &mut self,
        item: &T,
        date: NaiveDate,
    ) -> RescheduleResult<DropOutcome<T::Status>> {
        if let Some(latest) = item.latest_allowed_date().filter(|latest| date > *latest) {
            return Err(ScheduleDomainError::AfterLatestAllowedDate {
                requested: date,
                latest,
            }
            .into());
        }

        let planned_at = item.placement_on(date, &self.config);
        let next = item.plan_update_for(planned_at);

        let postponed = item
            .planned_date()
            .filter(|current| current.is_postponed_by(date));
        if let Some(current) = postponed {
            let pending = PendingReschedule::new(
                item.id().clone(),
                T::KIND,
                current,
                item.current_plan(),
                next.clone(),
            );
            if let Some(pending) = pending {
                debug!(
                    item_id = %item.id(),
                    old_date = %current,
                    new_date = %date,
                    delay_days = pending.delay_days(),
                    "postponement needs justification"
                );
                let opened = self.gate.open(pending).clone();
                return Ok(DropOutcome::DelayGateOpened(opened));
            }
        }

        debug!(item_id = %item.id(), %planned_at, "drop assigns date");
        self.persist(item, &next).await?;
        Ok(DropOutcome::Assigned {
            item_id: item.id().clone(),
            planned_at,
        })
    }

    async fn drop_on_pool(&mut self, item: &T) -> RescheduleResult<DropOutcome<T::Status>> {
        if item.planned_date().is_none() {
            return Ok(DropOutcome::Ignored(IgnoreReason::AlreadyUnplanned));
        }
        let Some(status) = item.unplanned_status() else {
            debug!(item_id = %item.id(), status = ?item.status(), "item cannot be unplanned");
            return Ok(DropOutcome::Ignored(IgnoreReason::NotReschedulable));
        };

        let next = PlanUpdate {
            planned_date: None,
            team_id: item.team_id().cloned(),
            status,
        };
        self.persist(item, &next).await?;
        Ok(DropOutcome::Unplanned(item.id().clone()))
    }

    /// Confirms the pending postponement with `form`.
    ///
    /// # Errors
    ///
    /// Returns [`RescheduleError::Justification`] when the form is
    /// incomplete (the gate stays open), [`RescheduleError::GateClosed`]
    /// when nothing is pending and [`RescheduleError::Persistence`] when a
    /// write fails (the collection is reloaded).
    pub async fn confirm_delay(
        &mut self,
        form: &DelayJustification,
    ) -> RescheduleResult<DelayRecord> {
        let Some(pending) = self.gate.pending().cloned() else {
            return Err(RescheduleError::GateClosed);
        };

        match self.gate.commit(&*self.backend, form, &*self.clock).await {
            Ok(record) => {
                self.drag = DragState::Idle;
                self.apply_locally(pending.item_id(), pending.next());
                Ok(record)
            }
            Err(RescheduleError::Persistence(err)) => {
                self.drag = DragState::Idle;
                self.reload_after_failure(pending.item_id(), pending.previous())
                    .await;
                Err(err.into())
            }
            Err(other) => Err(other),
        }
    }

    /// Discards the pending postponement and reloads.
    ///
    /// # Errors
    ///
    /// Returns [`RescheduleError::Persistence`] when the reload fails.
    pub async fn cancel_delay(&mut self) -> RescheduleResult<()> {
        if let Some(pending) = self.gate.cancel() {
            debug!(item_id = %pending.item_id(), "postponement cancelled");
        }
        self.drag = DragState::Idle;
        self.refresh().await
    }

    async fn persist(&mut self, item: &T, next: &PlanUpdate<T::Status>) -> RescheduleResult<()> {
        let previous = item.current_plan();
        self.apply_locally(item.id(), next);

        match self.backend.update_plan(item.id(), next).await {
            Ok(()) => {
                info!(
                    item_id = %item.id(),
                    kind = %T::KIND,
                    planned_date = ?next.planned_date.map(|at| at.to_string()),
                    status = ?next.status,
                    "plan updated"
                );
                Ok(())
            }
            Err(err) => {
                warn!(item_id = %item.id(), error = %err, "plan update rejected, reloading");
                self.reload_after_failure(item.id(), &previous).await;
                Err(err.into())
            }
        }
    }

    fn apply_locally(&mut self, id: &ItemId, update: &PlanUpdate<T::Status>) {
        if let Some(item) = self.items.iter_mut().find(|item| item.id() == id) {
            item.apply_plan(update);
        }
    }

    /// Reloads after a rejected write, falling back to `previous` for the
    /// touched item when the reload itself fails.
    async fn reload_after_failure(&mut self, id: &ItemId, previous: &PlanUpdate<T::Status>) {
        if let Err(err) = self.refresh().await {
            warn!(error = %err, "reload failed, reverting local change");
            self.apply_locally(id, previous);
        }
    }
}
