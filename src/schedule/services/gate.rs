//! Mandatory justification step for postponements.

use super::{RescheduleError, RescheduleResult};
use crate::schedule::{
    domain::{
        DelayJustification, DelayReasonCatalog, DelayRecord, PendingReschedule, Schedulable,
        ValidJustification,
    },
    ports::ScheduleBackend,
};
use mockable::Clock;
use tracing::{info, warn};

/// Holds a postponement until a reason and a responsible person are given.
///
/// The gate is generic over the item kind, so appointments, production
/// orders and assembly tasks share one confirmation contract. Confirming
/// writes the new plan and then the [`DelayRecord`]; when the second write
/// fails the previous plan is written back so the backend never keeps a
/// postponement without its audit entry.
#[derive(Debug, Clone)]
pub struct DelayJustificationGate<T: Schedulable> {
    catalog: DelayReasonCatalog,
    pending: Option<PendingReschedule<T::Status>>,
}

impl<T: Schedulable> DelayJustificationGate<T> {
    /// Creates a closed gate offering reasons from `catalog`.
    #[must_use]
    pub const fn new(catalog: DelayReasonCatalog) -> Self {
        Self {
            catalog,
            pending: None,
        }
    }

    /// Returns the reason catalog.
    #[must_use]
    pub const fn catalog(&self) -> &DelayReasonCatalog {
        &self.catalog
    }

    /// Opens the gate for `pending`, replacing any earlier intent.
    pub fn open(&mut self, pending: PendingReschedule<T::Status>) -> &PendingReschedule<T::Status> {
        self.pending.insert(pending)
    }

    /// Returns the postponement awaiting justification.
    #[must_use]
    pub const fn pending(&self) -> Option<&PendingReschedule<T::Status>> {
        self.pending.as_ref()
    }

    /// Returns whether a postponement is awaiting justification.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.pending.is_some()
    }

    /// Discards the pending postponement.
    pub fn cancel(&mut self) -> Option<PendingReschedule<T::Status>> {
        self.pending.take()
    }

    /// Validates `form` without touching the backend.
    ///
    /// # Errors
    ///
    /// Returns [`RescheduleError::GateClosed`] when nothing is pending and
    /// [`RescheduleError::Justification`] when a required field is missing.
    pub fn validate(&self, form: &DelayJustification) -> RescheduleResult<ValidJustification> {
        if self.pending.is_none() {
            return Err(RescheduleError::GateClosed);
        }
        Ok(form.validate(&self.catalog)?)
    }

    /// Confirms the pending postponement.
    ///
    /// Validation failures leave the gate open. Once validation passes the
    /// gate closes whatever the backend answers.
    ///
    /// # Errors
    ///
    /// Returns [`RescheduleError::Justification`] for an incomplete form and
    /// [`RescheduleError::Persistence`] when either write fails.
    pub async fn commit<B, C>(
        &mut self,
        backend: &B,
        form: &DelayJustification,
        clock: &C,
    ) -> RescheduleResult<DelayRecord>
    where
        B: ScheduleBackend<T> + ?Sized,
        C: Clock + ?Sized,
    {
        let justification = self.validate(form)?;
        let pending = self.pending.take().ok_or(RescheduleError::GateClosed)?;
        let record = DelayRecord::new(&pending, justification, clock);

        backend.update_plan(pending.item_id(), pending.next()).await?;

        if let Err(err) = backend.record_delay(&record).await {
            warn!(
                item_id = %pending.item_id(),
                error = %err,
                "delay record rejected, restoring previous plan"
            );
            if let Err(restore_err) = backend
                .update_plan(pending.item_id(), pending.previous())
                .await
            {
                warn!(
                    item_id = %pending.item_id(),
                    error = %restore_err,
                    "failed to restore previous plan"
                );
            }
            return Err(err.into());
        }

        info!(
            item_id = %record.entity_id(),
            kind = %record.entity_type(),
            old_date = %record.old_date(),
            new_date = %record.new_date(),
            delay_days = record.delay_days(),
            reason = record.reason(),
            "postponement recorded"
        );
        Ok(record)
    }
}
