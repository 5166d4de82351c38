//! Postponement justification and the delay audit record.

use super::{ItemId, ItemKind, PersonId, PlanUpdate};
use crate::{
    calendar::PlannedAt,
    config::{CatalogEntry, catalog_accepts},
};
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Externally configured list of postponement reasons.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DelayReasonCatalog {
    entries: Vec<CatalogEntry>,
}

impl DelayReasonCatalog {
    /// Creates a catalog from settings entries.
    #[must_use]
    pub const fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    /// Entries offered for selection (inactive ones are hidden).
    pub fn selectable(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter().filter(|entry| entry.active)
    }

    /// Returns whether `reason` may be submitted.
    #[must_use]
    pub fn accepts(&self, reason: &str) -> bool {
        catalog_accepts(&self.entries, reason)
    }
}

/// Errors raised by the justification form before anything is written.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JustificationError {
    /// No postponement reason was selected.
    #[error("delay reason is required")]
    MissingReason,

    /// The selected reason is not an active catalog entry.
    #[error("unknown delay reason: {0}")]
    UnknownReason(String),

    /// No responsible person was selected.
    #[error("responsible person is required")]
    MissingResponsiblePerson,

    /// Several fields are invalid.
    #[error("{}", join_messages(.0))]
    Multiple(Vec<JustificationError>),
}

fn join_messages(errors: &[JustificationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Raw justification form input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DelayJustification {
    /// Selected reason identifier.
    pub reason: String,
    /// Selected responsible person identifier.
    pub responsible_person_id: String,
    /// Optional free-text note.
    pub note: Option<String>,
}

impl DelayJustification {
    /// Creates a justification with the two required fields.
    #[must_use]
    pub fn new(reason: impl Into<String>, responsible_person_id: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            responsible_person_id: responsible_person_id.into(),
            note: None,
        }
    }

    /// Sets the optional note.
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Checks the required fields against `catalog`.
    ///
    /// All field errors are collected rather than stopping at the first.
    ///
    /// # Errors
    ///
    /// Returns [`JustificationError`] when the reason is missing or not
    /// selectable, or the responsible person is missing.
    pub fn validate(
        &self,
        catalog: &DelayReasonCatalog,
    ) -> Result<ValidJustification, JustificationError> {
        let mut errors = Vec::new();

        let reason = self.reason.trim();
        if reason.is_empty() {
            errors.push(JustificationError::MissingReason);
        } else if !catalog.accepts(reason) {
            errors.push(JustificationError::UnknownReason(reason.to_owned()));
        }

        let responsible = PersonId::new(self.responsible_person_id.as_str()).ok();
        if responsible.is_none() {
            errors.push(JustificationError::MissingResponsiblePerson);
        }

        match (responsible, errors.len()) {
            (Some(responsible_person_id), 0) => Ok(ValidJustification {
                reason: reason.to_owned(),
                responsible_person_id,
                note: self
                    .note
                    .as_deref()
                    .map(str::trim)
                    .filter(|note| !note.is_empty())
                    .map(str::to_owned),
            }),
            (_, 1) => Err(errors
                .pop()
                .unwrap_or(JustificationError::MissingResponsiblePerson)),
            _ => Err(JustificationError::Multiple(errors)),
        }
    }
}

/// Justification that passed local validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidJustification {
    reason: String,
    responsible_person_id: PersonId,
    note: Option<String>,
}

impl ValidJustification {
    /// Returns the reason identifier.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Returns the responsible person.
    #[must_use]
    pub const fn responsible_person_id(&self) -> &PersonId {
        &self.responsible_person_id
    }
}

/// Postponement held by the gate until it is confirmed or cancelled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingReschedule<S> {
    item_id: ItemId,
    kind: ItemKind,
    old_date: PlannedAt,
    delay_days: u32,
    previous: PlanUpdate<S>,
    next: PlanUpdate<S>,
}

impl<S: Copy> PendingReschedule<S> {
    /// Creates a pending postponement from the item's current plan to
    /// `next`.
    ///
    /// Returns `None` unless `next` is strictly later than `old_date`.
    #[must_use]
    pub fn new(
        item_id: ItemId,
        kind: ItemKind,
        old_date: PlannedAt,
        previous: PlanUpdate<S>,
        next: PlanUpdate<S>,
    ) -> Option<Self> {
        let new_date = next.planned_date?;
        let delay_days = u32::try_from(old_date.delay_days_until(new_date.date())).ok()?;
        if delay_days == 0 {
            return None;
        }
        Some(Self {
            item_id,
            kind,
            old_date,
            delay_days,
            previous,
            next,
        })
    }

    /// Returns the postponed item.
    #[must_use]
    pub const fn item_id(&self) -> &ItemId {
        &self.item_id
    }

    /// Returns the item kind.
    #[must_use]
    pub const fn kind(&self) -> ItemKind {
        self.kind
    }

    /// Returns the plan being replaced.
    #[must_use]
    pub const fn old_date(&self) -> PlannedAt {
        self.old_date
    }

    /// Returns the requested new day.
    #[must_use]
    pub fn new_date(&self) -> NaiveDate {
        self.next
            .planned_date
            .map_or(self.old_date.date(), PlannedAt::date)
    }

    /// Returns the number of days the item is pushed back.
    #[must_use]
    pub const fn delay_days(&self) -> u32 {
        self.delay_days
    }

    /// Returns the plan change that restores the current state.
    #[must_use]
    pub const fn previous(&self) -> &PlanUpdate<S> {
        &self.previous
    }

    /// Returns the plan change written on confirmation.
    #[must_use]
    pub const fn next(&self) -> &PlanUpdate<S> {
        &self.next
    }
}

/// Append-only audit entry for a postponement.
///
/// Created only when a plan moved strictly later; immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DelayRecord {
    entity_id: ItemId,
    entity_type: ItemKind,
    old_date: NaiveDate,
    new_date: NaiveDate,
    delay_days: u32,
    reason: String,
    responsible_person_id: PersonId,
    note: Option<String>,
    created_at: DateTime<Utc>,
}

impl DelayRecord {
    /// Creates the audit entry for a confirmed postponement.
    #[must_use]
    pub fn new<S: Copy>(
        pending: &PendingReschedule<S>,
        justification: ValidJustification,
        clock: &(impl Clock + ?Sized),
    ) -> Self {
        Self {
            entity_id: pending.item_id.clone(),
            entity_type: pending.kind,
            old_date: pending.old_date.date(),
            new_date: pending.new_date(),
            delay_days: pending.delay_days,
            reason: justification.reason,
            responsible_person_id: justification.responsible_person_id,
            note: justification.note,
            created_at: clock.utc(),
        }
    }

    /// Returns the postponed item.
    #[must_use]
    pub const fn entity_id(&self) -> &ItemId {
        &self.entity_id
    }

    /// Returns the postponed item's kind.
    #[must_use]
    pub const fn entity_type(&self) -> ItemKind {
        self.entity_type
    }

    /// Returns the day the item was planned on before.
    #[must_use]
    pub const fn old_date(&self) -> NaiveDate {
        self.old_date
    }

    /// Returns the day the item moved to.
    #[must_use]
    pub const fn new_date(&self) -> NaiveDate {
        self.new_date
    }

    /// Returns the postponement length in days.
    #[must_use]
    pub const fn delay_days(&self) -> u32 {
        self.delay_days
    }

    /// Returns the reason identifier.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Returns the responsible person.
    #[must_use]
    pub const fn responsible_person_id(&self) -> &PersonId {
        &self.responsible_person_id
    }

    /// Returns the optional note.
    #[must_use]
    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
