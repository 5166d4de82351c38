//! Issues reported during assembly.

use super::IssueId;
use crate::{
    config::{CatalogEntry, catalog_accepts},
    schedule::domain::ItemId,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Resolution status of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueStatus {
    /// Still blocking the task.
    Pending,
    /// Closed.
    Resolved,
}

/// Errors returned when an issue report is incomplete.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IssueReportError {
    /// The affected item was not named.
    #[error("affected item is required")]
    MissingItem,

    /// No photo was attached.
    #[error("issue photo is required")]
    MissingPhoto,

    /// Quantity is zero.
    #[error("quantity must be at least 1")]
    InvalidQuantity,

    /// The issue type is not an active catalog entry.
    #[error("unknown issue type: {0}")]
    UnknownIssueType(String),

    /// The fault source is not an active catalog entry.
    #[error("unknown fault source: {0}")]
    UnknownFaultSource(String),
}

/// Issue report form input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueReport {
    /// Issue type catalog identifier.
    pub issue_type: String,
    /// Affected item description.
    pub item: String,
    /// Affected quantity.
    pub quantity: u32,
    /// Fault source catalog identifier.
    pub fault_source: String,
    /// URL of the uploaded issue photo.
    pub photo_url: String,
    /// Optional free-text note.
    pub note: Option<String>,
    /// Asks the backend to spawn a corrective production order.
    pub create_replacement: bool,
}

impl IssueReport {
    /// Creates a report for one unit of `item` without a replacement order.
    #[must_use]
    pub fn new(
        issue_type: impl Into<String>,
        item: impl Into<String>,
        fault_source: impl Into<String>,
        photo_url: impl Into<String>,
    ) -> Self {
        Self {
            issue_type: issue_type.into(),
            item: item.into(),
            quantity: 1,
            fault_source: fault_source.into(),
            photo_url: photo_url.into(),
            note: None,
            create_replacement: false,
        }
    }

    /// Sets the affected quantity.
    #[must_use]
    pub const fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    /// Sets the note.
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Requests a replacement production order.
    #[must_use]
    pub const fn with_replacement(mut self) -> Self {
        self.create_replacement = true;
        self
    }

    /// Checks the report before it is sent.
    ///
    /// # Errors
    ///
    /// Returns the first [`IssueReportError`] found, checking the item,
    /// the photo, the quantity and then both catalogs.
    pub fn validate(
        &self,
        issue_types: &[CatalogEntry],
        fault_sources: &[CatalogEntry],
    ) -> Result<(), IssueReportError> {
        if self.item.trim().is_empty() {
            return Err(IssueReportError::MissingItem);
        }
        if self.photo_url.trim().is_empty() {
            return Err(IssueReportError::MissingPhoto);
        }
        if self.quantity == 0 {
            return Err(IssueReportError::InvalidQuantity);
        }
        if !catalog_accepts(issue_types, &self.issue_type) {
            return Err(IssueReportError::UnknownIssueType(self.issue_type.clone()));
        }
        if !catalog_accepts(fault_sources, &self.fault_source) {
            return Err(IssueReportError::UnknownFaultSource(
                self.fault_source.clone(),
            ));
        }
        Ok(())
    }
}

/// Issue recorded against an assembly task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    id: IssueId,
    task_id: ItemId,
    issue_type: String,
    item: String,
    quantity: u32,
    fault_source: String,
    photo_url: String,
    note: Option<String>,
    replacement_order_id: Option<ItemId>,
    status: IssueStatus,
    created_at: DateTime<Utc>,
}

impl Issue {
    /// Creates a pending issue from a report.
    #[must_use]
    pub fn new(
        id: IssueId,
        task_id: ItemId,
        report: &IssueReport,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            task_id,
            issue_type: report.issue_type.trim().to_owned(),
            item: report.item.trim().to_owned(),
            quantity: report.quantity,
            fault_source: report.fault_source.trim().to_owned(),
            photo_url: report.photo_url.trim().to_owned(),
            note: report.note.clone(),
            replacement_order_id: None,
            status: IssueStatus::Pending,
            created_at,
        }
    }

    /// Links the corrective production order.
    #[must_use]
    pub fn with_replacement_order(mut self, order_id: ItemId) -> Self {
        self.replacement_order_id = Some(order_id);
        self
    }

    /// Returns the issue identifier.
    #[must_use]
    pub const fn id(&self) -> &IssueId {
        &self.id
    }

    /// Returns the task the issue belongs to.
    #[must_use]
    pub const fn task_id(&self) -> &ItemId {
        &self.task_id
    }

    /// Returns the issue type identifier.
    #[must_use]
    pub fn issue_type(&self) -> &str {
        &self.issue_type
    }

    /// Returns the affected item.
    #[must_use]
    pub fn item(&self) -> &str {
        &self.item
    }

    /// Returns the affected quantity.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Returns the fault source identifier.
    #[must_use]
    pub fn fault_source(&self) -> &str {
        &self.fault_source
    }

    /// Returns the photo URL.
    #[must_use]
    pub fn photo_url(&self) -> &str {
        &self.photo_url
    }

    /// Returns the note.
    #[must_use]
    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    /// Returns the corrective order, once the backend has created it.
    #[must_use]
    pub const fn replacement_order_id(&self) -> Option<&ItemId> {
        self.replacement_order_id.as_ref()
    }

    /// Returns the resolution status.
    #[must_use]
    pub const fn status(&self) -> IssueStatus {
        self.status
    }

    /// Returns when the issue was reported.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns whether the issue still blocks its task.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status == IssueStatus::Pending
    }

    /// Returns whether the issue may be resolved: it is pending and a
    /// corrective order exists.
    #[must_use]
    pub fn can_resolve(&self) -> bool {
        self.is_pending() && self.replacement_order_id.is_some()
    }

    pub(crate) fn link_replacement(&mut self, order_id: ItemId) {
        self.replacement_order_id = Some(order_id);
    }

    pub(crate) fn resolve(&mut self) {
        self.status = IssueStatus::Resolved;
    }
}
