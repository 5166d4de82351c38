//! Runtime scheduling settings.
//!
//! The backend serves these as part of its settings document; every field
//! has a default so a partial or empty document still yields a usable
//! configuration.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default number of items per calendar cell before the load warning shows.
pub const DEFAULT_DAILY_SOFT_LIMIT: usize = 5;

/// A selectable entry of a settings-managed catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Stable identifier submitted with forms.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Whether the entry may be selected.
    #[serde(default = "default_active")]
    pub active: bool,
}

impl CatalogEntry {
    /// Creates an active catalog entry.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            active: true,
        }
    }

    /// Marks the entry inactive.
    #[must_use]
    pub const fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}

const fn default_active() -> bool {
    true
}

/// Returns whether `id` names an active entry of `catalog`.
///
/// An empty catalog accepts any non-blank identifier.
#[must_use]
pub fn catalog_accepts(catalog: &[CatalogEntry], id: &str) -> bool {
    let wanted = id.trim();
    if wanted.is_empty() {
        return false;
    }
    catalog.is_empty()
        || catalog
            .iter()
            .any(|entry| entry.active && entry.id == wanted)
}

/// Errors returned while loading settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The settings document is not valid JSON for this shape.
    #[error("invalid scheduling settings: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Scheduling settings.
///
/// # Examples
///
///     use montage::config::SchedulingConfig;
///
///     let config = SchedulingConfig::from_json(r#"{"dailySoftLimit": 3}"#).expect("valid");
///     assert_eq!(config.daily_soft_limit, 3);
///     assert_eq!(config.issue_types.len(), 5);
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SchedulingConfig {
    /// Items per calendar cell at which the load warning shows.
    pub daily_soft_limit: usize,
    /// Time of day given to an appointment placed on the calendar for
    /// the first time.
    pub default_appointment_time: NaiveTime,
    /// Catalog of postponement reasons.
    pub delay_reasons: Vec<CatalogEntry>,
    /// Catalog of assembly issue types.
    pub issue_types: Vec<CatalogEntry>,
    /// Catalog of issue fault sources.
    pub fault_sources: Vec<CatalogEntry>,
}

impl SchedulingConfig {
    /// Parses a settings document, restoring defaults for empty catalogs.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the document is malformed.
    pub fn from_json(document: &str) -> Result<Self, ConfigError> {
        let parsed: Self = serde_json::from_str(document)?;
        Ok(parsed.with_fallback_catalogs())
    }

    /// Replaces empty issue catalogs with the built-in defaults.
    ///
    /// Delay reasons have no built-in list; an empty catalog is kept and
    /// accepts any reason identifier.
    #[must_use]
    pub fn with_fallback_catalogs(mut self) -> Self {
        if self.issue_types.is_empty() {
            self.issue_types = default_issue_types();
        }
        if self.fault_sources.is_empty() {
            self.fault_sources = default_fault_sources();
        }
        self
    }
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            daily_soft_limit: DEFAULT_DAILY_SOFT_LIMIT,
            default_appointment_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap_or(NaiveTime::MIN),
            delay_reasons: Vec::new(),
            issue_types: default_issue_types(),
            fault_sources: default_fault_sources(),
        }
    }
}

fn default_issue_types() -> Vec<CatalogEntry> {
    vec![
        CatalogEntry::new("broken", "Broken or damaged"),
        CatalogEntry::new("missing", "Missing material"),
        CatalogEntry::new("wrong", "Wrong product"),
        CatalogEntry::new("damage", "Transport or assembly damage"),
        CatalogEntry::new("other", "Other"),
    ]
}

fn default_fault_sources() -> Vec<CatalogEntry> {
    vec![
        CatalogEntry::new("production", "Production fault (supplier)"),
        CatalogEntry::new("team", "Team fault"),
        CatalogEntry::new("accident", "Accident"),
    ]
}
