//! Shared helpers for in-memory integration tests.

use chrono::NaiveDate;
use mockable::DefaultClock;
use montage::{
    assembly::domain::{AssemblyTask, StageOrder},
    config::{CatalogEntry, SchedulingConfig},
    schedule::domain::{ItemId, JobId, RoleId, TeamId},
};
use rstest::fixture;
use std::sync::Arc;

/// Provides scheduling settings with a small delay reason catalog.
#[fixture]
pub fn config() -> SchedulingConfig {
    SchedulingConfig {
        delay_reasons: vec![
            CatalogEntry::new("malzeme eksik", "Missing material"),
            CatalogEntry::new("musteri talebi", "Customer request"),
        ],
        ..SchedulingConfig::default()
    }
}

/// Provides a shared system clock.
#[fixture]
pub fn clock() -> Arc<DefaultClock> {
    Arc::new(DefaultClock)
}

/// Builds a calendar date.
///
/// # Panics
///
/// Panics if the date does not exist.
pub fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

/// Builds an item identifier.
///
/// # Panics
///
/// Panics if `value` is blank.
pub fn item_id(value: &str) -> ItemId {
    ItemId::new(value).expect("valid item id")
}

/// Builds a job identifier.
///
/// # Panics
///
/// Panics if `value` is blank.
pub fn job_id(value: &str) -> JobId {
    JobId::new(value).expect("valid job id")
}

/// Builds a role identifier.
///
/// # Panics
///
/// Panics if `value` is blank.
pub fn role_id(value: &str) -> RoleId {
    RoleId::new(value).expect("valid role id")
}

/// Builds a team identifier.
///
/// # Panics
///
/// Panics if `value` is blank.
pub fn team_id(value: &str) -> TeamId {
    TeamId::new(value).expect("valid team id")
}

/// Builds a pending assembly stage.
///
/// # Panics
///
/// Panics if `order` is zero.
pub fn stage(id: &str, job: &str, role: &str, order: u32) -> AssemblyTask {
    AssemblyTask::new(
        item_id(id),
        job_id(job),
        role_id(role),
        format!("{role} stage {order}"),
        StageOrder::new(order).expect("valid stage order"),
    )
}
