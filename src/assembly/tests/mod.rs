//! Unit tests for the assembly module.

mod stage_tests;

use crate::{
    assembly::domain::{AssemblyTask, StageOrder},
    schedule::domain::{ItemId, JobId, RoleId},
};
use chrono::NaiveDate;

pub(super) fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

pub(super) fn item_id(value: &str) -> ItemId {
    ItemId::new(value).expect("valid item id")
}

/// Builds a pending stage `id` of `job`/`role` at `order`.
pub(super) fn stage(id: &str, job: &str, role: &str, order: u32) -> AssemblyTask {
    AssemblyTask::new(
        item_id(id),
        JobId::new(job).expect("valid job id"),
        RoleId::new(role).expect("valid role id"),
        format!("{role} stage {order}"),
        StageOrder::new(order).expect("valid stage order"),
    )
}
