//! Unit tests for the scheduling module.


use crate::schedule::domain::{ItemId, JobId, RoleId, TeamId};
use chrono::NaiveDate;

pub(super) fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

pub(super) fn item_id(value: &str) -> ItemId {
    ItemId::new(value).expect("valid item id")
}

pub(super) fn job_id(value: &str) -> JobId {
    JobId::new(value).expect("valid job id")
}

pub(super) fn role_id(value: &str) -> RoleId {
    RoleId::new(value).expect("valid role id")
}

pub(super) fn team_id(value: &str) -> TeamId {
    TeamId::new(value).expect("valid team id")
}
