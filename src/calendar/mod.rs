//! Calendar grid and date-bucketing model.
//!
//! Everything here is pure computation over dates: building the fixed-size
//! month grid and the Monday-anchored week grid, grouping items into
//! day buckets, and flagging cells whose load reaches the daily soft limit.
//! No collaborator is consulted.

mod bucket;
mod error;
mod grid;
mod planned_at;

pub use bucket::{DayLoad, bucket_items_by_date};
pub use error::CalendarError;
pub use grid::{
    CalendarView, DayCell, MONTH_GRID_CELLS, WEEK_GRID_CELLS, build_month_grid, build_week_grid,
    week_start,
};
pub use planned_at::PlannedAt;
