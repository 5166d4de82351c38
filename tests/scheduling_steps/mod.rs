//! Step definitions for scheduling scenarios.

mod given;
mod then;
mod when;
pub mod world;
