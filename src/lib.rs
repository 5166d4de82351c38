//! Montage: calendar scheduling and assembly workflow engine.
//!
//! This crate plans measurement appointments, production orders and
//! on-site assembly stages on calendars, records a justification whenever
//! a plan is postponed, and drives assembly stages through a completion
//! workflow with evidence and issue tracking.
//!
//! # Architecture
//!
//! Montage follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for the backend and document archive
//! - **Adapters**: Concrete implementations of ports (in-memory for now)
//!
//! # Modules
//!
//! - [`calendar`]: Month and week grids, day buckets and load indicators
//! - [`schedule`]: Drag rescheduling, the delay gate and availability advice
//! - [`assembly`]: Stage workflow, issues and completion evidence
//! - [`config`]: Runtime scheduling settings

pub mod assembly;
pub mod calendar;
pub mod config;
pub mod schedule;
