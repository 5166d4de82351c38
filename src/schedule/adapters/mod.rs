//! Adapter implementations for scheduling ports.

pub mod memory;
