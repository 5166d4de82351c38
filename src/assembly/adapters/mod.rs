//! Adapter implementations for assembly ports.

pub mod memory;
