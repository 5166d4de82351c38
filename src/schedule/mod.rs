//! Calendar scheduling of appointments, production orders and assembly
//! tasks.
//!
//! Items are planned by dragging them onto calendar days. Moving an item
//! earlier, or placing it for the first time, commits directly; moving it
//! later opens the delay justification gate, which records who is
//! responsible and why before the new date is written. The module follows
//! hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
