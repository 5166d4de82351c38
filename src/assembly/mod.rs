//! On-site assembly workflow.
//!
//! Each job role is installed in ordered stages. Stages are planned on the
//! assembly calendar, started on site, blocked by reported issues and
//! completed with photo evidence; the last stage of a role also needs the
//! customer's signature. The module follows hexagonal architecture:
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
