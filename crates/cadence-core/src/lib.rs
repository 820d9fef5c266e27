//! cadence-core: recurrence engine, schedule state, and JSON store for the
//! cadence compliance-task scheduler.
//!
//! # Conventions
//!
//! - **Errors**: typed [`error::CadenceError`] values carrying an
//!   [`error::ErrorCode`] out of the core; `anyhow::Result` with context at
//!   the binary boundary.
//! - **Logging**: `tracing` macros (`info!`, `warn!`, `debug!`).

pub mod calendar;
pub mod config;
pub mod error;
pub mod model;
pub mod recur;
pub mod schedule;
pub mod storage;
