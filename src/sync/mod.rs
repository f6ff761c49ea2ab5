//! Reconciliation core
//!
//! Per-row decision logic: which facts is an item missing, and how is a
//! ready-to-submit fact derived from the loosely structured sheet fields.
//! `gap` decides, `build` constructs, `driver` orchestrates and submits.

mod build;
mod config;
mod driver;
mod gap;

pub use build::{coordinate_value, resolve_creator, sitelink_title, COORDINATE_PRECISION};
pub use config::SyncConfig;
pub use driver::{Reconciler, RunStats};
pub use gap::{detect_gaps, FactGap};
