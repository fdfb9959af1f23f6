//! Consolidation of monthly snapshots into the historical dataset.

pub mod consolidator;

pub use consolidator::{consolidate, consolidate_snapshots, latest_period, Consolidated};
