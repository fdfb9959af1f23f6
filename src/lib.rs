//! Rental Atlas
//!
//! Monthly snapshots of short-term rental listings for Paris, consolidated
//! into a history table and reported as district maps, an animation of the
//! listing count over time, and evolution charts.
//!
//! This crate provides the core implementation for the
//! `rental-atlas` CLI tool.
//!
//! ## Pipeline
//!
//! ```text
//! catalog -> raw-data/{YYYY-MM}.csv -> ingest -> history -> aggregator -> render -> output
//! ```
//!
//! Most users should run the CLI:
//!
//! ```bash
//! rental-atlas run --config atlas.toml
//! ```

pub mod aggregator;
pub mod catalog;
pub mod commands;
pub mod geo;
pub mod history;
pub mod ingest;
pub mod output;
pub mod reference;
pub mod render;
pub mod utils;
