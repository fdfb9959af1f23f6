//! Snapshot ingestion: record types, CSV loading and normalization.
//!
//! This module handles:
//! - Locating per-period snapshot files and tagging them with their period
//! - Parsing raw catalog rows
//! - Normalizing rows into the history shape

pub mod normalizer;
pub mod schema;
pub mod snapshot;

// Re-export main types
pub use normalizer::{normalize, NormalizeOptions, NormalizeReport, NormalizedSnapshot};
pub use schema::{LastReview, Listing, Period, RawListing, RoomType, Snapshot};
pub use snapshot::{discover_sources, read_rows, SnapshotSource};
