//! Catalog access: find published snapshots and download them.

pub mod client;

pub use client::{extract_listing_links, CatalogClient, SnapshotLink};
