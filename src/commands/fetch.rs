//! Fetch command implementation.
//!
//! Scrapes the catalog page for the city's snapshot links and downloads one
//! CSV per collection period into the raw-data directory.

use super::models::FetchArgs;
use crate::catalog::CatalogClient;
use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;
use std::time::Instant;

/// Execute the fetch command
///
/// **Public** - main entry point called from main.rs
///
/// # Returns
/// Paths of the downloaded snapshots, in period order
///
/// # Errors
/// * Catalog page unreachable or without links for the city
/// * Download or file write failures
pub fn execute_fetch(args: &FetchArgs) -> Result<Vec<PathBuf>> {
    let start_time = Instant::now();

    info!("Fetching '{}' snapshots from {}", args.city, args.catalog_url);

    let client = CatalogClient::new(&args.catalog_url).context("Failed to create HTTP client")?;

    info!("Step 1/2: Reading catalog page...");
    let links = client
        .snapshot_links(&args.city)
        .context("Failed to list snapshots on the catalog page")?;

    info!("Step 2/2: Downloading {} snapshots...", links.len());
    let written = client
        .download_snapshots(&links, &args.raw_dir)
        .with_context(|| format!("Failed to download snapshots to {}", args.raw_dir.display()))?;

    info!(
        "✓ {} snapshots saved to {} in {:.2}s",
        written.len(),
        args.raw_dir.display(),
        start_time.elapsed().as_secs_f64()
    );

    Ok(written)
}

/// Validate fetch arguments
///
/// **Public** - can be called before execute_fetch for early validation
pub fn validate_fetch_args(args: &FetchArgs) -> Result<()> {
    if args.catalog_url.is_empty() {
        anyhow::bail!("Catalog URL cannot be empty");
    }

    if !args.catalog_url.starts_with("http://") && !args.catalog_url.starts_with("https://") {
        anyhow::bail!("Catalog URL must start with http:// or https://");
    }

    if args.city.trim().is_empty() {
        anyhow::bail!("City cannot be empty");
    }

    if args.city.contains('/') {
        anyhow::bail!("City must be a single path segment");
    }

    Ok(())
}
