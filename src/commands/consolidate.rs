//! Consolidate command implementation.
//!
//! The consolidate command:
//! 1. Discovers raw snapshots
//! 2. Loads, normalizes and merges them
//! 3. Writes the history table

use super::models::ConsolidateArgs;
use crate::history::{consolidate, Consolidated};
use crate::ingest::{discover_sources, NormalizeOptions, NormalizeReport};
use crate::output::write_history;
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::time::Instant;

/// Execute the consolidate command
///
/// **Public** - main entry point called from main.rs
///
/// # Returns
/// The consolidated history and the normalization findings
///
/// # Errors
/// * Unreadable raw-data directory or untagged snapshot files
/// * Duplicate periods, or unmapped neighbourhoods in strict mode
/// * History write failures
pub fn execute_consolidate(args: &ConsolidateArgs) -> Result<(Consolidated, NormalizeReport)> {
    let start_time = Instant::now();

    info!("Step 1/3: Discovering snapshots in {}...", args.raw_dir.display());
    let sources = discover_sources(&args.raw_dir)
        .with_context(|| format!("Failed to scan {}", args.raw_dir.display()))?;
    for source in &sources {
        debug!("  {} <- {}", source.period, source.path.display());
    }

    info!("Step 2/3: Consolidating {} snapshots...", sources.len());
    let options = NormalizeOptions {
        strict_districts: args.strict_districts,
    };
    let (consolidated, report) =
        consolidate(&sources, options).context("Failed to consolidate snapshots")?;

    if !report.is_clean() {
        warn!(
            "{} of {} rows kept without a district",
            report.unmapped_rows(),
            report.rows
        );
    }

    info!("Step 3/3: Writing history...");
    write_history(&consolidated.history, &args.history_path)
        .context("Failed to write history table")?;

    info!(
        "✓ History written to {} ({} rows, latest period {}) in {:.2}s",
        args.history_path.display(),
        consolidated.history.len(),
        consolidated.latest_period,
        start_time.elapsed().as_secs_f64()
    );

    Ok((consolidated, report))
}
