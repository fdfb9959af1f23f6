//! Run command: fetch, consolidate and report in one go.

use super::consolidate::execute_consolidate;
use super::fetch::{execute_fetch, validate_fetch_args};
use super::models::{ConsolidateArgs, FetchArgs, ReportArgs, ReportSummary};
use super::report::{generate_report, validate_report_args};
use super::utils::render_normalize_report;
use crate::utils::config::PipelineConfig;
use anyhow::{Context, Result};
use log::info;
use std::time::Instant;

/// Execute the full pipeline
///
/// **Public** - main entry point called from main.rs
///
/// `skip_fetch` reuses snapshots already in the raw-data directory.
pub fn execute_run(config: &PipelineConfig, skip_fetch: bool) -> Result<ReportSummary> {
    let start_time = Instant::now();

    let fetch_args = FetchArgs::from_config(config);
    let consolidate_args = ConsolidateArgs::from_config(config);
    let report_args = ReportArgs::from_config(config);
    validate_fetch_args(&fetch_args)?;
    validate_report_args(&report_args)?;

    if skip_fetch {
        info!("Stage 1/3: Skipping fetch, using {}", fetch_args.raw_dir.display());
    } else {
        info!("Stage 1/3: Fetch");
        execute_fetch(&fetch_args).context("Fetch stage failed")?;
    }

    info!("Stage 2/3: Consolidate");
    let (consolidated, normalization) =
        execute_consolidate(&consolidate_args).context("Consolidate stage failed")?;
    print!("{}", render_normalize_report(&normalization));

    info!("Stage 3/3: Report");
    let summary = generate_report(&consolidated, Some(normalization), &report_args)
        .context("Report stage failed")?;

    info!(
        "Pipeline completed in {:.2}s",
        start_time.elapsed().as_secs_f64()
    );
    Ok(summary)
}
