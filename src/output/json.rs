//! Metrics report writer.
//!
//! Every table behind the maps and charts is collected into one JSON
//! document so results can be inspected or diffed without the images.

use super::{ensure_parent, validate_path};
use crate::aggregator::{DistrictMetricTable, PeriodSeriesTable, RoomTypeMix};
use crate::history::Consolidated;
use crate::ingest::{NormalizeReport, Period};
use crate::utils::config::SCHEMA_VERSION;
use crate::utils::error::OutputError;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// All metric tables of one report run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsReport {
    /// Report schema version
    pub version: String,

    /// RFC 3339 UTC timestamp
    pub generated_at: String,

    /// Every collection period in the history, ascending
    pub periods: Vec<Period>,

    pub latest_period: Period,

    pub history_rows: usize,

    pub latest_rows: usize,

    /// History rows whose neighbourhood had no district
    pub unmapped_rows: usize,

    /// Present when the history was consolidated in the same run
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub normalization: Option<NormalizeReport>,

    /// Latest-period district metrics (density, review intensity, price)
    pub districts: Vec<DistrictMetricTable>,

    pub room_type_mix: RoomTypeMix,

    /// Per-period series over the whole history
    pub series: Vec<PeriodSeriesTable>,
}

impl MetricsReport {
    /// Assemble a report stamped with the current time
    pub fn new(
        consolidated: &Consolidated,
        normalization: Option<NormalizeReport>,
        districts: Vec<DistrictMetricTable>,
        room_type_mix: RoomTypeMix,
        series: Vec<PeriodSeriesTable>,
    ) -> Self {
        Self {
            version: SCHEMA_VERSION.to_string(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            periods: consolidated.periods(),
            latest_period: consolidated.latest_period.clone(),
            history_rows: consolidated.history.len(),
            latest_rows: consolidated.latest.len(),
            unmapped_rows: consolidated
                .history
                .iter()
                .filter(|l| l.district.is_none())
                .count(),
            normalization,
            districts,
            room_type_mix,
            series,
        }
    }
}

/// Write a metrics report to a JSON file
///
/// **Public** - main entry point for JSON output
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
pub fn write_metrics(report: &MetricsReport, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing metrics to: {}", output_path.display());

    validate_path(output_path)?;
    ensure_parent(output_path)?;

    let writer = BufWriter::new(File::create(output_path)?);
    serde_json::to_writer_pretty(writer, report)?;

    info!(
        "Metrics written successfully ({} bytes)",
        std::fs::metadata(output_path).map(|m| m.len()).unwrap_or(0)
    );

    Ok(())
}

/// Read a metrics report from a JSON file
///
/// **Public** - useful for validation and testing
///
/// # Errors
/// * `OutputError::WriteFailed` - File read error (reusing WriteFailed for I/O)
/// * `OutputError::SerializationFailed` - JSON parse error
pub fn read_metrics(input_path: impl AsRef<Path>) -> Result<MetricsReport, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading metrics from: {}", input_path.display());

    let file = File::open(input_path)?;
    let report: MetricsReport = serde_json::from_reader(BufReader::new(file))?;

    debug!(
        "Metrics loaded: version {}, latest period {}",
        report.version, report.latest_period
    );

    Ok(report)
}
