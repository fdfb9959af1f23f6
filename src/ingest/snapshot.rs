//! Raw snapshot discovery and loading.
//!
//! A snapshot is one CSV file per collection period. The period comes from
//! the file name (`2019-07.csv`), never from the file contents.

use super::schema::{Period, RawListing, Snapshot};
use crate::utils::error::IngestError;
use log::{debug, info};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// A snapshot file and the period it was collected in
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SnapshotSource {
    pub period: Period,
    pub path: PathBuf,
}

impl SnapshotSource {
    /// Build a source from a file path, reading the period from its name
    ///
    /// # Errors
    /// * `IngestError::MissingPeriod` - the file name has no `YYYY-MM` token
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self, IngestError> {
        let path = path.into();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let period = Period::from_source_name(&file_name)?;
        Ok(Self { period, path })
    }

    /// Load and parse the file
    pub fn load(&self) -> Result<Snapshot, IngestError> {
        let file = File::open(&self.path)?;
        let rows = read_rows(file, &self.path.display().to_string())?;
        info!(
            "Loaded {} rows for {} from {}",
            rows.len(),
            self.period,
            self.path.display()
        );
        Ok(Snapshot {
            period: self.period.clone(),
            rows,
        })
    }
}

/// List the snapshot files in a raw-data directory, ordered by period
///
/// Hidden files and files without a `.csv` extension are skipped. Every
/// remaining file must carry a period token in its name.
///
/// # Errors
/// * `IngestError::IoError` - the directory cannot be read
/// * `IngestError::MissingPeriod` - a CSV file cannot be tagged
pub fn discover_sources(dir: impl AsRef<Path>) -> Result<Vec<SnapshotSource>, IngestError> {
    let dir = dir.as_ref();
    debug!("Scanning {} for snapshots", dir.display());

    let mut sources = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !is_data_file(&path) {
            debug!("Skipping non-snapshot file: {}", path.display());
            continue;
        }
        sources.push(SnapshotSource::from_path(path)?);
    }

    sources.sort();
    debug!("Found {} snapshot files", sources.len());
    Ok(sources)
}

/// Parse CSV rows from any reader
///
/// `source_name` is only used in error messages.
pub fn read_rows<R: Read>(reader: R, source_name: &str) -> Result<Vec<RawListing>, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    reader
        .deserialize()
        .collect::<Result<Vec<RawListing>, _>>()
        .map_err(|error| IngestError::Csv {
            source_name: source_name.to_string(),
            error,
        })
}

/// Check whether a path looks like a snapshot file
///
/// **Private** - internal filter for discover_sources
fn is_data_file(path: &Path) -> bool {
    let hidden = path
        .file_name()
        .map(|n| n.to_string_lossy().starts_with('.'))
        .unwrap_or(true);
    let csv = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);
    path.is_file() && !hidden && csv
}
