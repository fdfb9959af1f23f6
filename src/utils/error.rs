//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Errors that can occur while reading the catalog or downloading snapshots
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    BadStatus { url: String, status: u16 },

    #[error("No listing files found for city '{0}' on the catalog page")]
    NoListings(String),

    #[error("Failed to save snapshot: {0}")]
    IoError(#[from] std::io::Error),
}

/// Errors that can occur while loading a raw snapshot
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("No YYYY-MM period token in source name: {0}")]
    MissingPeriod(String),

    #[error("Invalid period token: {0}")]
    InvalidPeriod(String),

    #[error("CSV error in {source_name}: {error}")]
    Csv {
        source_name: String,
        #[source]
        error: csv::Error,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Errors that abort consolidation
#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("No snapshot sources to consolidate")]
    NoSnapshots,

    #[error("Two snapshot sources share the period {0}")]
    DuplicatePeriod(String),

    #[error("{count} rows have neighbourhoods with no district: {names}")]
    UnmappedNeighbourhoods { count: usize, names: String },

    #[error("Failed to load snapshot: {0}")]
    Ingest(#[from] IngestError),
}

/// Errors that can occur while loading boundary data
#[derive(Error, Debug)]
pub enum GeoError {
    #[error("GeoJSON deserialization failed: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid boundary geometry: {0}")]
    InvalidGeometry(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Errors that can occur while rendering maps and charts
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Nothing to render: {0}")]
    EmptyData(String),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    CsvFailed(#[from] csv::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}

/// Errors that can occur while loading the pipeline configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}
