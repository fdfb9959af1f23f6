//! Configuration and constants for the pipeline.

use crate::utils::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default timeout for catalog and snapshot downloads
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(120);

/// Current metrics report schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Catalog page listing every published snapshot
pub const DEFAULT_CATALOG_URL: &str = "http://insideairbnb.com/get-the-data.html";

/// URL path segment identifying the city in catalog links
pub const DEFAULT_CITY: &str = "paris";

/// Replacement for missing listing and host names
pub const UNKNOWN_PLACEHOLDER: &str = "Unknown";

/// Sentinel stored in `last_review` for listings that were never reviewed
pub const NEVER_REVIEWED: &str = "Never";

// Directory and file layout, relative to the configured roots
pub const RAW_DATA_DIR: &str = "raw-data";
pub const CLEANED_DATA_DIR: &str = "cleaned-data";
pub const HISTORY_FILE_NAME: &str = "listings-hist.csv";
pub const METRICS_FILE_NAME: &str = "metrics.json";
pub const FRAMES_DIR: &str = "gif-frames";
pub const ANIMATION_FILE_NAME: &str = "map-hist-listing-count.svg";

// Map viewport in World Mercator metres (EPSG:3395), framing the city
pub const MAP_X_RANGE: (f64, f64) = (245_000.0, 277_250.0);
pub const MAP_Y_RANGE: (f64, f64) = (6_210_000.0, 6_228_000.0);

/// Pipeline configuration, loaded from an optional TOML file
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Catalog page to scrape for snapshot links
    pub catalog_url: String,

    /// City path segment used to select links on the catalog page
    pub city: String,

    /// Root for `raw-data/` and `cleaned-data/`
    pub data_dir: PathBuf,

    /// Where maps, charts and the metrics report are written
    pub graphs_dir: PathBuf,

    /// Neighbourhood boundaries (GeoJSON)
    pub boundaries: PathBuf,

    /// Fail the run when a neighbourhood cannot be mapped to a district
    pub strict_districts: bool,

    /// Frames per second of the listing-count animation
    pub frame_rate: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            city: DEFAULT_CITY.to_string(),
            data_dir: PathBuf::from("data"),
            graphs_dir: PathBuf::from("graphs"),
            boundaries: PathBuf::from("neighbourhoods.geojson"),
            strict_districts: false,
            frame_rate: 4,
        }
    }
}

impl PipelineConfig {
    /// Directory holding one raw CSV per collection period
    pub fn raw_dir(&self) -> PathBuf {
        self.data_dir.join(RAW_DATA_DIR)
    }

    /// Path of the consolidated history table
    pub fn history_path(&self) -> PathBuf {
        self.data_dir.join(CLEANED_DATA_DIR).join(HISTORY_FILE_NAME)
    }

    pub fn frames_dir(&self) -> PathBuf {
        self.graphs_dir.join(FRAMES_DIR)
    }

    /// Reject values that would make the run meaningless
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.catalog_url.starts_with("http://") && !self.catalog_url.starts_with("https://") {
            return Err(ConfigError::Invalid(
                "catalog_url must start with http:// or https://".to_string(),
            ));
        }
        if self.city.trim().is_empty() {
            return Err(ConfigError::Invalid("city cannot be empty".to_string()));
        }
        if self.frame_rate == 0 {
            return Err(ConfigError::Invalid(
                "frame_rate must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Load a pipeline configuration from a TOML file
///
/// Missing keys fall back to their defaults.
///
/// # Errors
/// * `ConfigError::Io` - If the file cannot be read
/// * `ConfigError::Parse` - If the TOML is invalid
/// * `ConfigError::Invalid` - If a value fails validation
pub fn load_config(path: impl AsRef<Path>) -> Result<PipelineConfig, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    let config: PipelineConfig = toml::from_str(&contents)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_are_valid() {
        assert!(PipelineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_derived_paths() {
        let config = PipelineConfig::default();
        assert_eq!(config.raw_dir(), PathBuf::from("data/raw-data"));
        assert_eq!(
            config.history_path(),
            PathBuf::from("data/cleaned-data/listings-hist.csv")
        );
        assert_eq!(config.frames_dir(), PathBuf::from("graphs/gif-frames"));
    }

    #[test]
    fn test_load_partial_config() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "strict_districts = true").unwrap();
        writeln!(file, "graphs_dir = \"out\"").unwrap();

        let config = load_config(file.path()).unwrap();

        assert!(config.strict_districts);
        assert_eq!(config.graphs_dir, PathBuf::from("out"));
        assert_eq!(config.city, DEFAULT_CITY);
    }

    #[test]
    fn test_load_rejects_zero_frame_rate() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "frame_rate = 0").unwrap();

        assert!(matches!(
            load_config(file.path()),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_load_rejects_bad_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "frame_rate = = 4").unwrap();

        assert!(matches!(load_config(file.path()), Err(ConfigError::Parse(_))));
    }
}
