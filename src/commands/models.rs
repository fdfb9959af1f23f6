use crate::render::RenderConfig;
use crate::utils::config::{
    PipelineConfig, ANIMATION_FILE_NAME, DEFAULT_CATALOG_URL, DEFAULT_CITY, FRAMES_DIR,
    METRICS_FILE_NAME,
};
use std::path::PathBuf;

/// Arguments for the fetch command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone, PartialEq)]
pub struct FetchArgs {
    /// Catalog page to scrape
    pub catalog_url: String,

    /// City path segment selecting the links
    pub city: String,

    /// Directory receiving one `{period}.csv` per snapshot
    pub raw_dir: PathBuf,
}

impl FetchArgs {
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            catalog_url: config.catalog_url.clone(),
            city: config.city.clone(),
            raw_dir: config.raw_dir(),
        }
    }
}

impl Default for FetchArgs {
    fn default() -> Self {
        Self {
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            city: DEFAULT_CITY.to_string(),
            raw_dir: PipelineConfig::default().raw_dir(),
        }
    }
}

/// Arguments for the consolidate command
#[derive(Debug, Clone, PartialEq)]
pub struct ConsolidateArgs {
    /// Directory of raw snapshots
    pub raw_dir: PathBuf,

    /// Where the history table is written
    pub history_path: PathBuf,

    /// Fail on neighbourhoods without a district
    pub strict_districts: bool,
}

impl ConsolidateArgs {
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            raw_dir: config.raw_dir(),
            history_path: config.history_path(),
            strict_districts: config.strict_districts,
        }
    }
}

impl Default for ConsolidateArgs {
    fn default() -> Self {
        Self::from_config(&PipelineConfig::default())
    }
}

/// Arguments for the report command
#[derive(Debug, Clone, PartialEq)]
pub struct ReportArgs {
    /// History table produced by consolidate
    pub history_path: PathBuf,

    /// Neighbourhood boundaries (GeoJSON)
    pub boundaries: PathBuf,

    /// Output directory for maps, charts and the metrics report
    pub graphs_dir: PathBuf,

    /// Frames per second of the animation
    pub frame_rate: u32,

    /// Canvas size for every rendered image
    pub render_config: RenderConfig,

    /// Print a summary table to stdout
    pub print_summary: bool,
}

impl ReportArgs {
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            history_path: config.history_path(),
            boundaries: config.boundaries.clone(),
            graphs_dir: config.graphs_dir.clone(),
            frame_rate: config.frame_rate,
            render_config: RenderConfig::default(),
            print_summary: false,
        }
    }

    pub fn metrics_path(&self) -> PathBuf {
        self.graphs_dir.join(METRICS_FILE_NAME)
    }

    pub fn frames_dir(&self) -> PathBuf {
        self.graphs_dir.join(FRAMES_DIR)
    }

    pub fn animation_path(&self) -> PathBuf {
        self.graphs_dir.join(ANIMATION_FILE_NAME)
    }
}

impl Default for ReportArgs {
    fn default() -> Self {
        Self::from_config(&PipelineConfig::default())
    }
}

/// What a report run produced
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportSummary {
    pub periods: usize,
    pub latest_period: String,
    pub history_rows: usize,
    pub latest_rows: usize,
    pub unmapped_rows: usize,

    /// Every file written, in write order
    pub artifacts: Vec<PathBuf>,
}
