//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod consolidate;
pub mod fetch;
pub mod models;
pub mod report;
pub mod run;
pub mod utils;

// Re-export main command functions
pub use consolidate::execute_consolidate;
pub use fetch::{execute_fetch, validate_fetch_args};
pub use models::{ConsolidateArgs, FetchArgs, ReportArgs, ReportSummary};
pub use report::{execute_report, generate_report, validate_report_args};
pub use run::execute_run;
pub use utils::{display_version, render_normalize_report, render_report_summary};
