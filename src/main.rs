//! Rental Atlas CLI
//!
//! Fetches Paris listing snapshots, consolidates them into a history table
//! and renders district maps, an animation and evolution charts.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use rental_atlas::commands::{
    display_version, execute_consolidate, execute_fetch, execute_report, execute_run,
    render_normalize_report, render_report_summary, validate_fetch_args, validate_report_args,
    ConsolidateArgs, FetchArgs, ReportArgs,
};
use rental_atlas::render::RenderConfig;
use rental_atlas::utils::config::{load_config, PipelineConfig};

/// Rental Atlas - short-term rental listings across the Paris districts
#[derive(Parser, Debug)]
#[command(name = "rental-atlas")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Pipeline configuration file (TOML)
    #[arg(short, long, global = true, env = "RENTAL_ATLAS_CONFIG")]
    config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Download every published snapshot for the city
    Fetch {
        /// Catalog page URL (overrides the config file)
        #[arg(long)]
        catalog_url: Option<String>,

        /// City path segment (overrides the config file)
        #[arg(long)]
        city: Option<String>,
    },

    /// Merge raw snapshots into the history table
    Consolidate {
        /// Fail when a neighbourhood has no district
        #[arg(long)]
        strict: bool,
    },

    /// Render maps, animation and charts from the history table
    Report {
        /// Neighbourhood boundaries (overrides the config file)
        #[arg(short, long)]
        boundaries: Option<PathBuf>,

        /// Output directory (overrides the config file)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Image width in pixels
        #[arg(long, default_value = "1200")]
        width: usize,

        /// Image height in pixels
        #[arg(long, default_value = "640")]
        height: usize,

        /// Print a summary to stdout
        #[arg(long)]
        summary: bool,
    },

    /// Fetch, consolidate and report
    Run {
        /// Reuse the snapshots already downloaded
        #[arg(long)]
        skip_fetch: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let config = match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => PipelineConfig::default(),
    };

    // Execute command
    match cli.command {
        Commands::Fetch { catalog_url, city } => {
            let mut args = FetchArgs::from_config(&config);
            if let Some(url) = catalog_url {
                args.catalog_url = url;
            }
            if let Some(city) = city {
                args.city = city;
            }

            validate_fetch_args(&args)?;
            execute_fetch(&args)?;
        }

        Commands::Consolidate { strict } => {
            let mut args = ConsolidateArgs::from_config(&config);
            args.strict_districts |= strict;

            let (_, report) = execute_consolidate(&args)?;
            print!("{}", render_normalize_report(&report));
        }

        Commands::Report {
            boundaries,
            output,
            width,
            height,
            summary,
        } => {
            let mut args = ReportArgs::from_config(&config);
            if let Some(path) = boundaries {
                args.boundaries = path;
            }
            if let Some(dir) = output {
                args.graphs_dir = dir;
            }
            args.render_config = RenderConfig::new().with_size(width, height);
            args.print_summary = summary;

            validate_report_args(&args)?;
            let report = execute_report(&args)?;
            if args.print_summary {
                print!("{}", render_report_summary(&report));
            }
        }

        Commands::Run { skip_fetch } => {
            let report = execute_run(&config, skip_fetch)?;
            print!("{}", render_report_summary(&report));
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
