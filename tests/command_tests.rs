mod common;

use common::{write_snapshots, BOUNDARIES, JULY, JUNE};
use pretty_assertions::assert_eq;
use rental_atlas::commands::{
    execute_consolidate, execute_report, validate_fetch_args, validate_report_args,
    ConsolidateArgs, FetchArgs, ReportArgs,
};
use rental_atlas::output::read_metrics;
use rental_atlas::utils::config::PipelineConfig;
use std::path::Path;

fn config_in(root: &Path) -> PipelineConfig {
    let boundaries = root.join("neighbourhoods.geojson");
    std::fs::write(&boundaries, BOUNDARIES).unwrap();
    PipelineConfig {
        data_dir: root.join("data"),
        graphs_dir: root.join("graphs"),
        boundaries,
        ..Default::default()
    }
}

#[test]
fn test_consolidate_then_report() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    write_snapshots(&config.raw_dir(), &[("2019-06", JUNE), ("2019-07", JULY)]);

    let (consolidated, report) =
        execute_consolidate(&ConsolidateArgs::from_config(&config)).unwrap();
    assert_eq!(consolidated.history.len(), 5);
    assert_eq!(report.never_reviewed, 1);
    assert!(config.history_path().exists());

    let args = ReportArgs::from_config(&config);
    validate_report_args(&args).unwrap();
    let summary = execute_report(&args).unwrap();

    assert_eq!(summary.periods, 2);
    assert_eq!(summary.latest_period, "2019-07");
    assert_eq!(summary.history_rows, 5);
    assert_eq!(summary.latest_rows, 2);
    assert_eq!(summary.unmapped_rows, 0);

    let graphs = dir.path().join("graphs");
    for name in [
        "metrics.json",
        "map-lastm-percentage-of-listings-over-total-district-accommodations.svg",
        "map-lastm-average-number-of-reviews-per-listing.svg",
        "map-lastm-average-price-per-night.svg",
        "gif-frames/gif-frame-2019-06.svg",
        "gif-frames/gif-frame-2019-07.svg",
        "map-hist-listing-count.svg",
        "hist-graph-listing-types-per-district.svg",
        "hist-graph-evolution-of-the-number-of-reviews.svg",
        "hist-graph-evolution-of-the-number-of-listings.svg",
        "hist-graph-evolution-of-the-number-of-listings-per-type.svg",
        "hist-graph-evolution-of-the-average-price-per-night.svg",
        "hist-graph-evolution-of-the-average-price-per-night-per-listing-type.svg",
        "hist-graph-evolution-of-the-number-of-listings-vs-reviews.svg",
    ] {
        assert!(graphs.join(name).exists(), "missing {}", name);
    }
    assert_eq!(summary.artifacts.len(), 14);

    let metrics = read_metrics(graphs.join("metrics.json")).unwrap();
    assert_eq!(metrics.districts.len(), 3);
    assert_eq!(metrics.series.len(), 5);
    assert!(metrics.normalization.is_none());
}

#[test]
fn test_report_without_history_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());

    assert!(execute_report(&ReportArgs::from_config(&config)).is_err());
}

#[test]
fn test_consolidate_strict_mode() {
    let dir = tempfile::tempdir().unwrap();
    let config = PipelineConfig {
        strict_districts: true,
        ..config_in(dir.path())
    };
    let rows = "9,Somewhere,1,Dee,,Atlantis,48.85,2.35,Private room,40,1,3,2019-06-01,0.3,1,10";
    write_snapshots(&config.raw_dir(), &[("2019-06", rows)]);

    let result = execute_consolidate(&ConsolidateArgs::from_config(&config));

    assert!(result.is_err());
    assert!(!config.history_path().exists());
}

#[test]
fn test_fetch_args_follow_config() {
    let config = PipelineConfig {
        city: "lyon".to_string(),
        ..Default::default()
    };
    let args = FetchArgs::from_config(&config);

    assert_eq!(args.city, "lyon");
    assert_eq!(args.raw_dir, config.raw_dir());
    assert!(validate_fetch_args(&args).is_ok());
}
