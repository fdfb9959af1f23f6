mod common;

use common::{write_snapshots, JULY, JUNE};
use pretty_assertions::assert_eq;
use rental_atlas::history::{consolidate, Consolidated};
use rental_atlas::ingest::{discover_sources, NormalizeOptions};
use rental_atlas::output::{read_history, slug, write_history, write_svg};

#[test]
fn test_history_round_trip_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let raw = dir.path().join("raw-data");
    write_snapshots(&raw, &[("2019-06", JUNE), ("2019-07", JULY)]);

    let sources = discover_sources(&raw).unwrap();
    let (consolidated, _) = consolidate(&sources, NormalizeOptions::default()).unwrap();

    let path = dir.path().join("cleaned-data/listings-hist.csv");
    write_history(&consolidated.history, &path).unwrap();
    let reloaded = Consolidated::from_history(read_history(&path).unwrap()).unwrap();

    assert_eq!(reloaded, consolidated);
}

#[test]
fn test_history_file_uses_district_codes() {
    let dir = tempfile::tempdir().unwrap();
    let raw = dir.path().join("raw-data");
    write_snapshots(&raw, &[("2019-06", JUNE)]);

    let sources = discover_sources(&raw).unwrap();
    let (consolidated, _) = consolidate(&sources, NormalizeOptions::default()).unwrap();
    let path = dir.path().join("listings-hist.csv");
    write_history(&consolidated.history, &path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(!text.contains("neighbourhood"));
    assert!(text.contains(",Never,"));
    assert!(text.lines().nth(2).unwrap().contains(",3,"));
}

#[test]
fn test_chart_file_names() {
    assert_eq!(
        format!("hist-graph-{}.svg", slug("Evolution of the Number of Listings per Type")),
        "hist-graph-evolution-of-the-number-of-listings-per-type.svg"
    );
    assert_eq!(
        format!(
            "map-lastm-{}.svg",
            slug("Percentage of Listings over Total District Accommodations")
        ),
        "map-lastm-percentage-of-listings-over-total-district-accommodations.svg"
    );
}

#[test]
fn test_write_svg_rejects_empty_path() {
    assert!(write_svg("<svg/>", "").is_err());
}
