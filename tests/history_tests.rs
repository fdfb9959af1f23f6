mod common;

use common::{write_snapshots, JULY, JUNE};
use pretty_assertions::assert_eq;
use rental_atlas::history::{consolidate, consolidate_snapshots};
use rental_atlas::ingest::{
    discover_sources, read_rows, LastReview, NormalizeOptions, Period, Snapshot,
};
use rental_atlas::reference::District;
use rental_atlas::utils::error::HistoryError;

fn snapshot(period: &str, rows: &str) -> Snapshot {
    Snapshot {
        period: Period::parse(period).unwrap(),
        rows: read_rows(common::snapshot_csv(rows).as_bytes(), period).unwrap(),
    }
}

#[test]
fn test_two_sources_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    write_snapshots(dir.path(), &[("2019-06", JUNE), ("2019-07", JULY)]);

    let sources = discover_sources(dir.path()).unwrap();
    let (consolidated, report) = consolidate(&sources, NormalizeOptions::default()).unwrap();

    assert_eq!(consolidated.history.len(), 5);
    assert_eq!(consolidated.periods().len(), 2);
    assert_eq!(consolidated.latest_period.as_str(), "2019-07");
    assert_eq!(consolidated.latest.len(), 2);
    assert!(consolidated
        .latest
        .iter()
        .all(|l| l.period.as_str() == "2019-07"));

    let never = consolidated
        .history
        .iter()
        .find(|l| l.id == 2)
        .unwrap();
    assert_eq!(never.period.as_str(), "2019-06");
    assert_eq!(never.reviews_per_month, Some(0.0));
    assert_eq!(never.last_review, Some(LastReview::Never));
    assert_eq!(never.name, "Unknown");
    assert_eq!(never.host_name, "Unknown");

    assert_eq!(report.rows, 5);
    assert_eq!(report.never_reviewed, 1);
    assert!(report.is_clean());
}

#[test]
fn test_districts_and_prices() {
    let (consolidated, _) = consolidate_snapshots(
        vec![snapshot("2019-06", JUNE)],
        NormalizeOptions::default(),
    )
    .unwrap();

    let districts: Vec<Option<u8>> = consolidated
        .history
        .iter()
        .map(|l| l.district.map(District::code))
        .collect();
    assert_eq!(districts, vec![Some(1), Some(3), Some(10)]);
    assert_eq!(consolidated.history[2].price, Some(1050.0));
}

#[test]
fn test_source_order_does_not_matter() {
    let options = NormalizeOptions::default();
    let forward = consolidate_snapshots(
        vec![snapshot("2019-06", JUNE), snapshot("2019-07", JULY)],
        options,
    )
    .unwrap();
    let backward = consolidate_snapshots(
        vec![snapshot("2019-07", JULY), snapshot("2019-06", JUNE)],
        options,
    )
    .unwrap();

    assert_eq!(forward, backward);
}

#[test]
fn test_consolidation_is_idempotent() {
    let run = || {
        consolidate_snapshots(
            vec![snapshot("2019-06", JUNE), snapshot("2019-07", JULY)],
            NormalizeOptions::default(),
        )
        .unwrap()
    };
    assert_eq!(run(), run());
}

#[test]
fn test_latest_is_max_period_subset() {
    let (consolidated, _) = consolidate_snapshots(
        vec![
            snapshot("2019-07", JULY),
            snapshot("2018-12", JUNE),
            snapshot("2019-06", JUNE),
        ],
        NormalizeOptions::default(),
    )
    .unwrap();

    let max = consolidated.periods().into_iter().max().unwrap();
    assert_eq!(consolidated.latest_period, max);
    let expected: Vec<_> = consolidated
        .history
        .iter()
        .filter(|l| l.period == max)
        .cloned()
        .collect();
    assert_eq!(consolidated.latest, expected);
}

#[test]
fn test_duplicate_period_is_fatal() {
    let result = consolidate_snapshots(
        vec![snapshot("2019-06", JUNE), snapshot("2019-06", JULY)],
        NormalizeOptions::default(),
    );
    assert!(matches!(result, Err(HistoryError::DuplicatePeriod(p)) if p == "2019-06"));
}

#[test]
fn test_unmapped_neighbourhood() {
    let rows = "9,Somewhere,1,Dee,,Atlantis,48.85,2.35,Private room,40,1,3,2019-06-01,0.3,1,10";

    let (consolidated, report) = consolidate_snapshots(
        vec![snapshot("2019-06", rows)],
        NormalizeOptions::default(),
    )
    .unwrap();
    assert_eq!(consolidated.history[0].district, None);
    assert_eq!(report.unmapped_rows(), 1);

    let strict = consolidate_snapshots(
        vec![snapshot("2019-06", rows)],
        NormalizeOptions {
            strict_districts: true,
        },
    );
    assert!(matches!(
        strict,
        Err(HistoryError::UnmappedNeighbourhoods { count: 1, .. })
    ));
}

#[test]
fn test_untagged_file_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    write_snapshots(dir.path(), &[("2019-06", JUNE)]);
    std::fs::write(dir.path().join("listings.csv"), common::snapshot_csv(JULY)).unwrap();

    assert!(discover_sources(dir.path()).is_err());
}

#[test]
fn test_missing_coordinates_survive_consolidation() {
    let rows = "5,No pin,14,Eve,,Louvre,,2.3350,Private room,70,1,2,2019-06-10,0.5,1,60\n\
                6,Pinned,15,Fay,,Temple,48.8630,2.3610,Private room,65,1,1,2019-06-12,0.2,1,90";

    let (consolidated, _) = consolidate_snapshots(
        vec![snapshot("2019-06", rows)],
        NormalizeOptions::default(),
    )
    .unwrap();

    assert_eq!(consolidated.history.len(), 2);
    let unpinned = &consolidated.history[0];
    assert_eq!(unpinned.id, 5);
    assert_eq!(unpinned.latitude, None);
    assert_eq!(unpinned.longitude, Some(2.335));
    assert_eq!(unpinned.district, District::new(1));
}
