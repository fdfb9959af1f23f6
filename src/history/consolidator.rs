//! Merge per-period snapshots into one history table.
//!
//! Algorithm:
//! 1. Tag every raw row with its snapshot's period and accumulate
//! 2. Normalize the accumulated rows in a single pass
//! 3. Order rows by (period, id) so the table does not depend on source order
//! 4. Slice out the most recent period

use crate::ingest::{
    normalize, Listing, NormalizeOptions, NormalizeReport, Period, RawListing, Snapshot,
    SnapshotSource,
};
use crate::utils::error::{HistoryError, IngestError};
use log::{debug, info};
use std::collections::BTreeSet;

/// The history table and its latest-period view
#[derive(Debug, Clone, PartialEq)]
pub struct Consolidated {
    /// Every normalized row of every period, ordered by (period, id)
    pub history: Vec<Listing>,

    /// Most recent period present in the history
    pub latest_period: Period,

    /// Rows of `history` collected in `latest_period`
    pub latest: Vec<Listing>,
}

impl Consolidated {
    /// Wrap an already-normalized history, e.g. one read back from disk
    ///
    /// # Errors
    /// * `HistoryError::NoSnapshots` - the history is empty
    pub fn from_history(mut history: Vec<Listing>) -> Result<Self, HistoryError> {
        sort_history(&mut history);
        let latest_period = latest_period(&history).ok_or(HistoryError::NoSnapshots)?;
        let latest = period_slice(&history, &latest_period);

        debug!(
            "Latest period {} has {} of {} rows",
            latest_period,
            latest.len(),
            history.len()
        );

        Ok(Self {
            history,
            latest_period,
            latest,
        })
    }

    /// Distinct periods in ascending order
    pub fn periods(&self) -> Vec<Period> {
        self.history
            .iter()
            .map(|l| l.period.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Rows collected in one period
    pub fn period(&self, period: &Period) -> Vec<Listing> {
        period_slice(&self.history, period)
    }
}

/// Load every source from disk and consolidate
///
/// **Public** - main entry point for file-backed consolidation
///
/// # Errors
/// * `HistoryError::NoSnapshots` - `sources` is empty
/// * `HistoryError::DuplicatePeriod` - two sources share a period
/// * `HistoryError::Ingest` - a source cannot be read or parsed
/// * `HistoryError::UnmappedNeighbourhoods` - strict mode only
pub fn consolidate(
    sources: &[SnapshotSource],
    options: NormalizeOptions,
) -> Result<(Consolidated, NormalizeReport), HistoryError> {
    info!("Consolidating {} snapshot files", sources.len());

    let snapshots = sources
        .iter()
        .map(SnapshotSource::load)
        .collect::<Result<Vec<_>, IngestError>>()?;

    consolidate_snapshots(snapshots, options)
}

/// Consolidate snapshots that are already in memory
///
/// # Errors
/// Same as [`consolidate`], minus I/O failures.
pub fn consolidate_snapshots(
    mut snapshots: Vec<Snapshot>,
    options: NormalizeOptions,
) -> Result<(Consolidated, NormalizeReport), HistoryError> {
    if snapshots.is_empty() {
        return Err(HistoryError::NoSnapshots);
    }

    snapshots.sort_by(|a, b| a.period.cmp(&b.period));
    if let Some(pair) = snapshots.windows(2).find(|w| w[0].period == w[1].period) {
        return Err(HistoryError::DuplicatePeriod(pair[0].period.to_string()));
    }

    let accumulated: Vec<(Period, RawListing)> = snapshots
        .into_iter()
        .flat_map(|snapshot| {
            let period = snapshot.period;
            snapshot
                .rows
                .into_iter()
                .map(move |row| (period.clone(), row))
        })
        .collect();

    debug!("Accumulated {} raw rows", accumulated.len());

    let normalized = normalize(accumulated, options)?;
    let consolidated = Consolidated::from_history(normalized.listings)?;

    info!(
        "History: {} rows over {} periods, latest {} ({} rows)",
        consolidated.history.len(),
        consolidated.periods().len(),
        consolidated.latest_period,
        consolidated.latest.len()
    );

    Ok((consolidated, normalized.report))
}

/// Maximum period token present, `None` for an empty table
pub fn latest_period(listings: &[Listing]) -> Option<Period> {
    listings.iter().map(|l| &l.period).max().cloned()
}

fn period_slice(listings: &[Listing], period: &Period) -> Vec<Listing> {
    listings
        .iter()
        .filter(|l| &l.period == period)
        .cloned()
        .collect()
}

/// Stable sort: rows sharing (period, id) keep their file order
fn sort_history(history: &mut [Listing]) {
    history.sort_by(|a, b| a.period.cmp(&b.period).then(a.id.cmp(&b.id)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::RoomType;

    fn raw(id: u64) -> RawListing {
        RawListing {
            id,
            name: None,
            host_id: None,
            host_name: None,
            neighbourhood_group: None,
            neighbourhood: "Temple".to_string(),
            latitude: Some(48.86),
            longitude: Some(2.36),
            room_type: RoomType::PrivateRoom,
            price: Some(60.0),
            minimum_nights: None,
            number_of_reviews: Some(1),
            last_review: None,
            reviews_per_month: Some(0.1),
            calculated_host_listings_count: None,
            availability_365: None,
        }
    }

    fn snapshot(period: &str, ids: &[u64]) -> Snapshot {
        Snapshot {
            period: Period::parse(period).unwrap(),
            rows: ids.iter().copied().map(raw).collect(),
        }
    }

    #[test]
    fn test_empty_sources() {
        assert!(matches!(
            consolidate_snapshots(vec![], NormalizeOptions::default()),
            Err(HistoryError::NoSnapshots)
        ));
        assert!(matches!(
            consolidate(&[], NormalizeOptions::default()),
            Err(HistoryError::NoSnapshots)
        ));
    }

    #[test]
    fn test_duplicate_period() {
        let result = consolidate_snapshots(
            vec![snapshot("2019-07", &[1]), snapshot("2019-07", &[2])],
            NormalizeOptions::default(),
        );
        assert!(matches!(result, Err(HistoryError::DuplicatePeriod(p)) if p == "2019-07"));
    }

    #[test]
    fn test_rows_sorted_by_period_then_id() {
        let (consolidated, _) = consolidate_snapshots(
            vec![snapshot("2019-08", &[5, 2]), snapshot("2019-07", &[9, 1])],
            NormalizeOptions::default(),
        )
        .unwrap();

        let keys: Vec<(&str, u64)> = consolidated
            .history
            .iter()
            .map(|l| (l.period.as_str(), l.id))
            .collect();
        assert_eq!(
            keys,
            vec![("2019-07", 1), ("2019-07", 9), ("2019-08", 2), ("2019-08", 5)]
        );
    }

    #[test]
    fn test_period_accessors() {
        let (consolidated, _) = consolidate_snapshots(
            vec![snapshot("2019-06", &[1, 2]), snapshot("2019-07", &[3])],
            NormalizeOptions::default(),
        )
        .unwrap();

        let periods: Vec<String> = consolidated.periods().iter().map(|p| p.to_string()).collect();
        assert_eq!(periods, vec!["2019-06", "2019-07"]);
        assert_eq!(consolidated.period(&Period::parse("2019-06").unwrap()).len(), 2);
    }

    #[test]
    fn test_from_history_empty() {
        assert!(matches!(
            Consolidated::from_history(vec![]),
            Err(HistoryError::NoSnapshots)
        ));
    }
}
