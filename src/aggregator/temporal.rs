//! Per-period series over the whole history, optionally split by room type.

use super::group::{group_by, GroupStats};
use crate::ingest::{Listing, Period, RoomType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Whether a series is split by room type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Split {
    Total,
    ByRoomType,
}

/// One point of a period series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodValue {
    pub period: Period,

    /// Set only for split series
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub room_type: Option<RoomType>,

    pub value: Option<f64>,
}

/// A metric keyed by period (and room type), ordered by period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodSeriesTable {
    pub variable: String,
    pub title: String,
    pub split: Split,
    pub rows: Vec<PeriodValue>,
}

impl PeriodSeriesTable {
    fn build(
        variable: &str,
        title: &str,
        history: &[Listing],
        split: Split,
        metric: impl Fn(&GroupStats) -> Option<f64>,
    ) -> Self {
        let groups: BTreeMap<(Period, Option<RoomType>), GroupStats> = group_by(history, |l| {
            let room_type = match split {
                Split::Total => None,
                Split::ByRoomType => Some(l.room_type.clone()),
            };
            Some((l.period.clone(), room_type))
        });

        let rows = groups
            .into_iter()
            .map(|((period, room_type), stats)| PeriodValue {
                period,
                room_type,
                value: metric(&stats),
            })
            .collect();

        Self {
            variable: variable.to_string(),
            title: title.to_string(),
            split,
            rows,
        }
    }

    /// Rows grouped into one series per room type (a single `None` key when unsplit)
    pub fn series(&self) -> BTreeMap<Option<RoomType>, Vec<(Period, Option<f64>)>> {
        let mut series: BTreeMap<Option<RoomType>, Vec<(Period, Option<f64>)>> = BTreeMap::new();
        for row in &self.rows {
            series
                .entry(row.room_type.clone())
                .or_default()
                .push((row.period.clone(), row.value));
        }
        series
    }

    /// Value for a period (unsplit tables)
    pub fn get(&self, period: &Period) -> Option<f64> {
        self.rows
            .iter()
            .find(|row| &row.period == period && row.room_type.is_none())
            .and_then(|row| row.value)
    }
}

/// Number of listings collected per period
///
/// **Public** - charts "Evolution of the Number of Listings" (and per type)
pub fn listings_per_period(history: &[Listing], split: Split) -> PeriodSeriesTable {
    let title = match split {
        Split::Total => "Evolution of the Number of Listings",
        Split::ByRoomType => "Evolution of the Number of Listings per Type",
    };
    PeriodSeriesTable::build("number_of_listings", title, history, split, |stats| {
        Some(stats.listings as f64)
    })
}

/// Total reviews across all listings per period
///
/// **Public** - chart "Evolution of the Number of Reviews"
pub fn reviews_per_period(history: &[Listing], split: Split) -> PeriodSeriesTable {
    let title = match split {
        Split::Total => "Evolution of the Number of Reviews",
        Split::ByRoomType => "Evolution of the Number of Reviews per Type",
    };
    PeriodSeriesTable::build("number_of_reviews", title, history, split, |stats| {
        Some(stats.reviews as f64)
    })
}

/// Mean nightly price per period
///
/// **Public** - charts "Evolution of the Average Price per Night" (and per type)
pub fn mean_price_per_period(history: &[Listing], split: Split) -> PeriodSeriesTable {
    let title = match split {
        Split::Total => "Evolution of the Average Price per Night",
        Split::ByRoomType => "Evolution of the Average Price per Night per Listing Type",
    };
    PeriodSeriesTable::build("price", title, history, split, GroupStats::mean_price)
}
