//! Per-district metrics over the latest period.
//!
//! Every table carries one row per district, in code order. Degenerate
//! groups (no listings, no housing stock, no prices) yield `None` so that map
//! joins keep full geographic coverage.

use super::group::{group_by, round_to, GroupStats};
use crate::ingest::{Listing, RoomType};
use crate::reference::{District, DistrictReference};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// One district's value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistrictValue {
    pub district: District,
    pub value: Option<f64>,
}

/// A metric keyed by district, ready to join against boundaries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistrictMetricTable {
    /// Column name of the metric
    pub variable: String,

    /// Human-readable title for maps
    pub title: String,

    pub rows: Vec<DistrictValue>,
}

impl DistrictMetricTable {
    fn from_groups(
        variable: &str,
        title: &str,
        groups: &BTreeMap<District, GroupStats>,
        metric: impl Fn(District, &GroupStats) -> Option<f64>,
    ) -> Self {
        let empty = GroupStats::default();
        let rows = District::all()
            .map(|district| DistrictValue {
                district,
                value: metric(district, groups.get(&district).unwrap_or(&empty)),
            })
            .collect();
        Self {
            variable: variable.to_string(),
            title: title.to_string(),
            rows,
        }
    }

    /// Value for one district, `None` if absent or degenerate
    pub fn get(&self, district: District) -> Option<f64> {
        self.rows
            .iter()
            .find(|row| row.district == district)
            .and_then(|row| row.value)
    }

    /// Smallest and largest defined values
    pub fn range(&self) -> Option<(f64, f64)> {
        self.rows
            .iter()
            .filter_map(|row| row.value)
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

/// Listings per 100 accommodations, to one decimal
///
/// `None` when the accommodation count is missing or zero.
pub fn density(listings: usize, accommodations: Option<u32>) -> Option<f64> {
    match accommodations {
        Some(acc) if acc > 0 => Some(round_to(listings as f64 / f64::from(acc) * 100.0, 1)),
        _ => None,
    }
}

/// Reviews per listing, to one decimal; `None` without listings
pub fn reviews_per_listing(reviews: u64, listings: usize) -> Option<f64> {
    if listings == 0 {
        None
    } else {
        Some(round_to(reviews as f64 / listings as f64, 1))
    }
}

/// Share of listings over the district's housing stock
///
/// **Public** - map "Percentage of Listings over Total District Accommodations"
pub fn listing_density(latest: &[Listing], reference: &DistrictReference) -> DistrictMetricTable {
    let groups = group_by(latest, |l| l.district);
    debug!("Listing density over {} districts with listings", groups.len());

    DistrictMetricTable::from_groups(
        "listing_acc_per",
        "Percentage of Listings over Total District Accommodations",
        &groups,
        |district, stats| density(stats.listings, reference.accommodations(district)),
    )
}

/// Average number of reviews per listing
///
/// **Public** - map "Average Number of Reviews per Listing"
pub fn review_intensity(latest: &[Listing]) -> DistrictMetricTable {
    let groups = group_by(latest, |l| l.district);

    DistrictMetricTable::from_groups(
        "reviews_per_listing",
        "Average Number of Reviews per Listing",
        &groups,
        |_, stats| reviews_per_listing(stats.reviews, stats.listings),
    )
}

/// Mean nightly price
///
/// **Public** - map "Average Price per Night"
pub fn average_price(latest: &[Listing]) -> DistrictMetricTable {
    let groups = group_by(latest, |l| l.district);

    DistrictMetricTable::from_groups("price", "Average Price per Night", &groups, |_, stats| {
        stats.mean_price()
    })
}

/// Percentage of each room type within a district
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomTypeShare {
    pub district: District,

    /// Aligned with [`RoomTypeMix::room_types`]; `None` when the type is absent
    pub shares: Vec<Option<f64>>,
}

/// Room-type breakdown for every district that has listings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomTypeMix {
    pub title: String,
    pub room_types: Vec<RoomType>,
    pub rows: Vec<RoomTypeShare>,
}

/// Room-type shares per district, as `round(share, 3) * 100`
///
/// **Public** - chart "Listing Types per District"
pub fn room_type_mix(latest: &[Listing]) -> RoomTypeMix {
    let room_types: Vec<RoomType> = latest
        .iter()
        .map(|l| l.room_type.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let counts = group_by(latest, |l| l.district.map(|d| (d, l.room_type.clone())));
    let totals = group_by(latest, |l| l.district);

    let rows = totals
        .iter()
        .map(|(&district, total)| {
            let shares = room_types
                .iter()
                .map(|room_type| {
                    counts
                        .get(&(district, room_type.clone()))
                        .map(|stats| {
                            round_to(stats.listings as f64 / total.listings as f64, 3) * 100.0
                        })
                })
                .collect();
            RoomTypeShare { district, shares }
        })
        .collect();

    RoomTypeMix {
        title: "Listing Types per District".to_string(),
        room_types,
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_density_guard() {
        assert_eq!(density(100, Some(1000)), Some(10.0));
        assert_eq!(density(1, Some(3)), Some(33.3));
        assert_eq!(density(5, Some(0)), None);
        assert_eq!(density(5, None), None);
    }

    #[test]
    fn test_reviews_per_listing_guard() {
        assert_eq!(reviews_per_listing(50, 4), Some(12.5));
        assert_eq!(reviews_per_listing(0, 0), None);
    }

    #[test]
    fn test_reviews_per_listing_ties_to_even() {
        assert_eq!(reviews_per_listing(5, 4), Some(1.2));
        assert_eq!(reviews_per_listing(1, 4), Some(0.2));
        assert_eq!(reviews_per_listing(7, 4), Some(1.8));
    }

    #[test]
    fn test_range_skips_missing() {
        let table = DistrictMetricTable {
            variable: "v".to_string(),
            title: "t".to_string(),
            rows: vec![
                DistrictValue {
                    district: District::new(1).unwrap(),
                    value: Some(3.0),
                },
                DistrictValue {
                    district: District::new(2).unwrap(),
                    value: None,
                },
                DistrictValue {
                    district: District::new(3).unwrap(),
                    value: Some(-1.0),
                },
            ],
        };
        assert_eq!(table.range(), Some((-1.0, 3.0)));
        assert_eq!(table.get(District::new(2).unwrap()), None);
        assert_eq!(table.get(District::new(1).unwrap()), Some(3.0));
    }
}
