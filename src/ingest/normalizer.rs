//! Snapshot normalization.
//!
//! Turns accumulated raw rows into history rows:
//! - the coarse `neighbourhood_group` column is dropped
//! - `neighbourhood` is replaced by its district code
//! - never-reviewed listings get `reviews_per_month = 0` and `last_review = Never`
//! - missing listing and host names get a placeholder
//!
//! Row count is preserved. Unmapped neighbourhoods leave `district` empty and
//! are tallied in the [`NormalizeReport`].

use super::schema::{LastReview, Listing, Period, RawListing};
use crate::reference::district_for_neighbourhood;
use crate::utils::config::UNKNOWN_PLACEHOLDER;
use crate::utils::error::HistoryError;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Normalization policy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Fail instead of flagging rows whose neighbourhood has no district
    pub strict_districts: bool,
}

/// Data-quality findings from one normalization pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizeReport {
    /// Rows processed
    pub rows: usize,

    /// Unmapped neighbourhood name -> number of rows
    pub unmapped: BTreeMap<String, usize>,

    /// Rows that received the never-reviewed fill
    pub never_reviewed: usize,
}

impl NormalizeReport {
    /// Number of rows left without a district
    pub fn unmapped_rows(&self) -> usize {
        self.unmapped.values().sum()
    }

    pub fn is_clean(&self) -> bool {
        self.unmapped.is_empty()
    }
}

/// Normalized rows plus the report describing them
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedSnapshot {
    pub listings: Vec<Listing>,
    pub report: NormalizeReport,
}

/// Normalize period-tagged raw rows
///
/// **Public** - main entry point for normalization
///
/// # Errors
/// * `HistoryError::UnmappedNeighbourhoods` - only with `strict_districts`
pub fn normalize(
    rows: Vec<(Period, RawListing)>,
    options: NormalizeOptions,
) -> Result<NormalizedSnapshot, HistoryError> {
    debug!("Normalizing {} rows", rows.len());

    let mut report = NormalizeReport {
        rows: rows.len(),
        ..Default::default()
    };

    let listings: Vec<Listing> = rows
        .into_iter()
        .map(|(period, raw)| normalize_row(period, raw, &mut report))
        .collect();

    if !report.is_clean() {
        let names = describe_unmapped(&report.unmapped);
        if options.strict_districts {
            return Err(HistoryError::UnmappedNeighbourhoods {
                count: report.unmapped_rows(),
                names,
            });
        }
        warn!(
            "{} rows have no district and are excluded from district metrics: {}",
            report.unmapped_rows(),
            names
        );
    }

    debug!(
        "Normalized {} rows ({} never reviewed)",
        report.rows, report.never_reviewed
    );

    Ok(NormalizedSnapshot { listings, report })
}

/// Normalize a single row
///
/// **Private** - internal helper for normalize
fn normalize_row(period: Period, raw: RawListing, report: &mut NormalizeReport) -> Listing {
    let district = district_for_neighbourhood(&raw.neighbourhood);
    if district.is_none() {
        *report
            .unmapped
            .entry(raw.neighbourhood.trim().to_string())
            .or_insert(0) += 1;
    }

    let (reviews_per_month, last_review) = if raw.number_of_reviews == Some(0) {
        report.never_reviewed += 1;
        (
            raw.reviews_per_month.or(Some(0.0)),
            raw.last_review.or(Some(LastReview::Never)),
        )
    } else {
        (raw.reviews_per_month, raw.last_review)
    };

    Listing {
        id: raw.id,
        name: or_placeholder(raw.name),
        host_id: raw.host_id,
        host_name: or_placeholder(raw.host_name),
        district,
        latitude: raw.latitude,
        longitude: raw.longitude,
        room_type: raw.room_type,
        price: raw.price,
        minimum_nights: raw.minimum_nights,
        number_of_reviews: raw.number_of_reviews,
        last_review,
        reviews_per_month,
        calculated_host_listings_count: raw.calculated_host_listings_count,
        availability_365: raw.availability_365,
        period,
    }
}

fn or_placeholder(value: Option<String>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => UNKNOWN_PLACEHOLDER.to_string(),
    }
}

fn describe_unmapped(unmapped: &BTreeMap<String, usize>) -> String {
    unmapped
        .iter()
        .map(|(name, count)| {
            if name.is_empty() {
                format!("<empty> ({})", count)
            } else {
                format!("{} ({})", name, count)
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}
