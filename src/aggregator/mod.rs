//! Aggregation of listings into mappable and chartable metrics.
//!
//! This module transforms normalized listings into:
//! - Per-district metrics for the latest period (density, reviews, price, room types)
//! - Per-period series over the full history

pub mod district;
pub mod group;
pub mod temporal;

// Re-export main types and functions
pub use district::{
    average_price, density, listing_density, review_intensity, reviews_per_listing,
    room_type_mix, DistrictMetricTable, DistrictValue, RoomTypeMix, RoomTypeShare,
};
pub use group::{group_by, round_to, GroupStats};
pub use temporal::{
    listings_per_period, mean_price_per_period, reviews_per_period, PeriodSeriesTable,
    PeriodValue, Split,
};
