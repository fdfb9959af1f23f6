//! Group-by accumulation shared by district and period metrics.

use crate::ingest::Listing;
use std::collections::BTreeMap;

/// Running totals for one group of listings
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GroupStats {
    /// Listings in the group
    pub listings: usize,

    /// Sum of `number_of_reviews`, missing counts contribute 0
    pub reviews: u64,

    /// Sum of non-null prices
    pub price_sum: f64,

    /// Listings with a price
    pub priced: usize,
}

impl GroupStats {
    pub fn add(&mut self, listing: &Listing) {
        self.listings += 1;
        self.reviews += u64::from(listing.number_of_reviews.unwrap_or(0));
        if let Some(price) = listing.price {
            self.price_sum += price;
            self.priced += 1;
        }
    }

    /// Mean of the non-null prices, `None` when nothing was priced
    pub fn mean_price(&self) -> Option<f64> {
        if self.priced == 0 {
            None
        } else {
            Some(self.price_sum / self.priced as f64)
        }
    }
}

/// Accumulate listings by key; listings whose key is `None` are skipped
pub fn group_by<'a, K, I, F>(listings: I, key: F) -> BTreeMap<K, GroupStats>
where
    K: Ord,
    I: IntoIterator<Item = &'a Listing>,
    F: Fn(&Listing) -> Option<K>,
{
    let mut groups: BTreeMap<K, GroupStats> = BTreeMap::new();
    for listing in listings {
        if let Some(k) = key(listing) {
            groups.entry(k).or_default().add(listing);
        }
    }
    groups
}

/// Round to `decimals` places, ties to even
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}
