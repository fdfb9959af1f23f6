//! Record types for raw snapshots and the normalized history table.
//!
//! Column names follow the catalog's `listings.csv` header, so both raw
//! snapshots and the persisted history are read with plain serde derives.

use crate::reference::District;
use crate::utils::config::NEVER_REVIEWED;
use crate::utils::error::IngestError;
use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

lazy_static! {
    static ref PERIOD_IN_NAME: Regex = Regex::new(r"20\d{2}-(?:0[1-9]|1[0-2])").unwrap();
    static ref PERIOD_EXACT: Regex = Regex::new(r"^20\d{2}-(?:0[1-9]|1[0-2])$").unwrap();
}

/// A collection period token, `YYYY-MM`
///
/// Ordering is string ordering, which for this fixed-width format is also
/// chronological ordering.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Period(String);

impl Period {
    /// Parse an exact `YYYY-MM` token
    pub fn parse(token: &str) -> Result<Self, IngestError> {
        if PERIOD_EXACT.is_match(token) {
            Ok(Self(token.to_string()))
        } else {
            Err(IngestError::InvalidPeriod(token.to_string()))
        }
    }

    /// Extract the first `YYYY-MM` token embedded in a file name or URL
    pub fn from_source_name(name: &str) -> Result<Self, IngestError> {
        PERIOD_IN_NAME
            .find(name)
            .map(|m| Self(m.as_str().to_string()))
            .ok_or_else(|| IngestError::MissingPeriod(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn year(&self) -> i32 {
        self.0[..4].parse().unwrap_or_default()
    }

    pub fn month(&self) -> u32 {
        self.0[5..].parse().unwrap_or_default()
    }

    /// First day of the period
    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year(), self.month(), 1).unwrap_or_default()
    }

    /// English month name, e.g. "July"
    pub fn month_name(&self) -> String {
        self.first_day().format("%B").to_string()
    }
}

impl TryFrom<String> for Period {
    type Error = IngestError;

    fn try_from(token: String) -> Result<Self, Self::Error> {
        Period::parse(&token)
    }
}

impl From<Period> for String {
    fn from(period: Period) -> Self {
        period.0
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Listing category as published by the catalog
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RoomType {
    EntireHome,
    PrivateRoom,
    SharedRoom,
    HotelRoom,
    Other(String),
}

impl RoomType {
    pub fn label(&self) -> &str {
        match self {
            Self::EntireHome => "Entire home/apt",
            Self::PrivateRoom => "Private room",
            Self::SharedRoom => "Shared room",
            Self::HotelRoom => "Hotel room",
            Self::Other(label) => label,
        }
    }
}

impl std::str::FromStr for RoomType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "entire home/apt" | "entire home" | "entire_home" => Self::EntireHome,
            "private room" | "private_room" => Self::PrivateRoom,
            "shared room" | "shared_room" => Self::SharedRoom,
            "hotel room" | "hotel_room" => Self::HotelRoom,
            _ => Self::Other(s.trim().to_string()),
        })
    }
}

impl From<String> for RoomType {
    fn from(label: String) -> Self {
        match label.parse() {
            Ok(room_type) => room_type,
            Err(never) => match never {},
        }
    }
}

impl From<RoomType> for String {
    fn from(room_type: RoomType) -> Self {
        room_type.label().to_string()
    }
}

impl fmt::Display for RoomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Date of the most recent review, or the "never reviewed" sentinel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LastReview {
    On(NaiveDate),
    Never,
}

impl LastReview {
    fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value == NEVER_REVIEWED {
            return Some(Self::Never);
        }
        NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .ok()
            .map(Self::On)
    }
}

impl fmt::Display for LastReview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::On(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            Self::Never => f.write_str(NEVER_REVIEWED),
        }
    }
}

impl Serialize for LastReview {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for LastReview {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        LastReview::parse(&value)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid last_review: {}", value)))
    }
}

/// One row of a raw catalog snapshot
///
/// Every field except the identifier tolerates a missing column or an
/// empty cell.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawListing {
    pub id: u64,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub host_id: Option<u64>,

    #[serde(default)]
    pub host_name: Option<String>,

    /// Coarse grouping, always empty for this city
    #[serde(default)]
    pub neighbourhood_group: Option<String>,

    #[serde(default)]
    pub neighbourhood: String,

    #[serde(default)]
    pub latitude: Option<f64>,

    #[serde(default)]
    pub longitude: Option<f64>,

    #[serde(default = "default_room_type")]
    pub room_type: RoomType,

    #[serde(default, deserialize_with = "lenient_price")]
    pub price: Option<f64>,

    #[serde(default)]
    pub minimum_nights: Option<u32>,

    #[serde(default)]
    pub number_of_reviews: Option<u32>,

    #[serde(default, deserialize_with = "lenient_last_review")]
    pub last_review: Option<LastReview>,

    #[serde(default)]
    pub reviews_per_month: Option<f64>,

    #[serde(default)]
    pub calculated_host_listings_count: Option<u32>,

    #[serde(default)]
    pub availability_365: Option<u32>,
}

/// One row of the consolidated history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: u64,
    pub name: String,
    pub host_id: Option<u64>,
    pub host_name: String,

    /// `None` flags a neighbourhood that could not be mapped
    pub district: Option<District>,

    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub room_type: RoomType,
    pub price: Option<f64>,
    pub minimum_nights: Option<u32>,
    pub number_of_reviews: Option<u32>,
    pub last_review: Option<LastReview>,
    pub reviews_per_month: Option<f64>,
    pub calculated_host_listings_count: Option<u32>,
    pub availability_365: Option<u32>,
    pub period: Period,
}

/// A raw snapshot tagged with its collection period
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub period: Period,
    pub rows: Vec<RawListing>,
}

fn default_room_type() -> RoomType {
    RoomType::Other(String::new())
}

/// Accept `123`, `123.5` and `$1,234.00`; anything unparseable is null
fn lenient_price<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|value| {
        let cleaned: String = value
            .chars()
            .filter(|c| !matches!(c, '$' | '€' | ',' | ' '))
            .collect();
        cleaned.parse().ok()
    }))
}

/// Unparseable review dates are treated as missing
fn lenient_last_review<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<LastReview>, D::Error> {
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|value| LastReview::parse(&value)))
}
