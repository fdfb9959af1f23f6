//! History table persistence.
//!
//! The consolidated history is written with a header row in the column
//! order of [`Listing`]; reading it back yields the same rows.

use super::{ensure_parent, validate_path};
use crate::ingest::Listing;
use crate::utils::error::OutputError;
use log::{debug, info};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Write history rows to a CSV file
///
/// **Public** - persists `data/cleaned-data/listings-hist.csv`
///
/// # Errors
/// * `OutputError::InvalidPath` - Path is empty, a directory, or its parent cannot be created
/// * `OutputError::CsvFailed` - serialization or I/O error from the CSV writer
pub fn write_history(history: &[Listing], output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing {} history rows to: {}", history.len(), output_path.display());

    validate_path(output_path)?;
    ensure_parent(output_path)?;

    let file = File::create(output_path)?;
    let mut writer = ::csv::Writer::from_writer(BufWriter::new(file));
    for listing in history {
        writer.serialize(listing)?;
    }
    writer.flush()?;

    Ok(())
}

/// Read history rows from a CSV file
///
/// # Errors
/// * `OutputError::WriteFailed` - file cannot be opened (I/O errors share this variant)
/// * `OutputError::CsvFailed` - a row does not match the history layout
pub fn read_history(input_path: impl AsRef<Path>) -> Result<Vec<Listing>, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading history from: {}", input_path.display());

    let file = File::open(input_path)?;
    let mut reader = ::csv::Reader::from_reader(BufReader::new(file));
    let history = reader
        .deserialize()
        .collect::<Result<Vec<Listing>, _>>()?;

    debug!("History loaded: {} rows", history.len());
    Ok(history)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::{LastReview, Period, RoomType};
    use crate::reference::District;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn listing(id: u64, last_review: Option<LastReview>, district: Option<u8>) -> Listing {
        Listing {
            id,
            name: "Studio, Marais".to_string(),
            host_id: Some(7),
            host_name: "Unknown".to_string(),
            district: district.and_then(District::new),
            latitude: Some(48.85),
            longitude: Some(2.35),
            room_type: RoomType::EntireHome,
            price: Some(95.5),
            minimum_nights: Some(2),
            number_of_reviews: Some(0),
            last_review,
            reviews_per_month: None,
            calculated_host_listings_count: None,
            availability_365: Some(200),
            period: Period::parse("2019-06").unwrap(),
        }
    }

    #[test]
    fn test_history_survives_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cleaned-data/listings-hist.csv");
        let history = vec![
            listing(1, Some(LastReview::Never), Some(4)),
            listing(
                2,
                Some(LastReview::On(NaiveDate::from_ymd_opt(2019, 5, 30).unwrap())),
                None,
            ),
            listing(3, None, Some(20)),
        ];

        write_history(&history, &path).unwrap();
        let back = read_history(&path).unwrap();

        assert_eq!(back, history);
    }

    #[test]
    fn test_header_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hist.csv");
        write_history(&[listing(1, Some(LastReview::Never), Some(4))], &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let header = text.lines().next().unwrap();
        assert!(header.starts_with("id,name,host_id,host_name,district,"));
        assert!(header.ends_with(",period"));
        assert!(text.contains("Never"));
    }
}
