//! HTTP client for the public listings catalog.
//!
//! The catalog page links one `listings.csv` per city and collection date.
//! Links are selected by city path segment and tagged with the `YYYY-MM`
//! token embedded in their URL.

use crate::ingest::Period;
use crate::utils::config::DEFAULT_HTTP_TIMEOUT;
use crate::utils::error::CatalogError;
use log::{debug, info, warn};
use reqwest::blocking::Client;
use scraper::{Html, Selector};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// One downloadable snapshot
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SnapshotLink {
    pub period: Period,
    pub url: String,
}

/// Blocking client for the catalog page and snapshot files
pub struct CatalogClient {
    client: Client,
    catalog_url: String,
}

impl CatalogClient {
    /// Create a new catalog client
    pub fn new(catalog_url: impl Into<String>) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(CatalogError::RequestFailed)?;

        Ok(Self {
            client,
            catalog_url: catalog_url.into(),
        })
    }

    /// Fetch the catalog page and list the city's snapshots, one per period
    ///
    /// # Errors
    /// * `CatalogError::RequestFailed` / `BadStatus` - page cannot be fetched
    /// * `CatalogError::NoListings` - the page has no link for `city`
    pub fn snapshot_links(&self, city: &str) -> Result<Vec<SnapshotLink>, CatalogError> {
        info!("Fetching catalog page: {}", self.catalog_url);
        let html = self.get_text(&self.catalog_url)?;

        let links = extract_listing_links(&html, city);
        if links.is_empty() {
            return Err(CatalogError::NoListings(city.to_string()));
        }

        info!("Found {} snapshot periods for '{}'", links.len(), city);
        Ok(links)
    }

    /// Download every link into `raw_dir/{period}.csv`
    ///
    /// **Public** - main entry point for snapshot acquisition
    ///
    /// Returns the written paths in period order.
    ///
    /// # Errors
    /// * `CatalogError::IoError` - directory or file cannot be written
    /// * `CatalogError::RequestFailed` / `BadStatus` - a download failed
    pub fn download_snapshots(
        &self,
        links: &[SnapshotLink],
        raw_dir: impl AsRef<Path>,
    ) -> Result<Vec<PathBuf>, CatalogError> {
        let raw_dir = raw_dir.as_ref();
        fs::create_dir_all(raw_dir)?;

        let mut written = Vec::with_capacity(links.len());
        for (i, link) in links.iter().enumerate() {
            info!("Downloading {}/{}: {}", i + 1, links.len(), link.period);
            debug!("Snapshot URL: {}", link.url);

            let body = self.get_text(&link.url)?;
            let path = raw_dir.join(format!("{}.csv", link.period));
            fs::write(&path, body)?;

            debug!("Saved {}", path.display());
            written.push(path);
        }

        Ok(written)
    }

    fn get_text(&self, url: &str) -> Result<String, CatalogError> {
        let response = self.client.get(url).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::BadStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.text()?)
    }
}

/// Pick the city's `listings.csv` links out of the catalog page
///
/// A link is kept when its path contains `/{city}/` and ends with
/// `listings.csv`. When a month was collected more than once, the first
/// link on the page wins. The result is ordered by period.
pub fn extract_listing_links(html: &str, city: &str) -> Vec<SnapshotLink> {
    let document = Html::parse_document(html);
    let Ok(anchor) = Selector::parse("a[href]") else {
        return Vec::new();
    };
    let segment = format!("/{}/", city.trim().to_lowercase());

    let mut by_period: BTreeMap<Period, String> = BTreeMap::new();
    for element in document.select(&anchor) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let href = href.trim();
        if !href.ends_with("listings.csv") || !href.to_lowercase().contains(&segment) {
            continue;
        }

        match Period::from_source_name(href) {
            Ok(period) => {
                if by_period.contains_key(&period) {
                    debug!("Extra link for {} ignored: {}", period, href);
                } else {
                    by_period.insert(period, href.to_string());
                }
            }
            Err(_) => warn!("Listing link without a period token: {}", href),
        }
    }

    by_period
        .into_iter()
        .map(|(period, url)| SnapshotLink { period, url })
        .collect()
}
