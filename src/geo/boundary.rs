//! Neighbourhood boundaries and the metric join.
//!
//! Boundaries come from the catalog's `neighbourhoods.geojson`. Coordinates
//! are projected from WGS84 to World Mercator (EPSG:3395) on load so that
//! maps are not distorted.

use crate::aggregator::DistrictMetricTable;
use crate::reference::{district_for_neighbourhood, District};
use crate::utils::error::GeoError;
use log::{debug, info, warn};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

// WGS84 ellipsoid
const SEMI_MAJOR_AXIS: f64 = 6_378_137.0;
const ECCENTRICITY: f64 = 0.081_819_190_842_622;

/// A projected point in metres
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Closed ring of projected points
pub type Ring = Vec<Point>;

/// Exterior ring followed by holes
pub type Polygon = Vec<Ring>;

/// One neighbourhood outline
#[derive(Debug, Clone, PartialEq)]
pub struct Boundary {
    pub neighbourhood: String,

    /// `None` when the name is not in the reference table
    pub district: Option<District>,

    pub polygons: Vec<Polygon>,
}

/// A boundary with the metric value of its district
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JoinedBoundary<'a> {
    pub boundary: &'a Boundary,
    pub value: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    properties: Properties,
    geometry: Option<Geometry>,
}

#[derive(Debug, Default, Deserialize)]
struct Properties {
    #[serde(default)]
    neighbourhood: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum Geometry {
    Polygon { coordinates: Vec<Vec<Vec<f64>>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Vec<f64>>>> },
}

/// Project WGS84 longitude/latitude (degrees) to World Mercator metres
pub fn project(longitude: f64, latitude: f64) -> Point {
    let lambda = longitude.to_radians();
    let phi = latitude.to_radians();
    let e_sin = ECCENTRICITY * phi.sin();
    let y = ((std::f64::consts::FRAC_PI_4 + phi / 2.0).tan()
        * ((1.0 - e_sin) / (1.0 + e_sin)).powf(ECCENTRICITY / 2.0))
    .ln();
    Point {
        x: SEMI_MAJOR_AXIS * lambda,
        y: SEMI_MAJOR_AXIS * y,
    }
}

/// Read boundaries from a GeoJSON file
///
/// **Public** - main entry point for boundary loading
///
/// # Errors
/// * `GeoError::IoError` - file cannot be opened
/// * `GeoError::JsonError` - not a GeoJSON FeatureCollection
/// * `GeoError::InvalidGeometry` - a coordinate has fewer than two values
pub fn load_boundaries(path: impl AsRef<Path>) -> Result<Vec<Boundary>, GeoError> {
    let path = path.as_ref();
    info!("Loading boundaries from: {}", path.display());

    let file = File::open(path)?;
    let collection: FeatureCollection = serde_json::from_reader(BufReader::new(file))?;
    boundaries_from_collection(collection)
}

/// Parse boundaries from GeoJSON text
pub fn parse_boundaries(geojson: &str) -> Result<Vec<Boundary>, GeoError> {
    let collection: FeatureCollection = serde_json::from_str(geojson)?;
    boundaries_from_collection(collection)
}

fn boundaries_from_collection(collection: FeatureCollection) -> Result<Vec<Boundary>, GeoError> {
    let mut boundaries = Vec::with_capacity(collection.features.len());

    for feature in collection.features {
        let neighbourhood = feature.properties.neighbourhood.unwrap_or_default();
        let Some(geometry) = feature.geometry else {
            debug!("Feature without geometry: {}", neighbourhood);
            continue;
        };

        let polygons = match geometry {
            Geometry::Polygon { coordinates } => vec![project_polygon(&coordinates)?],
            Geometry::MultiPolygon { coordinates } => coordinates
                .iter()
                .map(|polygon| project_polygon(polygon))
                .collect::<Result<Vec<_>, _>>()?,
        };

        let district = district_for_neighbourhood(&neighbourhood);
        if district.is_none() {
            warn!("Boundary '{}' has no district", neighbourhood);
        }

        boundaries.push(Boundary {
            neighbourhood,
            district,
            polygons,
        });
    }

    debug!("Loaded {} boundaries", boundaries.len());
    Ok(boundaries)
}

fn project_polygon(rings: &[Vec<Vec<f64>>]) -> Result<Polygon, GeoError> {
    rings
        .iter()
        .map(|ring| {
            ring.iter()
                .map(|position| match position.as_slice() {
                    [lon, lat, ..] => Ok(project(*lon, *lat)),
                    _ => Err(GeoError::InvalidGeometry(format!(
                        "position needs longitude and latitude, got {:?}",
                        position
                    ))),
                })
                .collect()
        })
        .collect()
}

/// Attach each boundary's district value
///
/// Left join: every boundary is kept, with `None` when its district is
/// unknown or has no value in the table.
pub fn join_metric<'a>(
    boundaries: &'a [Boundary],
    table: &DistrictMetricTable,
) -> Vec<JoinedBoundary<'a>> {
    boundaries
        .iter()
        .map(|boundary| JoinedBoundary {
            boundary,
            value: boundary.district.and_then(|d| table.get(d)),
        })
        .collect()
}
