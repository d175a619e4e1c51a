use std::convert::TryInto;

use failure::Fail;
use geojson::Error as GeoJsonError;
use geo_types::Coordinate;
use log::debug;
use serde::Deserialize;

/// Display attributes carried by a map feature. Never inspected here.
pub type PropertyMap = serde_json::Map<String, serde_json::Value>;

/// Metres spanned by one degree of longitude at the equator.
const METERS_PER_DEGREE: f64 = 111_320.0;

pub const DEFAULT_BASE_RADIUS_METERS: f64 = 25.0;
/// Latitude the default radius is scaled for (Dublin).
pub const DEFAULT_LATITUDE: f64 = 53.35;

#[derive(Debug, Fail)]
pub enum SpiderfyError {
    #[fail(display = "Spider layers used before initialize_layers")]
    LayersNotInitialized,
    #[fail(display = "Geometry not found")]
    GeometryNotFound,
    #[fail(display = "Invalid feature: expected a point geometry")]
    InvalidFeature,
    #[fail(display = "Invalid point: {}", _0)]
    InvalidPoint(GeoJsonError),
}

/// A point on the map as supplied by the caller.
#[derive(Clone, Debug, PartialEq)]
pub struct MapFeature {
    pub properties: PropertyMap,
    /// `x` is longitude, `y` is latitude.
    pub coordinates: Coordinate<f64>,
}

impl MapFeature {
    pub fn new(coordinates: Coordinate<f64>, properties: PropertyMap) -> MapFeature {
        MapFeature { properties, coordinates }
    }

    pub fn from_geojson(feature: geojson::Feature) -> Result<MapFeature, SpiderfyError> {
        let geometry = feature
            .geometry
            .ok_or(SpiderfyError::GeometryNotFound)?;

        let point: geo_types::Point<f64> = match geometry.value {
            geojson::Value::Point(_) => geometry
                .value
                .try_into()
                .map_err(SpiderfyError::InvalidPoint)?,
            _ => {
                debug!("Rejecting non-point feature {:?}", feature.id);
                return Err(SpiderfyError::InvalidFeature);
            }
        };

        Ok(MapFeature {
            properties: feature.properties.unwrap_or_default(),
            coordinates: point.0,
        })
    }
}

/// A feature fanned out around a shared cluster center.
#[derive(Clone, Debug, PartialEq)]
pub struct SpiderFeature {
    pub properties: PropertyMap,
    pub original_coords: Coordinate<f64>,
    pub spider_coords: Coordinate<f64>,
}

/// What an expansion actually displayed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExpandSummary {
    pub shown: usize,
    /// Features beyond `max_features`, silently left out of the layout.
    pub dropped: usize,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SpiderfyConfig {
    /// First ring radius, in coordinate units.
    pub base_radius: f64,
    /// Largest count laid out on one circle. Also the capacity of each spiral ring.
    pub circle_threshold: usize,
    /// Ring radius increment as a fraction of `base_radius`.
    pub ring_growth: f64,
    pub max_features: usize,
    pub center_tolerance: f64,
}

impl SpiderfyConfig {
    /// Converts a ground distance into longitude degrees at `latitude`.
    pub fn base_radius_for(meters: f64, latitude: f64) -> f64 {
        meters / (METERS_PER_DEGREE * latitude.to_radians().cos())
    }
}

impl Default for SpiderfyConfig {
    fn default() -> SpiderfyConfig {
        SpiderfyConfig {
            base_radius: SpiderfyConfig::base_radius_for(
                DEFAULT_BASE_RADIUS_METERS,
                DEFAULT_LATITUDE,
            ),
            circle_threshold: 8,
            ring_growth: 0.8,
            max_features: 20,
            center_tolerance: 1e-6,
        }
    }
}

/// Fixed six-decimal key used to compare coordinates that went through rendering.
#[inline]
pub fn coordinate_key(coords: &Coordinate<f64>) -> String {
    format!("{:.6},{:.6}", coords.x, coords.y)
}
