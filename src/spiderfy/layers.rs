use geojson::{Feature, FeatureCollection, Geometry, Value};
use geo_types::Coordinate;

use super::spiderfy_types::{PropertyMap, SpiderFeature};

/// The rendering surface the spider layout is drawn on.
///
/// Implementations own the two sources (legs and markers). The manager only
/// pushes whole collections; it never reads them back.
pub trait SpiderLayers {
    fn has_layers(&self) -> bool;
    fn add_layers(&mut self);
    fn update_legs(&mut self, legs: FeatureCollection);
    fn update_markers(&mut self, markers: FeatureCollection);
}

/// Keeps the last pushed collections in memory.
#[derive(Debug, Default)]
pub struct GeoJsonLayers {
    legs: Option<FeatureCollection>,
    markers: Option<FeatureCollection>,
}

impl GeoJsonLayers {
    pub fn new() -> GeoJsonLayers {
        GeoJsonLayers::default()
    }

    pub fn legs(&self) -> Option<&FeatureCollection> {
        self.legs.as_ref()
    }

    pub fn markers(&self) -> Option<&FeatureCollection> {
        self.markers.as_ref()
    }

    /// Legs followed by markers, as one collection.
    pub fn to_feature_collection(&self) -> FeatureCollection {
        let features = self
            .legs
            .iter()
            .chain(self.markers.iter())
            .flat_map(|c| c.features.iter().cloned())
            .collect();
        collection(features)
    }
}

impl SpiderLayers for GeoJsonLayers {
    fn has_layers(&self) -> bool {
        self.legs.is_some() && self.markers.is_some()
    }

    fn add_layers(&mut self) {
        if self.legs.is_none() {
            self.legs = Some(collection(Vec::new()));
        }
        if self.markers.is_none() {
            self.markers = Some(collection(Vec::new()));
        }
    }

    fn update_legs(&mut self, legs: FeatureCollection) {
        self.legs = Some(legs);
    }

    fn update_markers(&mut self, markers: FeatureCollection) {
        self.markers = Some(markers);
    }
}

pub fn collection(features: Vec<Feature>) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

#[inline]
fn position(coords: &Coordinate<f64>) -> Vec<f64> {
    vec![coords.x, coords.y]
}

fn feature(value: Value, properties: PropertyMap) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(value)),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

/// One line per spider feature, from the shared center to its fanned-out spot.
pub fn leg_features(features: &[SpiderFeature]) -> Vec<Feature> {
    features
        .iter()
        .map(|f| {
            let line = Value::LineString(vec![
                position(&f.original_coords),
                position(&f.spider_coords),
            ]);
            feature(line, PropertyMap::new())
        })
        .collect()
}

/// One point per spider feature, carrying its properties for styling.
pub fn marker_features(features: &[SpiderFeature]) -> Vec<Feature> {
    features
        .iter()
        .map(|f| feature(Value::Point(position(&f.spider_coords)), f.properties.clone()))
        .collect()
}
