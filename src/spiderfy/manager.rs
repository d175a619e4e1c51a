use geojson::{Geometry, Value};
use geo_types::Coordinate;
use log::{debug, info};

use super::layers::{self, SpiderLayers};
use super::positions;
use super::spiderfy_types::{
    coordinate_key, ExpandSummary, MapFeature, SpiderFeature, SpiderfyConfig, SpiderfyError,
};

pub type FeatureClickCallback = Box<dyn FnMut(&SpiderFeature)>;

/// Expands one cluster of coincident markers at a time.
///
/// Drive it from a single event loop: `expand`, `collapse` and `handle_click`
/// all mutate the same state and the layers behind it.
pub struct SpiderfyManager<L: SpiderLayers> {
    layers: L,
    config: SpiderfyConfig,
    layers_ready: bool,
    expanded: bool,
    center: Option<Coordinate<f64>>,
    features: Vec<SpiderFeature>,
    on_feature_click: Option<FeatureClickCallback>,
}

impl<L: SpiderLayers> SpiderfyManager<L> {
    pub fn new(layers: L) -> SpiderfyManager<L> {
        SpiderfyManager::with_config(layers, SpiderfyConfig::default())
    }

    pub fn with_config(layers: L, config: SpiderfyConfig) -> SpiderfyManager<L> {
        SpiderfyManager {
            layers,
            config,
            layers_ready: false,
            expanded: false,
            center: None,
            features: Vec::new(),
            on_feature_click: None,
        }
    }

    /// Creates the leg and marker layers unless the surface already has them.
    pub fn initialize_layers(&mut self) {
        if !self.layers.has_layers() {
            debug!("Adding spider layers");
            self.layers.add_layers();
        }
        self.layers_ready = true;
    }

    pub fn on_feature_click<F>(&mut self, callback: F)
    where
        F: FnMut(&SpiderFeature) + 'static,
    {
        self.on_feature_click = Some(Box::new(callback));
    }

    /// Fans `features` out around `center`, replacing any active expansion.
    pub fn expand(
        &mut self,
        center: Coordinate<f64>,
        features: &[MapFeature],
    ) -> Result<ExpandSummary, SpiderfyError> {
        if !self.layers_ready {
            return Err(SpiderfyError::LayersNotInitialized);
        }

        self.collapse();

        let shown = features.len().min(self.config.max_features);
        let dropped = features.len() - shown;
        if dropped > 0 {
            info!(
                "Spiderfy at {} shows {} of {} features",
                coordinate_key(&center),
                shown,
                features.len()
            );
        }

        if shown == 0 {
            return Ok(ExpandSummary { shown, dropped });
        }

        let spider_positions = positions::calculate_positions_with(shown, center, &self.config);
        self.features = features
            .iter()
            .zip(spider_positions)
            .map(|(feature, spider_coords)| SpiderFeature {
                properties: feature.properties.clone(),
                original_coords: center,
                spider_coords,
            })
            .collect();

        self.layers
            .update_legs(layers::collection(layers::leg_features(&self.features)));
        self.layers
            .update_markers(layers::collection(layers::marker_features(&self.features)));

        self.expanded = true;
        self.center = Some(center);

        Ok(ExpandSummary { shown, dropped })
    }

    pub fn collapse(&mut self) {
        if !self.expanded {
            return;
        }

        self.features.clear();
        self.center = None;
        self.expanded = false;

        self.layers.update_legs(layers::collection(Vec::new()));
        self.layers.update_markers(layers::collection(Vec::new()));
    }

    pub fn is_at_center(&self, coords: Coordinate<f64>) -> bool {
        self.is_at_center_within(coords, self.config.center_tolerance)
    }

    /// Per-axis comparison against the expansion center. Not a distance check.
    pub fn is_at_center_within(&self, coords: Coordinate<f64>, tolerance: f64) -> bool {
        match self.center {
            Some(center) if self.expanded => {
                (coords.x - center.x).abs() < tolerance && (coords.y - center.y).abs() < tolerance
            }
            _ => false,
        }
    }

    /// Resolves a click on the marker layer and hands the feature to the callback.
    ///
    /// Returns `true` when a spider feature was found for the clicked point.
    pub fn handle_click(&mut self, geometry: &Geometry) -> bool {
        let clicked = match &geometry.value {
            Value::Point(position) if position.len() >= 2 => Coordinate {
                x: position[0],
                y: position[1],
            },
            _ => return false,
        };
        self.handle_click_at(clicked)
    }

    pub fn handle_click_at(&mut self, clicked: Coordinate<f64>) -> bool {
        let key = coordinate_key(&clicked);
        let feature = match self
            .features
            .iter()
            .find(|f| coordinate_key(&f.spider_coords) == key)
        {
            Some(f) => f,
            None => return false,
        };

        if let Some(callback) = self.on_feature_click.as_mut() {
            callback(feature);
        }
        true
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn center(&self) -> Option<Coordinate<f64>> {
        self.center
    }

    pub fn features(&self) -> &[SpiderFeature] {
        &self.features
    }

    pub fn feature_count(&self) -> usize {
        self.features.len()
    }

    pub fn config(&self) -> &SpiderfyConfig {
        &self.config
    }

    pub fn layers(&self) -> &L {
        &self.layers
    }
}
