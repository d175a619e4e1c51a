mod layers;
mod manager;
mod positions;
mod spiderfy_types;

pub use self::layers::{GeoJsonLayers, SpiderLayers};
pub use self::manager::{FeatureClickCallback, SpiderfyManager};
pub use self::positions::{calculate_positions, calculate_positions_with};
pub use self::spiderfy_types::{
    coordinate_key, ExpandSummary, MapFeature, PropertyMap, SpiderFeature, SpiderfyConfig,
    SpiderfyError, DEFAULT_BASE_RADIUS_METERS, DEFAULT_LATITUDE,
};
