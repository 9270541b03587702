use serde_json::Value;
use shared_types::{LngLat, Place, PlaceId};

use crate::error::MapError;

/// Feature ids share one namespace: place ids for points, generated ids for
/// clusters.
pub type FeatureId = i64;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterHit {
    pub cluster_id: FeatureId,
    pub point_count: u32,
    pub center: LngLat,
}

/// What the controller needs from a mapping library.
pub trait MapSurface {
    fn has_source(&self, id: &str) -> bool;
    fn has_layer(&self, id: &str) -> bool;
    fn add_source(&mut self, id: &str, source: Value) -> Result<(), MapError>;
    /// Replaces the data of an existing GeoJSON source.
    fn set_source_data(&mut self, id: &str, data: Value) -> Result<(), MapError>;
    fn remove_source(&mut self, id: &str) -> Result<(), MapError>;
    fn add_layer(&mut self, layer: Value) -> Result<(), MapError>;
    fn remove_layer(&mut self, id: &str) -> Result<(), MapError>;

    fn set_hovered(&mut self, source: &str, feature: FeatureId, hovered: bool)
        -> Result<(), MapError>;

    /// Places drawn as individual points at the screen position of `at`.
    fn unclustered_at(&self, at: LngLat) -> Vec<PlaceId>;
    /// Cluster drawn at the screen position of `at`, if any.
    fn cluster_at(&self, at: LngLat) -> Option<ClusterHit>;

    fn ease_to(&mut self, center: LngLat, zoom: f64);

    fn open_popup(&mut self, place: &Place) -> Result<(), MapError>;
    fn move_popup(&mut self, at: LngLat);
    fn close_popup(&mut self);
}
