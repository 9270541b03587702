//! In-memory `MapSurface` for headless use. The caller decides what is
//! "rendered" with `show_point` and `show_cluster`.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;
use shared_types::{LngLat, Place, PlaceId};

use super::surface::{ClusterHit, FeatureId, MapSurface};
use crate::error::MapError;

#[derive(Debug, Clone, PartialEq)]
pub struct MemoryPopup {
    pub place_id: PlaceId,
    pub at: LngLat,
}

#[derive(Debug, Default)]
pub struct MemorySurface {
    pub sources: BTreeMap<String, Value>,
    pub layers: Vec<String>,
    pub hovered: BTreeSet<(String, FeatureId)>,
    pub camera: Option<(LngLat, f64)>,
    pub popup: Option<MemoryPopup>,
    /// Makes the next `set_source_data` call fail.
    pub reject_set_data: bool,
    /// Count of sources added, for telling a rebuild from an in-place update.
    pub sources_added: usize,
    points: Vec<(PlaceId, LngLat)>,
    clusters: Vec<(PlaceId, LngLat, ClusterHit)>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show_point(&mut self, place: &Place) {
        self.hide(place.id);
        self.points.push((place.id, place.coordinates()));
    }

    /// Renders `place` as part of `cluster`.
    pub fn show_cluster(&mut self, place: &Place, cluster: ClusterHit) {
        self.hide(place.id);
        self.clusters.push((place.id, place.coordinates(), cluster));
    }

    pub fn hide(&mut self, place_id: PlaceId) {
        self.points.retain(|(id, _)| *id != place_id);
        self.clusters.retain(|(id, _, _)| *id != place_id);
    }

    pub fn is_hovered(&self, source: &str, feature: FeatureId) -> bool {
        self.hovered.contains(&(source.to_string(), feature))
    }
}

impl MapSurface for MemorySurface {
    fn has_source(&self, id: &str) -> bool {
        self.sources.contains_key(id)
    }

    fn has_layer(&self, id: &str) -> bool {
        self.layers.iter().any(|layer| layer == id)
    }

    fn add_source(&mut self, id: &str, source: Value) -> Result<(), MapError> {
        if self.has_source(id) {
            return Err(MapError::rejected("addSource", format!("{id} already exists")));
        }
        self.sources.insert(id.to_string(), source);
        self.sources_added += 1;
        Ok(())
    }

    fn set_source_data(&mut self, id: &str, data: Value) -> Result<(), MapError> {
        if std::mem::take(&mut self.reject_set_data) {
            return Err(MapError::rejected("setData", "source is busy"));
        }
        let source = self
            .sources
            .get_mut(id)
            .ok_or_else(|| MapError::SourceMissing(id.to_string()))?;
        source["data"] = data;
        Ok(())
    }

    fn remove_source(&mut self, id: &str) -> Result<(), MapError> {
        self.sources
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| MapError::SourceMissing(id.to_string()))
    }

    fn add_layer(&mut self, layer: Value) -> Result<(), MapError> {
        let id = layer["id"].as_str().unwrap_or_default().to_string();
        let source = layer["source"].as_str().unwrap_or_default();
        if !self.has_source(source) {
            return Err(MapError::SourceMissing(source.to_string()));
        }
        if self.has_layer(&id) {
            return Err(MapError::rejected("addLayer", format!("{id} already exists")));
        }
        self.layers.push(id);
        Ok(())
    }

    fn remove_layer(&mut self, id: &str) -> Result<(), MapError> {
        let before = self.layers.len();
        self.layers.retain(|layer| layer != id);
        if self.layers.len() == before {
            return Err(MapError::rejected("removeLayer", format!("{id} does not exist")));
        }
        Ok(())
    }

    fn set_hovered(
        &mut self,
        source: &str,
        feature: FeatureId,
        hovered: bool,
    ) -> Result<(), MapError> {
        if !self.has_source(source) {
            return Err(MapError::SourceMissing(source.to_string()));
        }
        let key = (source.to_string(), feature);
        if hovered {
            self.hovered.insert(key);
        } else {
            self.hovered.remove(&key);
        }
        Ok(())
    }

    fn unclustered_at(&self, at: LngLat) -> Vec<PlaceId> {
        self.points
            .iter()
            .filter(|(_, point)| *point == at)
            .map(|(id, _)| *id)
            .collect()
    }

    fn cluster_at(&self, at: LngLat) -> Option<ClusterHit> {
        self.clusters
            .iter()
            .find(|(_, point, _)| *point == at)
            .map(|(_, _, hit)| *hit)
    }

    fn ease_to(&mut self, center: LngLat, zoom: f64) {
        self.camera = Some((center, zoom));
    }

    fn open_popup(&mut self, place: &Place) -> Result<(), MapError> {
        self.popup = Some(MemoryPopup {
            place_id: place.id,
            at: place.coordinates(),
        });
        Ok(())
    }

    fn move_popup(&mut self, at: LngLat) {
        if let Some(popup) = self.popup.as_mut() {
            popup.at = at;
        }
    }

    fn close_popup(&mut self) {
        self.popup = None;
    }
}
