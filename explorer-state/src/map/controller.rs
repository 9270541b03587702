//! Keeps a map surface in step with the store: clustered place layers,
//! popup of the selected place, hover highlight.

use shared_types::{LngLat, Place, PlaceId};

use super::geojson::{feature_collection, overlay_collection};
use super::icons::icon_group;
use super::layers::{
    overlay_layer, overlay_source, place_layers, places_source, HOVER_OVERLAY, PLACES_SOURCE,
    TEARDOWN_LAYERS, TEARDOWN_SOURCES,
};
use super::surface::{ClusterHit, FeatureId, MapSurface};
use crate::config::MapSettings;
use crate::error::MapError;
use crate::interaction::SelectionOrigin;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerSync {
    /// Source data replaced in place.
    Updated,
    /// Layers and sources recreated.
    Rebuilt,
    /// Nothing to show; everything removed.
    Cleared,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupState {
    Hidden,
    Opened,
    Moved,
}

/// Pending request to enumerate a cluster's leaves for a hovered place.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterLookup {
    pub token: u64,
    pub place_id: PlaceId,
    pub cluster: ClusterHit,
    pub icon: Option<&'static str>,
}

#[derive(Debug)]
pub struct MapController<S> {
    surface: S,
    settings: MapSettings,
    popup: Option<PlaceId>,
    hovered_feature: Option<PlaceId>,
    hovered_cluster: Option<FeatureId>,
    hover_token: u64,
}

impl<S: MapSurface> MapController<S> {
    pub fn new(surface: S, settings: MapSettings) -> Self {
        Self {
            surface,
            settings,
            popup: None,
            hovered_feature: None,
            hovered_cluster: None,
            hover_token: 0,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn settings(&self) -> &MapSettings {
        &self.settings
    }

    pub fn popup_place(&self) -> Option<PlaceId> {
        self.popup
    }

    /// Pushes the visible places to the map.
    pub fn sync_places(&mut self, places: &[Place]) -> Result<LayerSync, MapError> {
        if places.is_empty() {
            self.close_popup();
            self.forget_hover();
            self.teardown();
            return Ok(LayerSync::Cleared);
        }

        let data = feature_collection(places);
        if self.surface.has_source(PLACES_SOURCE) {
            // Cluster ids are regenerated with the data. The caller re-applies
            // the hover afterwards.
            self.clear_hover_marks();
            self.hover_token += 1;
            match self.surface.set_source_data(PLACES_SOURCE, data.clone()) {
                Ok(()) => return Ok(LayerSync::Updated),
                Err(e) => tracing::warn!(error = %e, "replacing place data failed, rebuilding layers"),
            }
        }

        self.forget_hover();
        self.teardown();
        self.surface
            .add_source(PLACES_SOURCE, places_source(data, &self.settings.cluster))?;
        for layer in place_layers(&self.settings.palette) {
            self.surface.add_layer(layer)?;
        }
        tracing::debug!(count = places.len(), "place layers rebuilt");
        Ok(LayerSync::Rebuilt)
    }

    fn teardown(&mut self) {
        for layer in TEARDOWN_LAYERS {
            if self.surface.has_layer(layer) {
                log_failure("removeLayer", self.surface.remove_layer(layer));
            }
        }
        for source in TEARDOWN_SOURCES {
            if self.surface.has_source(source) {
                log_failure("removeSource", self.surface.remove_source(source));
            }
        }
    }

    /// Reacts to a selection change. Selections made on the map leave the
    /// camera alone; any other origin eases to the place.
    pub fn apply_selection(&mut self, selected: Option<(&Place, SelectionOrigin)>) -> PopupState {
        let place = selected.map(|(place, _)| place);
        if self.popup.is_some() && self.popup != place.map(|p| p.id) {
            self.close_popup();
        }

        if let Some((place, origin)) = selected {
            if origin.moves_camera() {
                self.surface
                    .ease_to(place.coordinates(), self.settings.fly_to_zoom);
            }
        }

        self.reconcile_popup(place)
    }

    /// Shows the popup exactly when the selected place is drawn as an
    /// individual point. Safe to call on every render.
    pub fn reconcile_popup(&mut self, selected: Option<&Place>) -> PopupState {
        let Some(place) = selected else {
            self.close_popup();
            return PopupState::Hidden;
        };

        let at = place.coordinates();
        if !self.surface.unclustered_at(at).contains(&place.id) {
            self.close_popup();
            return PopupState::Hidden;
        }

        if self.popup == Some(place.id) {
            self.surface.move_popup(at);
            return PopupState::Moved;
        }

        self.close_popup();
        match self.surface.open_popup(place) {
            Ok(()) => {
                self.popup = Some(place.id);
                PopupState::Opened
            }
            Err(e) => {
                tracing::warn!(place_id = place.id, error = %e, "could not open popup");
                PopupState::Hidden
            }
        }
    }

    fn close_popup(&mut self) {
        if self.popup.take().is_some() {
            self.surface.close_popup();
        }
    }

    /// Moves the highlight to `hovered`. When the place is hidden inside a
    /// cluster the caller must enumerate that cluster and hand the leaves to
    /// [`MapController::resolve_cluster_hover`].
    pub fn apply_hover(&mut self, hovered: Option<&Place>) -> Option<ClusterLookup> {
        self.clear_hover_marks();
        self.hover_token += 1;

        let place = hovered?;
        if !self.surface.has_source(PLACES_SOURCE) {
            return None;
        }

        let at = place.coordinates();
        if self.surface.unclustered_at(at).contains(&place.id) {
            self.mark(place.id);
            return None;
        }

        let cluster = self.surface.cluster_at(at)?;
        Some(ClusterLookup {
            token: self.hover_token,
            place_id: place.id,
            cluster,
            icon: icon_group(place).map(|group| group.name),
        })
    }

    /// Finishes a cluster hover once the leaves are known. Lookups made
    /// before the latest hover change are ignored.
    pub fn resolve_cluster_hover(&mut self, lookup: &ClusterLookup, leaves: &[PlaceId]) -> bool {
        if lookup.token != self.hover_token {
            tracing::debug!(place_id = lookup.place_id, "ignoring outdated cluster lookup");
            return false;
        }
        if !leaves.contains(&lookup.place_id) {
            return false;
        }

        self.mark(lookup.place_id);
        let cluster = lookup.cluster;
        log_failure(
            "setFeatureState",
            self.surface
                .set_hovered(PLACES_SOURCE, cluster.cluster_id, true),
        );
        self.hovered_cluster = Some(cluster.cluster_id);

        match lookup.icon {
            Some(icon) if cluster.point_count < self.settings.overlay_max_cluster_size => {
                self.draw_overlay(cluster.center, icon)
            }
            _ => self.remove_overlay(),
        }
        true
    }

    /// Eases into a clicked cluster.
    pub fn expand_cluster(&mut self, center: LngLat, zoom: f64) {
        self.surface.ease_to(center, zoom);
    }

    fn mark(&mut self, place_id: PlaceId) {
        match self.surface.set_hovered(PLACES_SOURCE, place_id, true) {
            Ok(()) => self.hovered_feature = Some(place_id),
            Err(e) => tracing::warn!(place_id, error = %e, "could not highlight place"),
        }
    }

    fn clear_hover_marks(&mut self) {
        if let Some(id) = self.hovered_feature.take() {
            log_failure(
                "setFeatureState",
                self.surface.set_hovered(PLACES_SOURCE, id, false),
            );
        }
        if let Some(id) = self.hovered_cluster.take() {
            log_failure(
                "setFeatureState",
                self.surface.set_hovered(PLACES_SOURCE, id, false),
            );
        }
        self.remove_overlay();
    }

    /// Drops hover bookkeeping without touching the surface, for when the
    /// source it pointed into is about to disappear.
    fn forget_hover(&mut self) {
        self.hovered_feature = None;
        self.hovered_cluster = None;
        self.hover_token += 1;
    }

    fn draw_overlay(&mut self, at: LngLat, icon: &str) {
        let data = overlay_collection(at, icon);
        let result = if self.surface.has_source(HOVER_OVERLAY) {
            self.surface.set_source_data(HOVER_OVERLAY, data)
        } else {
            self.surface
                .add_source(HOVER_OVERLAY, overlay_source(data))
                .and_then(|()| self.surface.add_layer(overlay_layer()))
        };
        log_failure("hover overlay", result);
    }

    fn remove_overlay(&mut self) {
        if self.surface.has_layer(HOVER_OVERLAY) {
            log_failure("removeLayer", self.surface.remove_layer(HOVER_OVERLAY));
        }
        if self.surface.has_source(HOVER_OVERLAY) {
            log_failure("removeSource", self.surface.remove_source(HOVER_OVERLAY));
        }
    }
}

fn log_failure(operation: &str, result: Result<(), MapError>) {
    if let Err(e) = result {
        tracing::warn!(operation, error = %e, "map operation failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::layers::{CLUSTERS_LAYER, UNCLUSTERED_LAYER};
    use crate::map::memory::MemorySurface;
    use pretty_assertions::assert_eq;

    fn place(id: PlaceId, lng: f64, category: &str) -> Place {
        Place {
            id,
            longitude: lng,
            latitude: 29.0,
            category: category.to_string(),
            ..Default::default()
        }
    }

    fn controller() -> MapController<MemorySurface> {
        MapController::new(MemorySurface::new(), MapSettings::default())
    }

    fn cluster(point_count: u32) -> ClusterHit {
        ClusterHit {
            cluster_id: 9001,
            point_count,
            center: LngLat::new(-80.0, 30.0),
        }
    }

    #[test]
    fn first_sync_builds_layers_then_updates_in_place() {
        let mut map = controller();
        let places = vec![place(1, -82.0, ""), place(2, -82.1, "")];

        assert_eq!(map.sync_places(&places).unwrap(), LayerSync::Rebuilt);
        assert!(map.surface().has_layer(CLUSTERS_LAYER));
        assert!(map.surface().has_layer(UNCLUSTERED_LAYER));

        assert_eq!(map.sync_places(&places[..1]).unwrap(), LayerSync::Updated);
        assert_eq!(map.surface().sources_added, 1);
        let data = &map.surface().sources[PLACES_SOURCE]["data"]["features"];
        assert_eq!(data.as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn failed_update_falls_back_to_rebuild() {
        let mut map = controller();
        let places = vec![place(1, -82.0, "")];
        map.sync_places(&places).unwrap();
        map.surface_mut().reject_set_data = true;

        assert_eq!(map.sync_places(&places).unwrap(), LayerSync::Rebuilt);
        assert_eq!(map.surface().sources_added, 2);
        assert_eq!(map.surface().layers.len(), 4);
    }

    #[test]
    fn empty_list_tears_everything_down() {
        let mut map = controller();
        let pier = place(1, -82.0, "");
        map.sync_places(std::slice::from_ref(&pier)).unwrap();
        map.surface_mut().show_point(&pier);
        map.apply_selection(Some((&pier, SelectionOrigin::Map)));
        assert_eq!(map.popup_place(), Some(1));

        assert_eq!(map.sync_places(&[]).unwrap(), LayerSync::Cleared);
        assert!(map.surface().layers.is_empty());
        assert!(map.surface().sources.is_empty());
        assert_eq!(map.surface().popup, None);
        assert_eq!(map.popup_place(), None);
    }

    #[test]
    fn map_selection_keeps_camera_sidebar_selection_moves_it() {
        let mut map = controller();
        let pier = place(1, -82.0, "");
        map.sync_places(std::slice::from_ref(&pier)).unwrap();

        map.apply_selection(Some((&pier, SelectionOrigin::Map)));
        assert_eq!(map.surface().camera, None);

        map.apply_selection(Some((&pier, SelectionOrigin::Sidebar)));
        assert_eq!(map.surface().camera, Some((pier.coordinates(), 15.0)));
    }

    #[test]
    fn popup_follows_unclustered_visibility() {
        let mut map = controller();
        let pier = place(1, -82.0, "");
        map.sync_places(std::slice::from_ref(&pier)).unwrap();

        assert_eq!(map.reconcile_popup(Some(&pier)), PopupState::Hidden);

        map.surface_mut().show_point(&pier);
        assert_eq!(map.reconcile_popup(Some(&pier)), PopupState::Opened);
        assert_eq!(map.reconcile_popup(Some(&pier)), PopupState::Moved);

        map.surface_mut().show_cluster(&pier, cluster(12));
        assert_eq!(map.reconcile_popup(Some(&pier)), PopupState::Hidden);
        assert_eq!(map.surface().popup, None);

        map.surface_mut().show_point(&pier);
        assert_eq!(map.reconcile_popup(Some(&pier)), PopupState::Opened);
        assert_eq!(map.reconcile_popup(None), PopupState::Hidden);
        assert_eq!(map.surface().popup, None);
    }

    #[test]
    fn selecting_another_place_moves_the_popup_over() {
        let mut map = controller();
        let a = place(1, -82.0, "");
        let b = place(2, -82.5, "");
        map.sync_places(&[a.clone(), b.clone()]).unwrap();
        map.surface_mut().show_point(&a);
        map.surface_mut().show_point(&b);

        map.apply_selection(Some((&a, SelectionOrigin::Map)));
        map.apply_selection(Some((&b, SelectionOrigin::Map)));
        assert_eq!(map.surface().popup.as_ref().map(|p| p.place_id), Some(2));
    }

    #[test]
    fn hover_clears_previous_highlight_first() {
        let mut map = controller();
        let a = place(1, -82.0, "");
        let b = place(2, -82.5, "");
        map.sync_places(&[a.clone(), b.clone()]).unwrap();
        map.surface_mut().show_point(&a);
        map.surface_mut().show_point(&b);

        assert_eq!(map.apply_hover(Some(&a)), None);
        assert!(map.surface().is_hovered(PLACES_SOURCE, 1));

        map.apply_hover(Some(&b));
        assert!(!map.surface().is_hovered(PLACES_SOURCE, 1));
        assert!(map.surface().is_hovered(PLACES_SOURCE, 2));

        map.apply_hover(None);
        assert!(map.surface().hovered.is_empty());
    }

    #[test]
    fn clustered_hover_draws_overlay_for_small_clusters() {
        let mut map = controller();
        let inn = place(3, -81.0, "10321");
        map.sync_places(std::slice::from_ref(&inn)).unwrap();
        map.surface_mut().show_cluster(&inn, cluster(12));

        let lookup = map.apply_hover(Some(&inn)).unwrap();
        assert_eq!(lookup.icon, Some("Where To Stay"));
        assert!(map.resolve_cluster_hover(&lookup, &[4, 3]));

        assert!(map.surface().is_hovered(PLACES_SOURCE, 3));
        assert!(map.surface().is_hovered(PLACES_SOURCE, 9001));
        assert!(map.surface().has_layer(HOVER_OVERLAY));
        let overlay = &map.surface().sources[HOVER_OVERLAY]["data"]["features"][0];
        assert_eq!(overlay["geometry"]["coordinates"][0], -80.0);

        map.apply_hover(None);
        assert!(!map.surface().has_layer(HOVER_OVERLAY));
        assert!(!map.surface().has_source(HOVER_OVERLAY));
        assert!(map.surface().hovered.is_empty());
    }

    #[test]
    fn data_update_drops_cluster_hover() {
        let mut map = controller();
        let inn = place(3, -81.0, "10321");
        let pier = place(1, -82.0, "");
        map.sync_places(&[inn.clone(), pier]).unwrap();
        map.surface_mut().show_cluster(&inn, cluster(12));

        let lookup = map.apply_hover(Some(&inn)).unwrap();
        assert!(map.resolve_cluster_hover(&lookup, &[3]));
        assert!(map.surface().has_layer(HOVER_OVERLAY));

        assert_eq!(map.sync_places(std::slice::from_ref(&inn)).unwrap(), LayerSync::Updated);
        assert!(!map.surface().has_layer(HOVER_OVERLAY));
        assert!(map.surface().hovered.is_empty());
        assert!(!map.resolve_cluster_hover(&lookup, &[3]));

        let lookup = map.apply_hover(Some(&inn)).unwrap();
        assert!(map.resolve_cluster_hover(&lookup, &[3]));
        assert!(map.surface().has_layer(HOVER_OVERLAY));
    }

    #[test]
    fn large_clusters_and_iconless_places_get_no_overlay() {
        let mut map = controller();
        let inn = place(3, -81.0, "10321");
        let plain = place(4, -81.5, "1");
        map.sync_places(&[inn.clone(), plain.clone()]).unwrap();
        map.surface_mut().show_cluster(&inn, cluster(100));
        map.surface_mut().show_cluster(&plain, cluster(5));

        let lookup = map.apply_hover(Some(&inn)).unwrap();
        assert!(map.resolve_cluster_hover(&lookup, &[3]));
        assert!(!map.surface().has_layer(HOVER_OVERLAY));

        let lookup = map.apply_hover(Some(&plain)).unwrap();
        assert!(map.resolve_cluster_hover(&lookup, &[4]));
        assert!(!map.surface().has_layer(HOVER_OVERLAY));
    }

    #[test]
    fn outdated_cluster_lookup_is_ignored() {
        let mut map = controller();
        let inn = place(3, -81.0, "10321");
        let pier = place(1, -82.0, "");
        map.sync_places(&[inn.clone(), pier.clone()]).unwrap();
        map.surface_mut().show_cluster(&inn, cluster(12));
        map.surface_mut().show_point(&pier);

        let stale = map.apply_hover(Some(&inn)).unwrap();
        map.apply_hover(Some(&pier));
        assert!(!map.resolve_cluster_hover(&stale, &[3]));

        assert!(!map.surface().is_hovered(PLACES_SOURCE, 3));
        assert!(map.surface().is_hovered(PLACES_SOURCE, 1));
        assert!(!map.surface().has_layer(HOVER_OVERLAY));
    }

    #[test]
    fn place_missing_from_leaves_is_not_marked() {
        let mut map = controller();
        let inn = place(3, -81.0, "10321");
        map.sync_places(std::slice::from_ref(&inn)).unwrap();
        map.surface_mut().show_cluster(&inn, cluster(12));

        let lookup = map.apply_hover(Some(&inn)).unwrap();
        assert!(!map.resolve_cluster_hover(&lookup, &[8, 9]));
        assert!(map.surface().hovered.is_empty());
    }

    #[test]
    fn cluster_click_eases_to_expansion_zoom() {
        let mut map = controller();
        map.expand_cluster(LngLat::new(-80.0, 30.0), 12.0);
        assert_eq!(map.surface().camera, Some((LngLat::new(-80.0, 30.0), 12.0)));
    }
}
