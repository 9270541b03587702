//! Source and layer definitions as MapLibre style JSON.

use serde_json::{json, Value};

use crate::config::{ClusterSettings, MapPalette};

pub const PLACES_SOURCE: &str = "places";
pub const HOVER_OVERLAY: &str = "hover-overlay";

pub const CLUSTERS_LAYER: &str = "clusters";
pub const CLUSTER_COUNT_LAYER: &str = "cluster-count";
pub const UNCLUSTERED_LAYER: &str = "unclustered-point";
pub const PLACE_ICONS_LAYER: &str = "place-icons";

/// Removal order for a teardown; layers go before the sources they read.
pub const TEARDOWN_LAYERS: [&str; 5] = [
    PLACE_ICONS_LAYER,
    CLUSTERS_LAYER,
    CLUSTER_COUNT_LAYER,
    HOVER_OVERLAY,
    UNCLUSTERED_LAYER,
];
pub const TEARDOWN_SOURCES: [&str; 2] = [PLACES_SOURCE, HOVER_OVERLAY];

pub fn places_source(data: Value, cluster: &ClusterSettings) -> Value {
    json!({
        "type": "geojson",
        "data": data,
        "cluster": true,
        "clusterMaxZoom": cluster.max_zoom,
        "clusterRadius": cluster.radius,
        "clusterMinPoints": cluster.min_points,
    })
}

pub fn overlay_source(data: Value) -> Value {
    json!({ "type": "geojson", "data": data })
}

/// The layers built on the `places` source, in insertion order.
pub fn place_layers(palette: &MapPalette) -> Vec<Value> {
    vec![
        json!({
            "id": CLUSTERS_LAYER,
            "type": "circle",
            "source": PLACES_SOURCE,
            "filter": ["has", "point_count"],
            "paint": {
                "circle-color": [
                    "step", ["get", "point_count"],
                    palette.cluster_small, 100,
                    palette.cluster_medium, 750,
                    palette.cluster_large
                ],
                "circle-radius": ["step", ["get", "point_count"], 20, 100, 30, 750, 40],
            },
        }),
        json!({
            "id": CLUSTER_COUNT_LAYER,
            "type": "symbol",
            "source": PLACES_SOURCE,
            "filter": ["has", "point_count"],
            "layout": {
                "text-field": "{point_count_abbreviated}",
                "text-font": ["Open Sans Semibold"],
                "text-size": 14,
            },
            "paint": { "text-color": "#fff" },
        }),
        json!({
            "id": UNCLUSTERED_LAYER,
            "type": "circle",
            "source": PLACES_SOURCE,
            "filter": ["!", ["has", "point_count"]],
            "paint": {
                "circle-color": [
                    "case",
                    ["boolean", ["feature-state", "hovered"], false],
                    palette.primary,
                    palette.secondary
                ],
                "circle-radius": [
                    "case",
                    ["boolean", ["feature-state", "hovered"], false],
                    20,
                    16
                ],
                "circle-stroke-width": 2,
                "circle-stroke-color": "#fff",
            },
        }),
        json!({
            "id": PLACE_ICONS_LAYER,
            "type": "symbol",
            "source": PLACES_SOURCE,
            "filter": ["!", ["has", "point_count"]],
            "layout": {
                "icon-image": ["get", "icon"],
                "icon-size": 0.6,
                "icon-allow-overlap": true,
            },
        }),
    ]
}

pub fn overlay_layer() -> Value {
    json!({
        "id": HOVER_OVERLAY,
        "type": "symbol",
        "source": HOVER_OVERLAY,
        "layout": {
            "icon-image": ["get", "icon"],
            "icon-size": 1.1,
            "icon-allow-overlap": true,
            "icon-ignore-placement": true,
        },
    })
}
