//! Client-side tuning knobs. Every field has a default so a partial JSON
//! document (or none at all) yields a working configuration.

use serde::{Deserialize, Serialize};

use crate::error::ExplorerError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    /// Places requested per search.
    pub page_size: u32,
    /// Categories and regions older than this are refetched.
    pub cache_max_age_secs: i64,
    /// Animation frames the sidebar waits for a card to mount before giving up.
    pub scroll_max_attempts: u32,
    /// Facility labels shown on a sidebar card before collapsing the rest.
    pub facility_preview: usize,
    /// Chips shown per group in the active filter summary.
    pub filter_preview: usize,
    pub map: MapSettings,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            page_size: 50,
            cache_max_age_secs: 5 * 60,
            scroll_max_attempts: 8,
            facility_preview: 3,
            filter_preview: 3,
            map: MapSettings::default(),
        }
    }
}

impl ExplorerConfig {
    pub fn from_json(raw: &str) -> Result<Self, ExplorerError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn cache_max_age(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.cache_max_age_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapSettings {
    pub style_url: String,
    pub initial_zoom: f64,
    /// Zoom used when the camera eases to a place selected outside the map.
    pub fly_to_zoom: f64,
    /// Clusters with at least this many points never get a hover overlay.
    pub overlay_max_cluster_size: u32,
    pub cluster: ClusterSettings,
    pub palette: MapPalette,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            style_url: "https://demotiles.maplibre.org/style.json".to_string(),
            initial_zoom: 13.0,
            fly_to_zoom: 15.0,
            overlay_max_cluster_size: 100,
            cluster: ClusterSettings::default(),
            palette: MapPalette::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterSettings {
    pub max_zoom: u32,
    pub radius: u32,
    pub min_points: u32,
}

impl Default for ClusterSettings {
    fn default() -> Self {
        Self {
            max_zoom: 14,
            radius: 50,
            min_points: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapPalette {
    pub primary: String,
    pub secondary: String,
    pub cluster_small: String,
    pub cluster_medium: String,
    pub cluster_large: String,
}

impl Default for MapPalette {
    fn default() -> Self {
        Self {
            primary: "#e8772e".to_string(),
            secondary: "#006094".to_string(),
            cluster_small: "#0078B8".to_string(),
            cluster_medium: "#f1f075".to_string(),
            cluster_large: "#f28cb1".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = ExplorerConfig::from_json(r#"{"page_size": 25, "map": {"fly_to_zoom": 16.5}}"#)
            .unwrap();
        assert_eq!(config.page_size, 25);
        assert_eq!(config.map.fly_to_zoom, 16.5);
        assert_eq!(config.map.cluster, ClusterSettings::default());
        assert_eq!(config.cache_max_age(), chrono::Duration::minutes(5));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            ExplorerConfig::from_json("{page_size:"),
            Err(ExplorerError::Json(_))
        ));
    }
}
