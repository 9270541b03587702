use serde_json::{json, Value};
use shared_types::{LngLat, Place};

use super::icons::icon_group;

/// Point feature whose id is the place id, so feature-state can address it.
pub fn place_feature(place: &Place) -> Value {
    json!({
        "type": "Feature",
        "id": place.id,
        "geometry": {
            "type": "Point",
            "coordinates": place.coordinates().as_array(),
        },
        "properties": {
            "id": place.id,
            "title": place.title,
            "address": place.display_address(),
            "icon": icon_group(place).map(|group| group.name),
        },
    })
}

pub fn feature_collection(places: &[Place]) -> Value {
    json!({
        "type": "FeatureCollection",
        "features": places.iter().map(place_feature).collect::<Vec<_>>(),
    })
}

/// Single symbol drawn over a cluster while one of its places is hovered.
pub fn overlay_collection(at: LngLat, icon: &str) -> Value {
    json!({
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "geometry": { "type": "Point", "coordinates": at.as_array() },
            "properties": { "icon": icon },
        }],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feature_carries_id_coordinates_and_icon() {
        let place = Place {
            id: 7,
            latitude: 29.1,
            longitude: -82.1,
            title: "Pier".to_string(),
            category: "10321".to_string(),
            ..Default::default()
        };
        let feature = place_feature(&place);
        assert_eq!(feature["id"], 7);
        assert_eq!(feature["geometry"]["coordinates"], json!([-82.1, 29.1]));
        assert_eq!(feature["properties"]["icon"], "Where To Stay");
        assert_eq!(feature["properties"]["title"], "Pier");
    }

    #[test]
    fn place_without_group_has_null_icon() {
        let collection = feature_collection(&[Place::default(), Place::default()]);
        assert_eq!(collection["features"].as_array().map(Vec::len), Some(2));
        assert!(collection["features"][0]["properties"]["icon"].is_null());
    }
}
