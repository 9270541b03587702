use leptos::prelude::*;
use leptos::server;
use shared_types::{CategoryNode, DefaultLocation, LocationDetails, Place, PlaceId, Region, RegionId};

#[cfg(feature = "ssr")]
use crate::upstream;

#[server]
pub async fn get_default_location() -> Result<DefaultLocation, ServerFnError> {
    match upstream::default_location().await {
        Ok(location) => Ok(location),
        Err(e) => Err(ServerFnError::new(format!(
            "Failed to fetch default location: {}",
            e
        ))),
    }
}

#[server]
pub async fn search_places(
    latitude: f64,
    longitude: f64,
    region_id: Option<RegionId>,
    search_text: Option<String>,
    page_size: u32,
) -> Result<Vec<Place>, ServerFnError> {
    let query = upstream::PlaceQuery {
        latitude,
        longitude,
        region_id,
        search_text,
        page_size,
    };
    match upstream::places(query).await {
        Ok(places) => {
            tracing::debug!(count = places.len(), "places fetched");
            Ok(places)
        }
        Err(e) => Err(ServerFnError::new(format!("Failed to fetch places: {}", e))),
    }
}

#[server]
pub async fn get_categories() -> Result<Vec<CategoryNode>, ServerFnError> {
    upstream::categories()
        .await
        .map_err(|e| ServerFnError::new(format!("Failed to fetch categories: {}", e)))
}

#[server]
pub async fn get_regions() -> Result<Vec<Region>, ServerFnError> {
    upstream::regions()
        .await
        .map_err(|e| ServerFnError::new(format!("Failed to fetch regions: {}", e)))
}

#[server]
pub async fn get_location_details(id: PlaceId) -> Result<Option<LocationDetails>, ServerFnError> {
    upstream::location_details(id)
        .await
        .map_err(|e| ServerFnError::new(format!("Failed to fetch location {}: {}", id, e)))
}
