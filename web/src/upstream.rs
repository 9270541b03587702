//! Thin client for the upstream content API. Every endpoint is a `PUT` with a
//! JSON body and answers with a `{ "Data": ... }` envelope.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use shared_types::{
    ApiEnvelope, CategoryNode, DefaultLocation, ListPayload, LocationDetails, Place, PlaceId,
    Region, RegionId,
};
use thiserror::Error;

use crate::config::{api_config, ApiConfig, ConfigError};

const DEFAULT_LOCATION: &str = "content/v4/getDefaultLocation";
const LOCATIONS: &str = "content/v4/getlocations";
const LOCATION_DETAILS: &str = "content/v4/getlocationdata";
const REGIONS: &str = "content/v4/getcustomerregions";
const CATEGORIES: &str = "content/v4/getmastercategorygrouplocationsummary";

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("response had no data")]
    Empty,
}

pub struct PlaceQuery {
    pub latitude: f64,
    pub longitude: f64,
    pub region_id: Option<RegionId>,
    pub search_text: Option<String>,
    pub page_size: u32,
}

async fn put<B, T>(
    config: &ApiConfig,
    path: &str,
    query: &[(&str, String)],
    body: &B,
) -> Result<Option<T>, UpstreamError>
where
    B: Serialize + ?Sized,
    T: DeserializeOwned,
{
    let url = config.endpoint(path);
    tracing::debug!(%url, "upstream request");

    let mut request = reqwest::Client::new().put(&url).query(query).json(body);
    if let Some(key) = &config.api_key {
        request = request.header("AuthKey", key);
    }

    let envelope: ApiEnvelope<T> = request.send().await?.error_for_status()?.json().await?;
    Ok(envelope.data)
}

pub async fn default_location() -> Result<DefaultLocation, UpstreamError> {
    let config = api_config()?;
    let query = [
        ("appName", config.app_name.clone()),
        ("customerid", config.customer_id.to_string()),
    ];
    put(config, DEFAULT_LOCATION, &query, &json!({}))
        .await?
        .ok_or(UpstreamError::Empty)
}

pub async fn places(query: PlaceQuery) -> Result<Vec<Place>, UpstreamError> {
    let config = api_config()?;
    let body = json!({
        "CustomerId": config.customer_id,
        "LanguageCode": config.language_code,
        "CategoryId": "0",
        "Latitude": query.latitude,
        "Longitude": query.longitude,
        "SearchText": query.search_text.unwrap_or_default(),
        "PageNumber": 0,
        "Base64": false,
        "SortBy": "distance",
        "SortDir": "asc",
        "TagId": "",
        "PageSize": query.page_size,
        "RegionId": query.region_id.unwrap_or(0),
        "GroupCategoryIds": "",
        "CategoryType": null,
        "CheckwithDefault": true,
    });
    let payload: Option<ListPayload<Place>> = put(config, LOCATIONS, &[], &body).await?;
    Ok(payload.map(|p| p.list).unwrap_or_default())
}

pub async fn categories() -> Result<Vec<CategoryNode>, UpstreamError> {
    let config = api_config()?;
    let body = json!({ "LanguageId": 1, "FilterType": 1 });
    let nodes: Option<Vec<CategoryNode>> = put(config, CATEGORIES, &[], &body).await?;
    Ok(nodes.unwrap_or_default())
}

pub async fn regions() -> Result<Vec<Region>, UpstreamError> {
    let config = api_config()?;
    let body = json!({
        "CustomerId": config.customer_id,
        "PageNumber": 1,
        "PageSize": 50,
        "SectionId": 0,
        "LanguageId": 1,
    });
    let payload: Option<ListPayload<Region>> = put(config, REGIONS, &[], &body).await?;
    Ok(payload.map(|p| p.list).unwrap_or_default())
}

pub async fn location_details(id: PlaceId) -> Result<Option<LocationDetails>, UpstreamError> {
    let config = api_config()?;
    let body = json!({
        "locationid": id,
        "customerId": config.customer_id,
        "languageId": 0,
        "sectionId": 0,
        "userUniqueId": 0,
    });
    put(config, LOCATION_DETAILS, &[], &body).await
}
