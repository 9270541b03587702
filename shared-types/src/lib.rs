use serde::{Deserialize, Deserializer, Serialize};

pub type PlaceId = i64;
pub type CategoryId = i64;
pub type RegionId = i64;

/// Upstream payloads sometimes carry `null` where a string or list is expected.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
pub struct LngLat {
    pub lng: f64,
    pub lat: f64,
}

impl LngLat {
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    pub fn as_array(&self) -> [f64; 2] {
        [self.lng, self.lat]
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "PascalCase")]
pub struct Activity {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub first_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub profile: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub comment: String,
    #[serde(default)]
    pub created_date: i64,
    #[serde(rename = "PhotoURL", default, deserialize_with = "null_as_default")]
    pub photo_url: String,
    #[serde(default)]
    pub like_count: u32,
    #[serde(default)]
    pub comment_count: u32,
}

impl Activity {
    pub fn author(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "PascalCase")]
pub struct Place {
    pub id: PlaceId,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub address: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub city: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub state: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub country: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub zip_code: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub phone: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default)]
    pub thumb: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub web_site: Option<String>,
    #[serde(default)]
    pub distance: Option<String>,
    #[serde(default)]
    pub avg_rating: f64,
    /// Comma separated category ids, e.g. `"10359,10212"`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub regions: Vec<RegionId>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub activities: Vec<Activity>,
}

impl Place {
    /// Parses the comma separated category field, skipping pieces that are not integers.
    pub fn category_ids(&self) -> Vec<CategoryId> {
        self.category
            .split(',')
            .filter_map(|piece| piece.trim().parse::<CategoryId>().ok())
            .collect()
    }

    pub fn first_category_id(&self) -> Option<CategoryId> {
        self.category
            .split(',')
            .next()
            .and_then(|piece| piece.trim().parse::<CategoryId>().ok())
    }

    pub fn coordinates(&self) -> LngLat {
        LngLat::new(self.longitude, self.latitude)
    }

    /// Lower-cased text that free-text search runs against.
    pub fn search_haystack(&self) -> String {
        [
            &self.title,
            &self.address,
            &self.city,
            &self.state,
            &self.zip_code,
            &self.country,
        ]
        .iter()
        .filter(|part| !part.is_empty())
        .map(|part| part.as_str())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
    }

    pub fn display_address(&self) -> String {
        [&self.address, &self.city, &self.state, &self.zip_code]
            .iter()
            .filter(|part| !part.is_empty())
            .map(|part| part.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "PascalCase")]
pub struct Region {
    pub id: RegionId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub total_breweries: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct CategoryNode {
    #[serde(rename = "CategoryId")]
    pub id: CategoryId,
    #[serde(rename = "CategoryName", default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "Icon", default)]
    pub icon: Option<String>,
    #[serde(rename = "CategorySVGIcon", default)]
    pub svg_icon: Option<String>,
    #[serde(rename = "Categories", default, deserialize_with = "null_as_default")]
    pub children: Vec<CategoryNode>,
}

impl CategoryNode {
    pub fn leaf(id: CategoryId, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn branch(id: CategoryId, name: &str, children: Vec<CategoryNode>) -> Self {
        Self {
            id,
            name: name.to_string(),
            children,
            ..Default::default()
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct DefaultLocation {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub radius: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Amenity {
    #[serde(rename = "Id")]
    pub id: i64,
    #[serde(rename = "AmenitieName", default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "AmenitieIcon", default)]
    pub icon: Option<String>,
    #[serde(rename = "AmenitieSVGIcon", default)]
    pub svg_icon: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "PascalCase")]
pub struct LocationDetails {
    pub id: PlaceId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub address: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub city: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub state: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub zip_code: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub phone: String,
    #[serde(default)]
    pub web_site: Option<String>,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub amenities: Vec<Amenity>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub activities: Vec<Activity>,
}

impl LocationDetails {
    pub fn display_address(&self) -> String {
        [&self.address, &self.city, &self.state, &self.zip_code]
            .iter()
            .filter(|part| !part.is_empty())
            .map(|part| part.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// `{ "Data": ... }` wrapper used by every upstream endpoint.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ApiEnvelope<T> {
    #[serde(rename = "Data")]
    pub data: Option<T>,
}

/// `{ "List": [...] }` payload used by the list endpoints.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ListPayload<T> {
    #[serde(rename = "List", default = "Vec::new")]
    pub list: Vec<T>,
}
