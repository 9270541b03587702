//! MapLibre GL bindings (loaded from the CDN in the shell) and the
//! `MapSurface` implementation over them.

use std::rc::Rc;

use explorer_state::map::layers::{CLUSTERS_LAYER, PLACES_SOURCE, UNCLUSTERED_LAYER};
use explorer_state::map::{ClusterHit, MapSurface, ICON_GROUPS, PLACEHOLDER_IMAGE_URL};
use explorer_state::MapError;
use serde::Deserialize;
use serde_json::{json, Value};
use shared_types::{LngLat, Place, PlaceId};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = maplibregl)]
    #[derive(Clone)]
    pub type Map;

    #[wasm_bindgen(constructor, catch, js_namespace = maplibregl)]
    pub fn new(options: &JsValue) -> Result<Map, JsValue>;

    #[wasm_bindgen(method, js_name = getSource)]
    fn get_source(this: &Map, id: &str) -> JsValue;

    #[wasm_bindgen(method, js_name = getLayer)]
    fn get_layer(this: &Map, id: &str) -> JsValue;

    #[wasm_bindgen(method, catch, js_name = addSource)]
    fn add_source(this: &Map, id: &str, source: &JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = removeSource)]
    fn remove_source(this: &Map, id: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = addLayer)]
    fn add_layer(this: &Map, layer: &JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = removeLayer)]
    fn remove_layer(this: &Map, id: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = setFeatureState)]
    fn set_feature_state(this: &Map, feature: &JsValue, state: &JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(method, js_name = queryRenderedFeatures)]
    fn query_rendered_features(this: &Map, point: &JsValue, options: &JsValue) -> js_sys::Array;

    #[wasm_bindgen(method)]
    fn project(this: &Map, lng_lat: &JsValue) -> JsValue;

    #[wasm_bindgen(method, js_name = easeTo)]
    fn ease_to(this: &Map, options: &JsValue);

    #[wasm_bindgen(method)]
    pub fn on(this: &Map, event: &str, handler: &js_sys::Function);

    #[wasm_bindgen(method, js_name = on)]
    pub fn on_layer(this: &Map, event: &str, layer: &str, handler: &js_sys::Function);

    #[wasm_bindgen(method, js_name = hasImage)]
    fn has_image(this: &Map, id: &str) -> bool;

    #[wasm_bindgen(method, catch, js_name = addImage)]
    fn add_image(this: &Map, id: &str, image: &JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(method, js_name = getCanvas)]
    fn get_canvas(this: &Map) -> web_sys::HtmlElement;

    #[wasm_bindgen(method)]
    pub fn remove(this: &Map);

    #[wasm_bindgen(js_namespace = maplibregl)]
    #[derive(Clone)]
    pub type GeoJSONSource;

    #[wasm_bindgen(method, catch, js_name = setData)]
    fn set_data(this: &GeoJSONSource, data: &JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(method, js_name = getClusterLeaves)]
    fn get_cluster_leaves(
        this: &GeoJSONSource,
        cluster_id: f64,
        limit: f64,
        offset: f64,
    ) -> js_sys::Promise;

    #[wasm_bindgen(method, js_name = getClusterExpansionZoom)]
    fn get_cluster_expansion_zoom(this: &GeoJSONSource, cluster_id: f64) -> js_sys::Promise;

    #[wasm_bindgen(js_namespace = maplibregl)]
    type Popup;

    #[wasm_bindgen(constructor, js_namespace = maplibregl)]
    fn new(options: &JsValue) -> Popup;

    #[wasm_bindgen(method, js_name = setLngLat)]
    fn set_lng_lat(this: &Popup, lng_lat: &JsValue) -> Popup;

    #[wasm_bindgen(method, js_name = setDOMContent)]
    fn set_dom_content(this: &Popup, content: &web_sys::Element) -> Popup;

    #[wasm_bindgen(method, js_name = addTo)]
    fn add_to(this: &Popup, map: &Map) -> Popup;

    #[wasm_bindgen(method, js_name = remove)]
    fn remove_popup(this: &Popup);
}

/// A rendered feature as returned by `queryRenderedFeatures` once passed
/// through `JSON.stringify`.
#[derive(Debug, Deserialize)]
pub struct RenderedFeature {
    #[serde(default)]
    pub id: Option<f64>,
    #[serde(default)]
    pub properties: Value,
    #[serde(default)]
    pub geometry: Value,
}

impl RenderedFeature {
    pub fn place_id(&self) -> Option<PlaceId> {
        self.id
            .or_else(|| self.properties["id"].as_f64())
            .map(|id| id as PlaceId)
    }

    pub fn cluster(&self) -> Option<ClusterHit> {
        let cluster_id = self.properties["cluster_id"].as_f64()?;
        let coordinates = &self.geometry["coordinates"];
        Some(ClusterHit {
            cluster_id: cluster_id as i64,
            point_count: self.properties["point_count"].as_u64().unwrap_or(0) as u32,
            center: LngLat::new(
                coordinates[0].as_f64().unwrap_or_default(),
                coordinates[1].as_f64().unwrap_or_default(),
            ),
        })
    }

    pub fn parse(feature: &JsValue) -> Option<Self> {
        let raw = js_sys::JSON::stringify(feature).ok()?.as_string()?;
        serde_json::from_str(&raw).ok()
    }
}

fn to_js(value: &Value) -> Result<JsValue, MapError> {
    let raw = serde_json::to_string(value).map_err(|e| MapError::rejected("encode", e.to_string()))?;
    js_sys::JSON::parse(&raw).map_err(|e| MapError::rejected("encode", describe(&e)))
}

fn js_or_undefined(value: Value) -> JsValue {
    to_js(&value).unwrap_or(JsValue::UNDEFINED)
}

fn describe(error: &JsValue) -> String {
    error
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| error.as_string())
        .unwrap_or_else(|| format!("{:?}", error))
}

fn lng_lat(at: LngLat) -> JsValue {
    js_or_undefined(json!(at.as_array()))
}

/// Creates a map inside `container`, centred on `center`.
pub fn create_map(
    container: &web_sys::HtmlElement,
    style_url: &str,
    center: LngLat,
    zoom: f64,
) -> Result<Map, MapError> {
    let options = to_js(&json!({
        "style": style_url,
        "center": center.as_array(),
        "zoom": zoom,
    }))?;
    js_sys::Reflect::set(&options, &JsValue::from_str("container"), container)
        .map_err(|e| MapError::rejected("Map", describe(&e)))?;
    Map::new(&options).map_err(|e| MapError::rejected("Map", describe(&e)))
}

/// Registers one image per icon group under the group's name.
pub fn register_icons(map: &Map) {
    for group in ICON_GROUPS {
        let Ok(image) = web_sys::HtmlImageElement::new() else {
            continue;
        };
        let map = map.clone();
        let name = group.name;
        let loaded = image.clone();
        let on_load = Closure::once_into_js(move || {
            if !map.has_image(name) {
                if let Err(e) = map.add_image(name, &loaded) {
                    leptos::logging::warn!("Failed to register icon {}: {}", name, describe(&e));
                }
            }
        });
        image.set_onload(Some(on_load.unchecked_ref()));
        image.set_src(group.icon_url);
    }
}

pub fn set_cursor(map: &Map, cursor: &str) {
    let _ = map.get_canvas().style().set_property("cursor", cursor);
}

pub async fn cluster_leaves(source: GeoJSONSource, cluster_id: i64) -> Result<Vec<PlaceId>, MapError> {
    let promise = source.get_cluster_leaves(cluster_id as f64, f64::INFINITY, 0.0);
    let leaves = JsFuture::from(promise)
        .await
        .map_err(|e| MapError::rejected("getClusterLeaves", describe(&e)))?;
    Ok(js_sys::Array::from(&leaves)
        .iter()
        .filter_map(|leaf| RenderedFeature::parse(&leaf))
        .filter_map(|leaf| leaf.place_id())
        .collect())
}

pub async fn expansion_zoom(source: GeoJSONSource, cluster_id: i64) -> Result<f64, MapError> {
    let promise = source.get_cluster_expansion_zoom(cluster_id as f64);
    JsFuture::from(promise)
        .await
        .map_err(|e| MapError::rejected("getClusterExpansionZoom", describe(&e)))?
        .as_f64()
        .ok_or_else(|| MapError::rejected("getClusterExpansionZoom", "not a number"))
}

struct OpenPopup {
    popup: Popup,
    _on_close: Closure<dyn FnMut()>,
}

pub struct MaplibreSurface {
    map: Map,
    popup: Option<OpenPopup>,
    on_popup_close: Rc<dyn Fn()>,
}

impl MaplibreSurface {
    pub fn new(map: Map, on_popup_close: impl Fn() + 'static) -> Self {
        Self {
            map,
            popup: None,
            on_popup_close: Rc::new(on_popup_close),
        }
    }

    pub fn map(&self) -> &Map {
        &self.map
    }

    pub fn places_source(&self) -> Option<GeoJSONSource> {
        let source = self.map.get_source(PLACES_SOURCE);
        (!source.is_undefined() && !source.is_null()).then(|| source.unchecked_into())
    }

    fn query(&self, layer: &str, at: LngLat) -> Vec<RenderedFeature> {
        if !self.has_layer(layer) {
            return Vec::new();
        }
        let point = self.map.project(&lng_lat(at));
        let options = js_or_undefined(json!({ "layers": [layer] }));
        self.map
            .query_rendered_features(&point, &options)
            .iter()
            .filter_map(|feature| RenderedFeature::parse(&feature))
            .collect()
    }

    fn popup_content(&self, place: &Place) -> Result<(web_sys::Element, Closure<dyn FnMut()>), JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let root = document.create_element("div")?;
        root.set_class_name("map-popup");

        let image = document.create_element("img")?;
        image.set_class_name("map-popup-image");
        let src = place
            .thumb
            .as_deref()
            .or(place.image.as_deref())
            .unwrap_or(PLACEHOLDER_IMAGE_URL);
        image.set_attribute("src", src)?;
        image.set_attribute("alt", &place.title)?;
        root.append_child(&image)?;

        let close = document.create_element("button")?;
        close.set_class_name("map-popup-close");
        close.set_attribute("aria-label", "Close")?;
        close.set_text_content(Some("×"));
        let on_close = self.close_handler();
        close
            .unchecked_ref::<web_sys::HtmlElement>()
            .set_onclick(Some(on_close.as_ref().unchecked_ref()));
        root.append_child(&close)?;

        let title = document.create_element("h3")?;
        title.set_text_content(Some(&place.title));
        root.append_child(&title)?;

        let address = document.create_element("p")?;
        address.set_text_content(Some(&place.display_address()));
        root.append_child(&address)?;

        let link = document.create_element("a")?;
        link.set_attribute("href", &format!("/places/{}", place.id))?;
        link.set_text_content(Some("View details"));
        root.append_child(&link)?;

        Ok((root, on_close))
    }

    fn close_handler(&self) -> Closure<dyn FnMut()> {
        let on_close = Rc::clone(&self.on_popup_close);
        Closure::wrap(Box::new(move || on_close()) as Box<dyn FnMut()>)
    }
}

impl Drop for MaplibreSurface {
    fn drop(&mut self) {
        self.close_popup();
        self.map.remove();
    }
}

impl MapSurface for MaplibreSurface {
    fn has_source(&self, id: &str) -> bool {
        let source = self.map.get_source(id);
        !source.is_undefined() && !source.is_null()
    }

    fn has_layer(&self, id: &str) -> bool {
        let layer = self.map.get_layer(id);
        !layer.is_undefined() && !layer.is_null()
    }

    fn add_source(&mut self, id: &str, source: Value) -> Result<(), MapError> {
        self.map
            .add_source(id, &to_js(&source)?)
            .map_err(|e| MapError::rejected("addSource", describe(&e)))
    }

    fn set_source_data(&mut self, id: &str, data: Value) -> Result<(), MapError> {
        let source = self.map.get_source(id);
        if source.is_undefined() || source.is_null() {
            return Err(MapError::SourceMissing(id.to_string()));
        }
        source
            .unchecked_into::<GeoJSONSource>()
            .set_data(&to_js(&data)?)
            .map_err(|e| MapError::rejected("setData", describe(&e)))
    }

    fn remove_source(&mut self, id: &str) -> Result<(), MapError> {
        self.map
            .remove_source(id)
            .map_err(|e| MapError::rejected("removeSource", describe(&e)))
    }

    fn add_layer(&mut self, layer: Value) -> Result<(), MapError> {
        self.map
            .add_layer(&to_js(&layer)?)
            .map_err(|e| MapError::rejected("addLayer", describe(&e)))
    }

    fn remove_layer(&mut self, id: &str) -> Result<(), MapError> {
        self.map
            .remove_layer(id)
            .map_err(|e| MapError::rejected("removeLayer", describe(&e)))
    }

    fn set_hovered(&mut self, source: &str, feature: i64, hovered: bool) -> Result<(), MapError> {
        let target = to_js(&json!({ "source": source, "id": feature }))?;
        let state = to_js(&json!({ "hovered": hovered }))?;
        self.map
            .set_feature_state(&target, &state)
            .map_err(|e| MapError::rejected("setFeatureState", describe(&e)))
    }

    fn unclustered_at(&self, at: LngLat) -> Vec<PlaceId> {
        self.query(UNCLUSTERED_LAYER, at)
            .iter()
            .filter_map(RenderedFeature::place_id)
            .collect()
    }

    fn cluster_at(&self, at: LngLat) -> Option<ClusterHit> {
        self.query(CLUSTERS_LAYER, at)
            .iter()
            .find_map(RenderedFeature::cluster)
    }

    fn ease_to(&mut self, center: LngLat, zoom: f64) {
        self.map
            .ease_to(&js_or_undefined(json!({ "center": center.as_array(), "zoom": zoom })));
    }

    fn open_popup(&mut self, place: &Place) -> Result<(), MapError> {
        self.close_popup();
        let (content, on_close) = self
            .popup_content(place)
            .map_err(|e| MapError::rejected("Popup", describe(&e)))?;
        let popup = Popup::new(&js_or_undefined(json!({ "offset": 25, "closeButton": false })))
            .set_lng_lat(&lng_lat(place.coordinates()))
            .set_dom_content(&content)
            .add_to(&self.map);
        self.popup = Some(OpenPopup {
            popup,
            _on_close: on_close,
        });
        Ok(())
    }

    fn move_popup(&mut self, at: LngLat) {
        if let Some(open) = &self.popup {
            open.popup.set_lng_lat(&lng_lat(at));
        }
    }

    fn close_popup(&mut self) {
        if let Some(open) = self.popup.take() {
            open.popup.remove_popup();
        }
    }
}
