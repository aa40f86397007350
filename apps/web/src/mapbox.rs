//! mapbox-gl bindings and the `MapSurface` implementation over them.

use facility_map_core::binding::MapSurface;
use facility_map_core::bounds::Bounds;
use facility_map_core::camera::Camera;
use facility_map_core::layers::LayerSpec;
use facility_map_core::MapError;
use serde::Serialize;
use serde_json::{json, Value};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = mapboxgl, js_name = Map)]
    pub type MapboxMap;

    #[wasm_bindgen(constructor, js_namespace = mapboxgl, js_class = "Map", catch)]
    fn new(options: &JsValue) -> Result<MapboxMap, JsValue>;

    #[wasm_bindgen(method, js_name = addSource, catch)]
    fn add_source(this: &MapboxMap, id: &str, source: &JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(method, js_name = getLayer)]
    fn get_layer(this: &MapboxMap, id: &str) -> JsValue;

    #[wasm_bindgen(method, js_name = addLayer, catch)]
    fn add_layer(this: &MapboxMap, layer: &JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(method, js_name = setFilter, catch)]
    fn set_filter(this: &MapboxMap, layer: &str, filter: &JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(method, js_name = setPaintProperty, catch)]
    fn set_paint_property(
        this: &MapboxMap,
        layer: &str,
        name: &str,
        value: &JsValue,
    ) -> Result<(), JsValue>;

    #[wasm_bindgen(method, js_name = fitBounds, catch)]
    fn fit_bounds(this: &MapboxMap, bounds: &JsValue, options: &JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(method, js_name = addControl)]
    fn add_control(this: &MapboxMap, control: &JsValue, position: &str);

    #[wasm_bindgen(method)]
    pub fn on(this: &MapboxMap, event: &str, handler: &js_sys::Function);

    #[wasm_bindgen(method, js_name = on)]
    pub fn on_layer(this: &MapboxMap, event: &str, layer: &str, handler: &js_sys::Function);

    #[wasm_bindgen(method, js_name = getCanvas)]
    pub fn get_canvas(this: &MapboxMap) -> web_sys::HtmlElement;

    #[wasm_bindgen(js_namespace = mapboxgl, js_name = NavigationControl)]
    type NavigationControl;

    #[wasm_bindgen(constructor, js_namespace = mapboxgl, js_class = "NavigationControl")]
    fn new() -> NavigationControl;
}

fn to_js(value: &impl Serialize) -> Result<JsValue, String> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| e.to_string())
}

fn js_message(value: &JsValue) -> String {
    value
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| value.as_string())
        .unwrap_or_else(|| format!("{value:?}"))
}

fn surface_error(operation: &'static str) -> impl Fn(String) -> MapError {
    move |message| MapError::Surface { operation, message }
}

/// Sets `mapboxgl.accessToken`.
pub fn set_access_token(token: &str) -> Result<(), String> {
    let mapboxgl = js_sys::Reflect::get(&js_sys::global(), &JsValue::from_str("mapboxgl"))
        .map_err(|e| js_message(&e))?;
    if mapboxgl.is_undefined() {
        return Err("mapboxgl is not loaded".to_string());
    }
    js_sys::Reflect::set(&mapboxgl, &JsValue::from_str("accessToken"), &JsValue::from_str(token))
        .map(|_| ())
        .map_err(|e| js_message(&e))
}

/// The live map, driven through [`MapSurface`].
pub struct MapboxSurface {
    map: MapboxMap,
}

impl MapboxSurface {
    pub fn create(container: &str, style: &str, view: Camera) -> Result<Self, String> {
        let options = to_js(&json!({
            "container": container,
            "style": style,
            "center": [view.lon, view.lat],
            "zoom": view.zoom,
        }))?;
        let map = MapboxMap::new(&options).map_err(|e| js_message(&e))?;
        map.add_control(&NavigationControl::new(), "bottom-right");
        Ok(Self { map })
    }

    pub const fn map(&self) -> &MapboxMap {
        &self.map
    }
}

impl MapSurface for MapboxSurface {
    fn has_layer(&self, id: &str) -> bool {
        let layer = self.map.get_layer(id);
        !layer.is_undefined() && !layer.is_null()
    }

    fn add_geojson_source(&mut self, id: &str, data: &Value) -> Result<(), MapError> {
        let source = to_js(&json!({ "type": "geojson", "data": data }))
            .map_err(surface_error("addSource"))?;
        self.map
            .add_source(id, &source)
            .map_err(|e| surface_error("addSource")(js_message(&e)))
    }

    fn add_layer(&mut self, layer: &LayerSpec) -> Result<(), MapError> {
        let spec = to_js(layer).map_err(surface_error("addLayer"))?;
        self.map
            .add_layer(&spec)
            .map_err(|e| surface_error("addLayer")(js_message(&e)))
    }

    fn set_filter(&mut self, layer_id: &str, filter: &Value) -> Result<(), MapError> {
        let filter = to_js(filter).map_err(surface_error("setFilter"))?;
        self.map
            .set_filter(layer_id, &filter)
            .map_err(|e| surface_error("setFilter")(js_message(&e)))
    }

    fn set_paint_property(&mut self, layer_id: &str, name: &str, value: &Value) -> Result<(), MapError> {
        let value = to_js(value).map_err(surface_error("setPaintProperty"))?;
        self.map
            .set_paint_property(layer_id, name, &value)
            .map_err(|e| surface_error("setPaintProperty")(js_message(&e)))
    }

    fn fit_bounds(&mut self, bounds: &Bounds, padding: f64, duration_ms: u32) -> Result<(), MapError> {
        let corners = to_js(&bounds.as_corners()).map_err(surface_error("fitBounds"))?;
        let options = to_js(&json!({ "padding": padding, "duration": duration_ms }))
            .map_err(surface_error("fitBounds"))?;
        self.map
            .fit_bounds(&corners, &options)
            .map_err(|e| surface_error("fitBounds")(js_message(&e)))
    }
}
