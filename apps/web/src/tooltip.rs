use facility_map_core::layers::LayerKind;
use facility_map_core::tooltip::{place_near_pointer, TooltipContent};
use facility_map_core::Facility;
use serde_json::{Map, Value};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement};

use crate::SharedSession;

const TOOLTIP_ID: &str = "tooltip";

fn get(value: &JsValue, key: &str) -> Option<JsValue> {
    js_sys::Reflect::get(value, &JsValue::from_str(key))
        .ok()
        .filter(|v| !v.is_undefined() && !v.is_null())
}

/// Properties of the first feature under the pointer.
fn first_feature_properties(event: &JsValue) -> Option<Map<String, Value>> {
    let features = get(event, "features")?.dyn_into::<js_sys::Array>().ok()?;
    let properties = get(&features.get(0), "properties")?;
    match serde_wasm_bindgen::from_value::<Map<String, Value>>(properties) {
        Ok(properties) => Some(properties),
        Err(e) => {
            log::debug!("unreadable feature properties: {e}");
            None
        }
    }
}

fn pointer(event: &JsValue) -> Option<(f64, f64)> {
    let point = get(event, "point")?;
    Some((get(&point, "x")?.as_f64()?, get(&point, "y")?.as_f64()?))
}

fn set_style(element: &HtmlElement, name: &str, value: &str) {
    if let Err(e) = element.style().set_property(name, value) {
        log::debug!("could not set {name}: {e:?}");
    }
}

fn show(panel: &HtmlElement, canvas: &HtmlElement, event: &JsValue) {
    let Some(properties) = first_feature_properties(event) else {
        return;
    };
    let facility = Facility::from_properties(&properties, None);
    panel.set_inner_html(&TooltipContent::from_facility(&facility).render_html());
    set_style(panel, "display", "block");
    set_style(canvas, "cursor", "pointer");

    let Some(at) = pointer(event) else {
        return;
    };
    let (left, top) = place_near_pointer(
        at,
        (f64::from(panel.offset_width()), f64::from(panel.offset_height())),
        (f64::from(canvas.client_width()), f64::from(canvas.client_height())),
    );
    set_style(panel, "left", &format!("{left}px"));
    set_style(panel, "top", &format!("{top}px"));
}

fn hide(panel: &HtmlElement, canvas: &HtmlElement) {
    set_style(panel, "display", "none");
    set_style(canvas, "cursor", "");
}

/// Shows the hover panel over the single-mode and hub layers.
pub fn wire(document: &Document, session: &SharedSession) {
    let Some(panel) = document
        .get_element_by_id(TOOLTIP_ID)
        .and_then(|element| element.dyn_into::<HtmlElement>().ok())
    else {
        log::info!("no #{TOOLTIP_ID} element, tooltips disabled");
        return;
    };

    let session = session.borrow();
    let Some(surface) = session.surface.as_ref() else {
        return;
    };
    let map = surface.map();
    let canvas = map.get_canvas();

    for kind in LayerKind::ALL.into_iter().filter(|kind| kind.is_hoverable()) {
        let on_move = Closure::<dyn FnMut(JsValue)>::new({
            let panel = panel.clone();
            let canvas = canvas.clone();
            move |event: JsValue| show(&panel, &canvas, &event)
        });
        let on_leave = Closure::<dyn FnMut(JsValue)>::new({
            let panel = panel.clone();
            let canvas = canvas.clone();
            move |_event: JsValue| hide(&panel, &canvas)
        });

        map.on_layer("mousemove", kind.id(), on_move.as_ref().unchecked_ref());
        map.on_layer("mouseleave", kind.id(), on_leave.as_ref().unchecked_ref());
        on_move.forget();
        on_leave.forget();
    }
}
