use facility_map_core::{Mode, Selection, SelectionAction};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element};

use crate::{headline, SharedSession};

const TOGGLE_SELECTOR: &str = "[data-mode]";
const ACTIVE_CLASS: &str = "active";

/// `data-mode` values: a mode name, or `all` / `none` for the bulk actions.
fn parse_action(value: &str) -> Option<SelectionAction> {
    match value.trim().to_lowercase().as_str() {
        "all" => Some(SelectionAction::SelectAll),
        "none" | "clear" => Some(SelectionAction::Clear),
        other => Mode::parse(other).map(SelectionAction::Toggle),
    }
}

fn toggle_elements(document: &Document) -> Vec<Element> {
    let Ok(nodes) = document.query_selector_all(TOGGLE_SELECTOR) else {
        return Vec::new();
    };
    (0..nodes.length())
        .filter_map(|index| nodes.item(index))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

/// Marks each mode toggle `active` when its mode is selected.
pub fn sync_active(document: &Document, selection: &Selection) {
    for element in toggle_elements(document) {
        let Some(SelectionAction::Toggle(mode)) = element
            .get_attribute("data-mode")
            .and_then(|value| parse_action(&value))
        else {
            continue;
        };
        if let Err(e) = element
            .class_list()
            .toggle_with_force(ACTIVE_CLASS, selection.contains(mode))
        {
            log::debug!("could not update toggle class: {e:?}");
        }
    }
}

fn on_click(session: &SharedSession, document: &Document, action: SelectionAction) {
    let mut session = session.borrow_mut();
    let headline = match session.dispatch(action) {
        Ok(headline) => headline,
        Err(e) => {
            log::error!("could not restyle the map: {e}");
            session.controller.headline()
        }
    };
    headline::show(document, headline);
    sync_active(document, session.controller.selection());
}

/// Attaches click handlers to every `[data-mode]` element. Returns how many were wired.
pub fn wire(document: &Document, session: &SharedSession) -> usize {
    let elements = toggle_elements(document);
    if elements.is_empty() {
        log::info!("no {TOGGLE_SELECTOR} toggles, selection stays at its initial value");
    }

    let mut wired = 0;
    for element in elements {
        let value = element.get_attribute("data-mode").unwrap_or_default();
        let Some(action) = parse_action(&value) else {
            log::warn!("ignoring toggle with unknown mode {value:?}");
            continue;
        };

        let handler = Closure::<dyn FnMut()>::new({
            let session = session.clone();
            let document = document.clone();
            move || on_click(&session, &document, action)
        });
        if let Err(e) =
            element.add_event_listener_with_callback("click", handler.as_ref().unchecked_ref())
        {
            log::warn!("could not listen on toggle {value:?}: {e:?}");
            continue;
        }
        handler.forget();
        wired += 1;
    }

    sync_active(document, session.borrow().controller.selection());
    wired
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_values_map_to_actions() {
        assert_eq!(parse_action("Rail"), Some(SelectionAction::Toggle(Mode::Rail)));
        assert_eq!(parse_action("transit"), Some(SelectionAction::Toggle(Mode::Bus)));
        assert_eq!(parse_action("all"), Some(SelectionAction::SelectAll));
        assert_eq!(parse_action(" none "), Some(SelectionAction::Clear));
        assert_eq!(parse_action("Zeppelin"), None);
    }
}
