mod fetch;
mod headline;
mod mapbox;
mod toggles;
mod tooltip;

use std::cell::RefCell;
use std::rc::Rc;

use facility_map_core::binding::{bind, FitOptions};
use facility_map_core::loader::{load_first, parse_facilities, parse_json};
use facility_map_core::metrics::{Headline, MetricsSummary};
use facility_map_core::{MapConfig, MapController, MapError, SelectionAction};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Window};

use fetch::fetch_text;
use mapbox::{set_access_token, MapboxSurface};

const CONFIG_LOCATIONS: [&str; 2] = ["config.json", "data/config.json"];
const MAP_CONTAINER: &str = "map";

/// Selection state and the map it drives, shared between DOM handlers.
pub struct Session {
    pub controller: MapController,
    pub surface: Option<MapboxSurface>,
}

pub type SharedSession = Rc<RefCell<Session>>;

impl Session {
    /// Applies `action` and restyles the map, if there is one.
    pub fn dispatch(&mut self, action: SelectionAction) -> Result<Headline, MapError> {
        match self.surface.as_mut() {
            Some(surface) => self.controller.dispatch(action, surface),
            None => Ok(self.controller.apply_action(action)),
        }
    }
}

fn main() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::error_1(&format!("logger already set: {e}").into());
    }

    spawn_local(start());
}

fn alert(window: &Window, message: &str) {
    if window.alert_with_message(message).is_err() {
        log::error!("{message}");
    }
}

async fn load_config() -> MapConfig {
    let candidates = CONFIG_LOCATIONS.map(String::from);
    match load_first(&candidates, fetch_text, parse_json::<MapConfig>).await {
        Ok(loaded) => {
            log::info!("configuration from {}", loaded.location);
            loaded.value
        }
        Err(e) => {
            log::info!("using default configuration: {e}");
            MapConfig::default()
        }
    }
}

async fn load_summary(config: &MapConfig) -> Option<MetricsSummary> {
    if config.metrics_paths.is_empty() {
        return None;
    }
    match load_first(&config.metrics_paths, fetch_text, parse_json::<MetricsSummary>).await {
        Ok(loaded) => Some(loaded.value),
        Err(e) => {
            log::warn!("metrics unavailable, headline falls back to the live value: {e}");
            None
        }
    }
}

async fn start() {
    let Some(window) = web_sys::window() else {
        log::error!("no window");
        return;
    };
    let Some(document) = window.document() else {
        log::error!("no document");
        return;
    };

    let config = load_config().await;

    let facilities = match load_first(&config.data_paths, fetch_text, parse_facilities).await {
        Ok(loaded) => loaded,
        Err(e) => {
            log::error!("{e}");
            alert(&window, &format!("Could not load facility data.\n{e}"));
            return;
        }
    };
    log::info!(
        "{} facilities ({} hubs) from {}",
        facilities.value.len(),
        facilities.value.hub_count(),
        facilities.location
    );

    let mut controller = MapController::new(facilities.value, &config);
    controller.set_summary(load_summary(&config).await);
    if headline::has_headline(&document) {
        headline::show(&document, controller.headline());
    }

    let surface = create_surface(&document, &config);
    let has_map = surface.is_some();
    let session = Rc::new(RefCell::new(Session {
        controller,
        surface,
    }));

    toggles::wire(&document, &session);

    if has_map {
        let fit = FitOptions {
            padding: config.fit_padding,
            duration_ms: config.fit_duration_ms,
        };
        let on_load = Closure::<dyn FnMut()>::new({
            let session = session.clone();
            move || on_map_load(&session, &window, &document, fit)
        });
        if let Some(surface) = session.borrow().surface.as_ref() {
            surface.map().on("load", on_load.as_ref().unchecked_ref());
        }
        on_load.forget();
    }
}

fn create_surface(document: &Document, config: &MapConfig) -> Option<MapboxSurface> {
    if document.get_element_by_id(MAP_CONTAINER).is_none() {
        log::info!("no #{MAP_CONTAINER} container, map disabled");
        return None;
    }

    match &config.access_token {
        Some(token) => {
            if let Err(e) = set_access_token(token) {
                log::warn!("could not set access token: {e}");
            }
        }
        None => log::warn!("no access_token in config.json, hosted basemap styles will not load"),
    }

    match MapboxSurface::create(MAP_CONTAINER, &config.basemap_style, config.initial_view) {
        Ok(surface) => Some(surface),
        Err(e) => {
            log::error!("could not create map: {e}");
            None
        }
    }
}

fn on_map_load(session: &SharedSession, window: &Window, document: &Document, fit: FitOptions) {
    {
        let mut guard = session.borrow_mut();
        let Session {
            controller,
            surface,
        } = &mut *guard;
        let Some(surface) = surface.as_mut() else {
            return;
        };

        match bind(
            surface,
            controller.collection(),
            controller.policy(),
            controller.selection(),
            fit,
        ) {
            Ok(bounds) => log::info!("framed {:?}", bounds.as_corners()),
            Err(MapError::NoUsableData) => {
                log::warn!("no facility has usable coordinates");
                alert(
                    window,
                    "The facility data loaded, but no facility has usable coordinates.",
                );
            }
            Err(e) => {
                log::error!("{e}");
                alert(window, &format!("Could not draw facilities.\n{e}"));
            }
        }
    }

    tooltip::wire(document, session);
}
