use facility_map_core::bounds::{compute_bounds, Bounds};
use facility_map_core::camera::{Camera, CameraTransition};
use facility_map_core::metrics::Headline;
use facility_map_core::{Facility, MapConfig, MapController, MapError, SelectionAction};
use facility_map_tui::data::Dataset;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use std::time::Instant;
use throbber_widgets_tui::ThrobberState;

/// Nominal pixel size of one terminal cell, used to reuse map-pixel maths.
pub const CELL_PIXELS: (f64, f64) = (8.0, 16.0);
/// How close, in cells, a facility must be to the crosshair to count as hovered.
pub const HOVER_RADIUS_CELLS: f64 = 2.0;
const PAN_STEP: f64 = 0.1;
const ZOOM_STEP: f64 = 0.5;
const FOCUS_ZOOM: f64 = 9.0;
const SEARCH_RESULTS: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
    Failed(String),
}

/// Incremental name search over the loaded facilities.
#[derive(Debug, Default)]
pub struct SearchState {
    pub query: String,
    pub matches: Vec<usize>,
    pub selected: usize,
}

impl SearchState {
    pub fn refresh(&mut self, facilities: &[Facility]) {
        self.selected = 0;
        if self.query.trim().is_empty() {
            self.matches.clear();
            return;
        }

        let matcher = SkimMatcherV2::default();
        let mut scored = facilities
            .iter()
            .enumerate()
            .filter(|(_, facility)| facility.coordinates.is_some())
            .filter_map(|(index, facility)| {
                matcher
                    .fuzzy_match(&facility.name, &self.query)
                    .map(|score| (score, index))
            })
            .collect::<Vec<_>>();
        scored.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
        self.matches = scored
            .into_iter()
            .take(SEARCH_RESULTS)
            .map(|(_, index)| index)
            .collect();
    }

    pub fn current(&self) -> Option<usize> {
        self.matches.get(self.selected).copied()
    }
}

#[derive(Debug)]
pub struct App {
    pub running: bool,
    pub config: MapConfig,
    pub load_state: LoadState,
    pub controller: Option<MapController>,
    pub camera: Camera,
    pub transition: Option<CameraTransition>,
    pub data_bounds: Option<Bounds>,
    pub hovered: Option<usize>,
    pub status_message: String,
    pub show_help: bool,
    pub search: Option<SearchState>,
    pub throbber: ThrobberState,
    /// Map area in cells, updated on every draw.
    pub viewport: (u16, u16),
    started: Instant,
}

impl App {
    pub fn new(config: MapConfig) -> Self {
        Self {
            running: true,
            camera: config.initial_view,
            config,
            load_state: LoadState::Loading,
            controller: None,
            transition: None,
            data_bounds: None,
            hovered: None,
            status_message: String::new(),
            show_help: false,
            search: None,
            throbber: ThrobberState::default(),
            viewport: (80, 24),
            started: Instant::now(),
        }
    }

    pub fn viewport_pixels(&self) -> (f64, f64) {
        (
            f64::from(self.viewport.0) * CELL_PIXELS.0,
            f64::from(self.viewport.1) * CELL_PIXELS.1,
        )
    }

    pub fn visible_bounds(&self) -> Bounds {
        let (width, height) = self.viewport_pixels();
        self.camera.visible_bounds(width, height)
    }

    pub fn on_loaded(&mut self, result: Result<Dataset, MapError>) {
        let dataset = match result {
            Ok(dataset) => dataset,
            Err(e) => {
                log::error!("could not load facilities: {e}");
                self.load_state = LoadState::Failed(e.to_string());
                return;
            }
        };

        let mut controller = MapController::new(dataset.collection, &self.config);
        controller.set_summary(dataset.summary);

        match compute_bounds(controller.facilities().iter().map(|f| f.coordinates)) {
            Ok(bounds) => {
                self.data_bounds = Some(bounds);
                self.status_message = format!(
                    "Loaded {} facilities from {}",
                    controller.facilities().len(),
                    dataset.source
                );
                if let Some(metrics) = &dataset.metrics_source {
                    self.status_message.push_str(&format!(", metrics from {metrics}"));
                }
            }
            Err(e) => {
                log::warn!("{e}");
                self.status_message = format!("{e}; showing the default view");
            }
        }

        self.controller = Some(controller);
        self.load_state = LoadState::Ready;
        self.frame_data();
    }

    /// Animates the camera to fit the loaded data, if any coordinate was usable.
    pub fn frame_data(&mut self) {
        let Some(bounds) = self.data_bounds else {
            return;
        };
        let (width, height) = self.viewport_pixels();
        let padding = self.config.fit_padding.min(width.min(height) / 4.0);
        let target = Camera::fit(&bounds, width, height, padding);
        self.animate_to(target);
    }

    pub fn animate_to(&mut self, target: Camera) {
        let seconds = f64::from(self.config.fit_duration_ms) / 1000.0;
        self.transition = Some(CameraTransition::new(self.camera, target, seconds));
    }

    /// Moves the camera immediately, cancelling any running animation.
    pub fn jump_to(&mut self, target: Camera) {
        self.transition = None;
        self.camera = target;
        self.refresh_hover();
    }

    pub fn zoom(&mut self, steps: f64) {
        let target = self.settled_camera().zoomed_by(steps * ZOOM_STEP);
        self.jump_to(target);
    }

    pub fn pan(&mut self, dx: f64, dy: f64) {
        let (width, height) = self.viewport_pixels();
        let target = self
            .settled_camera()
            .panned_by(dx * PAN_STEP, dy * PAN_STEP, width, height);
        self.jump_to(target);
    }

    fn settled_camera(&self) -> Camera {
        self.transition.map_or(self.camera, |t| t.target())
    }

    /// Per-frame tick: spinner, camera animation and hover.
    pub fn update(&mut self) {
        if self.load_state == LoadState::Loading {
            self.throbber.calc_next();
        }

        if let Some(transition) = self.transition.as_mut() {
            self.camera = transition.advance(self.started.elapsed().as_secs_f64());
            if transition.is_finished() {
                self.transition = None;
            }
        }

        self.refresh_hover();
    }

    pub fn select(&mut self, action: SelectionAction) {
        let Some(controller) = self.controller.as_mut() else {
            return;
        };
        let headline = controller.apply_action(action);
        let counts = controller.counts();
        self.status_message = format!(
            "{} selected, {} hubs, headline {headline}",
            counts.selected, counts.hubs
        );
        self.refresh_hover();
    }

    pub fn headline(&self) -> Headline {
        self.controller
            .as_ref()
            .map_or(Headline(None), MapController::headline)
    }

    /// Indices of facilities drawn at the current camera, in draw order.
    pub fn visible_facilities(&self) -> Vec<usize> {
        let Some(controller) = &self.controller else {
            return Vec::new();
        };
        let view = self.visible_bounds();
        controller
            .facilities()
            .iter()
            .enumerate()
            .filter(|(_, facility)| {
                facility
                    .coordinates
                    .is_some_and(|[lon, lat]| view.contains(lon, lat))
            })
            .filter(|(_, facility)| {
                controller
                    .style_for(facility, self.camera.zoom)
                    .is_visible()
            })
            .map(|(index, _)| index)
            .collect()
    }

    /// Hovers the selected facility nearest the crosshair, within reach.
    ///
    /// Context features are drawn but never hovered.
    pub fn refresh_hover(&mut self) {
        let Some(controller) = &self.controller else {
            self.hovered = None;
            return;
        };
        let dpp = self.camera.degrees_per_pixel();

        self.hovered = self
            .visible_facilities()
            .into_iter()
            .filter_map(|index| {
                let facility = &controller.facilities()[index];
                if !controller.style_for(facility, self.camera.zoom).selected {
                    return None;
                }
                let [lon, lat] = facility.coordinates?;
                let dx = (lon - self.camera.lon) / dpp / CELL_PIXELS.0;
                let dy = (lat - self.camera.lat) / dpp / CELL_PIXELS.1;
                let distance = dx.hypot(dy);
                (distance <= HOVER_RADIUS_CELLS).then_some((distance, index))
            })
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, index)| index);
    }

    pub fn hovered_facility(&self) -> Option<&Facility> {
        let controller = self.controller.as_ref()?;
        controller.facilities().get(self.hovered?)
    }

    /// Centres the camera on a facility, zooming in if needed.
    pub fn focus(&mut self, index: usize) {
        let Some(controller) = &self.controller else {
            return;
        };
        let Some(facility) = controller.facilities().get(index) else {
            return;
        };
        let Some([lon, lat]) = facility.coordinates else {
            return;
        };
        self.status_message = facility.name.clone();
        let zoom = self.settled_camera().zoom.max(FOCUS_ZOOM);
        self.jump_to(Camera { lon, lat, zoom });
    }

    pub fn open_search(&mut self) {
        if self.controller.is_some() {
            self.search = Some(SearchState::default());
        }
    }

    pub fn search_input(&mut self, edit: impl FnOnce(&mut String)) {
        let (Some(search), Some(controller)) = (self.search.as_mut(), self.controller.as_ref())
        else {
            return;
        };
        edit(&mut search.query);
        search.refresh(controller.facilities());
    }
}
