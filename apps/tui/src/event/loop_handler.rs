use color_eyre::Result;
use crossterm::event::{self, Event, KeyEventKind};
use facility_map_core::bounds::{compute_bounds, Bounds};
use facility_map_core::{MapConfig, MapController, MapError, Mode};
use facility_map_tui::data::{load_dataset, Dataset};
use std::time::Duration;
use tokio::task::{JoinError, JoinHandle};

use crate::app::{handle_input, App};
use crate::terminal::MapTerminal;
use crate::ui;

const EVENT_POLL_TIMEOUT: Duration = Duration::from_millis(50);

/// Load the dataset and print a summary without starting the UI.
pub async fn run_headless(config: &MapConfig, json: bool) -> Result<()> {
    let dataset = load_dataset(config).await?;
    let stats = build_headless_stats(config, dataset);

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        render_headless_stats(&stats);
    }

    Ok(())
}

fn render_headless_stats(stats: &HeadlessStats) {
    println!("\nIntermodal Facility Stats");
    println!("=========================");
    println!("Source: {}", stats.source);
    if let Some(metrics) = &stats.metrics_source {
        println!("Metrics: {metrics}");
    }
    println!("Total facilities: {}", stats.total_facilities);
    println!("With coordinates: {}", stats.with_coordinates);
    println!("Intermodal hubs: {}", stats.hubs);
    println!("Headline: {}", stats.headline);

    println!("\nFacilities by Mode:");
    for (mode, count) in &stats.by_mode {
        println!("- {mode}: {count}");
    }
    if stats.unrecognised > 0 {
        println!("- (no recognised mode): {}", stats.unrecognised);
    }

    match &stats.bounds {
        Some(b) => println!(
            "\nBounds: {:.4},{:.4} to {:.4},{:.4}",
            b.min_lon, b.min_lat, b.max_lon, b.max_lat
        ),
        None => println!("\nBounds: no facility has usable coordinates"),
    }
}

fn build_headless_stats(config: &MapConfig, dataset: Dataset) -> HeadlessStats {
    let mut controller = MapController::new(dataset.collection, config);
    controller.set_summary(dataset.summary);
    let facilities = controller.facilities();

    let by_mode = Mode::ALL
        .into_iter()
        .map(|mode| {
            let count = facilities
                .iter()
                .filter(|f| f.known_modes().contains(&mode))
                .count();
            (mode.as_str().to_string(), count)
        })
        .collect();

    let bounds = match compute_bounds(facilities.iter().map(|f| f.coordinates)) {
        Ok(bounds) => Some(bounds),
        Err(MapError::NoUsableData) => None,
        Err(e) => {
            log::warn!("{e}");
            None
        }
    };

    HeadlessStats {
        source: dataset.source,
        metrics_source: dataset.metrics_source,
        total_facilities: facilities.len(),
        with_coordinates: facilities.iter().filter(|f| f.coordinates.is_some()).count(),
        hubs: controller.collection().hub_count(),
        headline: controller.headline().to_string(),
        by_mode,
        unrecognised: facilities.iter().filter(|f| f.known_modes().is_empty()).count(),
        no_usable_data: bounds.is_none(),
        bounds,
    }
}

#[derive(Debug, serde::Serialize)]
struct HeadlessStats {
    source: String,
    metrics_source: Option<String>,
    total_facilities: usize,
    with_coordinates: usize,
    hubs: usize,
    headline: String,
    by_mode: Vec<(String, usize)>,
    unrecognised: usize,
    bounds: Option<Bounds>,
    no_usable_data: bool,
}

fn joined_load(
    joined: Result<Result<Dataset, MapError>, JoinError>,
) -> Result<Dataset, MapError> {
    joined.unwrap_or_else(|e| Err(MapError::Task(e.to_string())))
}

/// Run the interactive map until the user quits.
///
/// The dataset loads on a background task while the spinner draws.
pub async fn run(terminal: &mut MapTerminal, app: &mut App) -> Result<()> {
    let config = app.config.clone();
    let mut loading: Option<JoinHandle<Result<Dataset, MapError>>> =
        Some(tokio::spawn(async move { load_dataset(&config).await }));

    loop {
        if let Some(handle) = loading.take_if(|handle| handle.is_finished()) {
            app.on_loaded(joined_load(handle.await));
        }

        app.update();

        if let Err(e) = terminal.draw(|f| ui::ui(app, f)) {
            return Err(color_eyre::eyre::eyre!("Terminal draw error: {e}"));
        }

        if matches!(event::poll(EVENT_POLL_TIMEOUT), Ok(true)) {
            match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    handle_input(app, key.code);
                    if !app.running {
                        break;
                    }
                }
                Ok(Event::Resize(_, _)) => {
                    // Viewport is re-measured on the next draw
                }
                Ok(_) | Err(_) => {}
            }
        }
    }

    if let Some(handle) = loading {
        handle.abort();
    }
    Ok(())
}
