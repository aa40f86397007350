//! Binds the facility collection to a map surface and keeps its layers in
//! step with the selection.

use serde_json::Value;

use crate::bounds::{compute_bounds, Bounds};
use crate::error::MapError;
use crate::facility::FacilityCollection;
use crate::layers::{build_layers, build_updates, LayerSpec, SOURCE_ID};
use crate::selection::Selection;
use crate::style::StylePolicy;

/// The subset of a map library the binding drives.
pub trait MapSurface {
    fn has_layer(&self, id: &str) -> bool;
    fn add_geojson_source(&mut self, id: &str, data: &Value) -> Result<(), MapError>;
    fn add_layer(&mut self, layer: &LayerSpec) -> Result<(), MapError>;
    fn set_filter(&mut self, layer_id: &str, filter: &Value) -> Result<(), MapError>;
    fn set_paint_property(&mut self, layer_id: &str, name: &str, value: &Value) -> Result<(), MapError>;
    fn fit_bounds(&mut self, bounds: &Bounds, padding: f64, duration_ms: u32) -> Result<(), MapError>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitOptions {
    pub padding: f64,
    pub duration_ms: u32,
}

/// Adds the source and layers, then frames the view around the data.
///
/// Layers are added even when no coordinate is usable; that case is then
/// reported as `MapError::NoUsableData` instead of leaving the default view.
pub fn bind<S: MapSurface>(
    surface: &mut S,
    collection: &FacilityCollection,
    policy: &StylePolicy,
    selection: &Selection,
    fit: FitOptions,
) -> Result<Bounds, MapError> {
    surface.add_geojson_source(SOURCE_ID, collection.source_document())?;

    for layer in build_layers(policy, selection) {
        if surface.has_layer(layer.id) {
            continue;
        }
        surface.add_layer(&layer)?;
    }

    let bounds = compute_bounds(collection.facilities().iter().map(|f| f.coordinates))?;
    surface.fit_bounds(&bounds, fit.padding, fit.duration_ms)?;
    Ok(bounds)
}

/// Pushes current filters and paint onto every layer that exists.
///
/// Layers the surface does not have yet are skipped. Returns how many layers
/// were updated.
pub fn apply<S: MapSurface>(
    surface: &mut S,
    policy: &StylePolicy,
    selection: &Selection,
) -> Result<usize, MapError> {
    let mut updated = 0;
    for update in build_updates(policy, selection) {
        if !surface.has_layer(update.id) {
            log::trace!("layer {} not added yet, skipping update", update.id);
            continue;
        }
        surface.set_filter(update.id, &update.filter)?;
        for (name, value) in &update.paint {
            surface.set_paint_property(update.id, name, value)?;
        }
        updated += 1;
    }
    Ok(updated)
}
