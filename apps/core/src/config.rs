use serde::Deserialize;

use crate::camera::Camera;
use crate::domain::Mode;
use crate::metrics::HeadlineSource;
use crate::style::StylePolicy;

pub const DEFAULT_DATA_PATHS: [&str; 2] = ["data/facilities.geojson", "facilities.geojson"];
pub const DEFAULT_METRICS_PATHS: [&str; 2] = ["data/metrics.json", "metrics.json"];
pub const DEFAULT_BASEMAP_STYLE: &str = "mapbox://styles/mapbox/dark-v11";

/// Settings shared by both front ends. Every field has a default, so partial
/// JSON documents and empty environments are valid.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub data_paths: Vec<String>,
    pub metrics_paths: Vec<String>,
    pub initial_modes: Vec<Mode>,
    pub initial_view: Camera,
    pub style: StylePolicy,
    pub headline_source: HeadlineSource,
    pub basemap_style: String,
    pub access_token: Option<String>,
    /// Padding in pixels around the data when framing the view.
    pub fit_padding: f64,
    pub fit_duration_ms: u32,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            data_paths: DEFAULT_DATA_PATHS.iter().map(ToString::to_string).collect(),
            metrics_paths: DEFAULT_METRICS_PATHS.iter().map(ToString::to_string).collect(),
            initial_modes: Mode::ALL.to_vec(),
            initial_view: Camera::default(),
            style: StylePolicy::default(),
            headline_source: HeadlineSource::Precomputed,
            basemap_style: DEFAULT_BASEMAP_STYLE.to_string(),
            access_token: None,
            fit_padding: 40.0,
            fit_duration_ms: 800,
        }
    }
}

/// Splits a comma-separated list, dropping blanks.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Parses a comma-separated mode list; `None` if any entry is not a mode.
pub fn parse_mode_list(value: &str) -> Option<Vec<Mode>> {
    split_list(value).iter().map(|item| Mode::parse(item)).collect()
}
