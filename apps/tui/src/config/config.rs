use dotenv::dotenv;
use facility_map_core::config::{parse_mode_list, split_list};
use facility_map_core::metrics::HeadlineSource;
use facility_map_core::{EmptySelection, MapConfig};
use std::env;
use std::path::PathBuf;
use thiserror::Error;

pub const CONFIG_FILE_VAR: &str = "FACILITY_CONFIG";
pub const DATA_PATHS_VAR: &str = "FACILITY_DATA_PATHS";
pub const METRICS_PATHS_VAR: &str = "FACILITY_METRICS_PATHS";
pub const MODES_VAR: &str = "FACILITY_MODES";
pub const DIM_START_ZOOM_VAR: &str = "FACILITY_DIM_START_ZOOM";
pub const EMPTY_SELECTION_VAR: &str = "FACILITY_EMPTY_SELECTION";
pub const HEADLINE_SOURCE_VAR: &str = "FACILITY_HEADLINE_SOURCE";
pub const DEBUG_VAR: &str = "DEBUG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("{var} has an invalid value: {value:?}")]
    InvalidValue { var: &'static str, value: String },
}

/// Loads `.env`, then builds the configuration from the process environment.
pub fn init_app_config() -> Result<MapConfig, ConfigError> {
    dotenv().ok();
    config_from_lookup(|key| env::var(key).ok())
}

/// Builds the configuration from an optional JSON file plus variable overrides.
///
/// `lookup` stands in for the environment so callers can supply their own.
pub fn config_from_lookup<F>(lookup: F) -> Result<MapConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match lookup(CONFIG_FILE_VAR) {
        Some(path) => read_config_file(PathBuf::from(path))?,
        None => MapConfig::default(),
    };

    if let Some(value) = lookup(DATA_PATHS_VAR) {
        let paths = split_list(&value);
        if paths.is_empty() {
            return Err(invalid(DATA_PATHS_VAR, value));
        }
        config.data_paths = paths;
    }

    if let Some(value) = lookup(METRICS_PATHS_VAR) {
        config.metrics_paths = split_list(&value);
    }

    if let Some(value) = lookup(MODES_VAR) {
        config.initial_modes = parse_mode_list(&value).ok_or_else(|| invalid(MODES_VAR, value))?;
    }

    if let Some(value) = lookup(DIM_START_ZOOM_VAR) {
        config.style.dim_start_zoom = value
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|zoom| zoom.is_finite() && *zoom >= 0.0)
            .ok_or_else(|| invalid(DIM_START_ZOOM_VAR, value))?;
    }

    if let Some(value) = lookup(EMPTY_SELECTION_VAR) {
        config.style.empty_selection =
            EmptySelection::parse(&value).ok_or_else(|| invalid(EMPTY_SELECTION_VAR, value))?;
    }

    if let Some(value) = lookup(HEADLINE_SOURCE_VAR) {
        config.headline_source =
            HeadlineSource::parse(&value).ok_or_else(|| invalid(HEADLINE_SOURCE_VAR, value))?;
    }

    Ok(config)
}

/// True when `DEBUG` is set to anything but `0` or empty.
pub fn debug_enabled() -> bool {
    env::var(DEBUG_VAR).is_ok_and(|value| !value.is_empty() && value != "0")
}

fn read_config_file(path: PathBuf) -> Result<MapConfig, ConfigError> {
    let text = match std::fs::read_to_string(&path) {
        Ok(text) => text,
        Err(source) => return Err(ConfigError::Read { path, source }),
    };
    serde_json::from_str(&text).map_err(|source| ConfigError::Json { path, source })
}

fn invalid(var: &'static str, value: String) -> ConfigError {
    ConfigError::InvalidValue { var, value }
}
