#[allow(clippy::module_inception)]
mod config;

pub use config::{config_from_lookup, debug_enabled, init_app_config, ConfigError};
pub use config::{
    CONFIG_FILE_VAR, DATA_PATHS_VAR, DIM_START_ZOOM_VAR, EMPTY_SELECTION_VAR, HEADLINE_SOURCE_VAR,
    METRICS_PATHS_VAR, MODES_VAR,
};
