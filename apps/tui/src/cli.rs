use clap::{CommandFactory, Parser};

use crate::config::{
    CONFIG_FILE_VAR, DATA_PATHS_VAR, EMPTY_SELECTION_VAR, HEADLINE_SOURCE_VAR, METRICS_PATHS_VAR,
    MODES_VAR,
};

#[derive(Debug, Parser)]
#[command(
    name = "facility-map",
    version,
    about = "Intermodal transportation facility map"
)]
pub struct CliArgs {
    /// Print dataset stats and exit
    #[arg(long)]
    pub headless: bool,

    /// Print headless stats as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Facility GeoJSON location, tried in the order given (repeatable)
    #[arg(long = "data", value_name = "PATH_OR_URL")]
    pub data: Vec<String>,

    /// Metrics summary location, tried in the order given (repeatable)
    #[arg(long = "metrics", value_name = "PATH_OR_URL")]
    pub metrics: Vec<String>,

    /// Initially selected modes, comma separated
    #[arg(long, value_name = "MODES")]
    pub modes: Option<String>,

    /// Show every facility when no mode is selected
    #[arg(long = "show-all-when-empty")]
    pub show_all_when_empty: bool,

    /// Compute the headline from the current selection instead of the metrics file
    #[arg(long = "live-headline")]
    pub live_headline: bool,

    /// JSON config file
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,
}

impl CliArgs {
    pub fn apply_env_overrides(&self) {
        if let Some(path) = &self.config {
            std::env::set_var(CONFIG_FILE_VAR, path);
        }
        if !self.data.is_empty() {
            std::env::set_var(DATA_PATHS_VAR, self.data.join(","));
        }
        if !self.metrics.is_empty() {
            std::env::set_var(METRICS_PATHS_VAR, self.metrics.join(","));
        }
        if let Some(modes) = &self.modes {
            std::env::set_var(MODES_VAR, modes);
        }
        if self.show_all_when_empty {
            std::env::set_var(EMPTY_SELECTION_VAR, "everything");
        }
        if self.live_headline {
            std::env::set_var(HEADLINE_SOURCE_VAR, "live");
        }
        if self.debug {
            std::env::set_var("DEBUG", "1");
        }
    }

    pub fn help_text() -> String {
        let mut command = Self::command();
        let mut buffer = Vec::new();
        command.write_help(&mut buffer).ok();
        String::from_utf8_lossy(&buffer).to_string()
    }
}
