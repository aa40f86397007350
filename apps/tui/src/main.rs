mod app;
mod event;
mod terminal;
mod ui;

use app::App;
use clap::Parser;
use color_eyre::Result;
use facility_map_tui::cli::CliArgs;
use facility_map_tui::config::{debug_enabled, init_app_config};

#[tokio::main]
async fn main() -> Result<()> {
    terminal::install_hooks()?;

    let args = CliArgs::parse();
    args.apply_env_overrides();

    let config = init_app_config()?;
    let headless = args.headless || !is_terminal();
    init_logging(headless);

    if headless {
        return event::run_headless(&config, args.json).await;
    }

    let mut app = App::new(config);
    let mut terminal = terminal::setup_terminal()?;

    let result = event::run(&mut terminal, &mut app).await;

    terminal::cleanup_terminal_state(true, true);

    result
}

// stderr shares the screen with the UI, so interactive runs stay quiet unless
// --debug or DEBUG is set. RUST_LOG still wins.
fn init_logging(headless: bool) {
    let level = match (debug_enabled(), headless) {
        (true, _) => "debug",
        (false, true) => "warn",
        (false, false) => "off",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn is_terminal() -> bool {
    atty::is(atty::Stream::Stdout)
}
