use color_eyre::config::HookBuilder;
use color_eyre::eyre::{eyre, Result};
use crossterm::{
    cursor, execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{stdout, Stdout, Write};

pub type MapTerminal = Terminal<CrosstermBackend<Stdout>>;

/// Installs the color-eyre report hooks. Panics restore the terminal before
/// the report is printed, so it does not land on the alternate screen.
pub fn install_hooks() -> Result<()> {
    let (panic_hook, eyre_hook) = HookBuilder::default().into_hooks();
    eyre_hook.install()?;

    std::panic::set_hook(Box::new(move |info| {
        cleanup_terminal_state(true, true);
        eprintln!("{}", panic_hook.panic_report(info));
    }));
    Ok(())
}

/// Raw mode, alternate screen, hidden cursor. A failed step undoes the ones
/// before it.
pub fn setup_terminal() -> Result<MapTerminal> {
    enable_raw_mode().map_err(|e| eyre!("could not enable raw mode: {e}"))?;

    if let Err(e) = execute!(stdout(), EnterAlternateScreen) {
        cleanup_terminal_state(true, false);
        return Err(eyre!("could not enter the alternate screen: {e}"));
    }

    let mut terminal = Terminal::new(CrosstermBackend::new(stdout())).map_err(|e| {
        cleanup_terminal_state(true, true);
        eyre!("could not open the terminal backend: {e}")
    })?;

    if let Err(e) = terminal.clear().and_then(|()| terminal.hide_cursor()) {
        log::warn!("terminal not cleared: {e}");
    }

    if let Ok(size) = terminal.size() {
        log::debug!("terminal {}x{}", size.width, size.height);
    }
    Ok(terminal)
}

/// Undoes `setup_terminal`. Each flag says whether that step was taken;
/// calling it twice is harmless.
pub fn cleanup_terminal_state(raw_mode: bool, alternate_screen: bool) {
    let mut out = stdout();

    if alternate_screen {
        if let Err(e) = execute!(out, LeaveAlternateScreen) {
            log::warn!("alternate screen not left: {e}");
        }
    }
    if raw_mode {
        if let Err(e) = disable_raw_mode() {
            log::warn!("raw mode not disabled: {e}");
        }
    }

    let _ = execute!(out, cursor::Show, cursor::MoveToNextLine(1));
    let _ = out.flush();
}
