mod setup;

pub use setup::{cleanup_terminal_state, install_hooks, setup_terminal, MapTerminal};
