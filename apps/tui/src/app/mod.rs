// Application state and key handling for the terminal map

pub mod helpers;
pub mod input;
pub mod state;

pub use input::handle_input;
pub use state::{App, LoadState};
