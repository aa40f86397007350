// UI module for the facility map
// Layout lives in render.rs, drawable pieces in widgets/

mod render;
pub mod widgets;

pub use render::ui;
