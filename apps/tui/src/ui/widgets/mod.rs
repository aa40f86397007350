pub mod map;
pub mod popup;
pub mod toggles;
pub mod tooltip;
