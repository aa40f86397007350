// Shared logic for the facility map front ends
pub mod binding;
pub mod bounds;
pub mod camera;
pub mod config;
pub mod controller;
pub mod domain;
pub mod error;
pub mod facility;
pub mod layers;
pub mod loader;
pub mod metrics;
pub mod modes;
pub mod selection;
pub mod style;
pub mod tooltip;

pub use config::MapConfig;
pub use controller::MapController;
pub use domain::Mode;
pub use error::{FetchError, LoadError, MapError};
pub use facility::{Facility, FacilityCollection};
pub use selection::{EmptySelection, Selection, SelectionAction};
