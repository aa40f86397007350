// Dataset loading for the terminal front end
mod fetch;

pub use fetch::{fetch_location, is_remote, load_dataset, Dataset};
