pub mod browser;

pub use browser::{BrowserState, FilterField, run_browser};
