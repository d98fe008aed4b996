pub mod matching;
pub mod output;
pub mod prompts;
pub mod spinner;

pub use matching::{Resolution, resolve};
pub use spinner::{Spinner, with_spinner};
