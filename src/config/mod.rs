//! Application configuration module
//!
//! Settings come from the environment (with `.env` support); fixed
//! limits and defaults live in `constants`.

mod constants;
mod settings;

pub use constants::*;
pub use settings::Config;
