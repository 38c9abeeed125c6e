//! Command-line interface.
//!
//! - `serve` - start the HTTP server
//! - `migrate` - database migrations

pub mod args;

pub use args::{Cli, Commands};
