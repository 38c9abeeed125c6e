//! Salon Booking API
//!
//! Back-end for a salon marketplace: customers discover salons and book
//! appointments against staff members and physical counters, salon owners
//! run their salons, and administrators approve owners and oversee the
//! platform.
//!
//! # Architecture Layers
//!
//! - **cli** / **commands**: command-line entry points
//! - **config**: environment configuration and constants
//! - **domain**: entities, roles, record scopes and the appointment state machine
//! - **services**: use cases, authorization and transactions
//! - **infra**: SeaORM persistence, migrations and the Redis cache
//! - **api**: Axum handlers, middleware and routes
//! - **types**: pagination and response envelopes
//! - **errors**: the error type mapped onto HTTP responses
//!
//! # CLI Usage
//!
//! ```bash
//! salon-booking-api serve --port 5000
//! salon-booking-api migrate up
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

pub use api::AppState;
pub use config::Config;
pub use domain::{Password, Role, User};
pub use errors::{AppError, AppResult};
pub use infra::Cache;
