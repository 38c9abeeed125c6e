//! SeaORM entity definitions
//!
//! Database-specific models, separate from domain types. Enums are stored
//! as text and parsed back on the way out.

use std::str::FromStr;

use sea_orm::prelude::Json;

use crate::errors::{AppError, AppResult};

pub mod admin;
pub mod appointment;
pub mod counter;
pub mod payment;
pub mod review;
pub mod salon;
pub mod salon_owner;
pub mod service;
pub mod staff;
pub mod staff_service;
pub mod user;

/// Parse a text column into its domain enum.
pub(crate) fn parse_column<T: FromStr>(value: &str, column: &'static str) -> AppResult<T> {
    value
        .parse()
        .map_err(|_| AppError::internal(format!("Unexpected {} value '{}' in store", column, value)))
}

pub(crate) fn images_from_json(value: Json) -> Vec<String> {
    serde_json::from_value(value).unwrap_or_default()
}

pub(crate) fn images_to_json(images: &[String]) -> Json {
    serde_json::json!(images)
}
