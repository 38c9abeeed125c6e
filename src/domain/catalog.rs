//! Services a salon offers.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::Lifecycle;

string_enum! {
    pub enum ServiceCategory {
        Haircut => "HAIRCUT",
        Styling => "STYLING",
        Coloring => "COLORING",
        Treatment => "TREATMENT",
        Spa => "SPA",
        Facial => "FACIAL",
        Manicure => "MANICURE",
        Pedicure => "PEDICURE",
        Makeup => "MAKEUP",
        Waxing => "WAXING",
        Massage => "MASSAGE",
        Other => "OTHER",
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SalonService {
    pub id: Uuid,
    pub salon_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: ServiceCategory,
    pub price: f64,
    /// Duration in minutes
    pub duration: i32,
    pub images: Vec<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip)]
    pub lifecycle: Lifecycle,
}

impl SalonService {
    pub fn is_bookable(&self) -> bool {
        self.lifecycle.is_active() && self.is_active
    }
}

#[derive(Debug, Clone)]
pub struct NewSalonService {
    pub salon_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: ServiceCategory,
    pub price: f64,
    pub duration: i32,
    pub images: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct SalonServiceChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<ServiceCategory>,
    pub price: Option<f64>,
    pub duration: Option<i32>,
    pub images: Option<Vec<String>>,
    pub is_active: Option<bool>,
}
