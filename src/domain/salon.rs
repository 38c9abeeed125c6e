use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

use super::Lifecycle;

string_enum! {
    /// Moderation status; only ACTIVE salons accept bookings
    pub enum SalonStatus {
        Active => "ACTIVE",
        Inactive => "INACTIVE",
        PendingApproval => "PENDING_APPROVAL",
        Rejected => "REJECTED",
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Salon {
    pub id: Uuid,
    /// Owning SalonOwner profile
    pub owner_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub address: String,
    pub city: String,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub phone: String,
    pub email: Option<String>,
    pub images: Vec<String>,
    #[schema(value_type = Option<Object>)]
    pub operating_hours: Option<Value>,
    pub status: SalonStatus,
    pub rating: f64,
    pub total_reviews: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip)]
    pub lifecycle: Lifecycle,
}

impl Salon {
    /// Whether the salon may take new appointments
    pub fn is_bookable(&self) -> bool {
        self.lifecycle.is_active() && self.status == SalonStatus::Active
    }
}

#[derive(Debug, Clone)]
pub struct NewSalon {
    pub owner_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub address: String,
    pub city: String,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub phone: String,
    pub email: Option<String>,
    pub images: Vec<String>,
    pub operating_hours: Option<Value>,
}

#[derive(Debug, Clone, Default)]
pub struct SalonChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub images: Option<Vec<String>>,
    pub operating_hours: Option<Value>,
}
