use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::Lifecycle;

string_enum! {
    pub enum StaffStatus {
        Available => "AVAILABLE",
        Busy => "BUSY",
        OnLeave => "ON_LEAVE",
        Inactive => "INACTIVE",
    }
}

/// Staff profile: one user working at exactly one salon.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Staff {
    pub id: Uuid,
    pub user_id: Uuid,
    pub salon_id: Uuid,
    pub speciality: Option<String>,
    pub experience: Option<i32>,
    pub bio: Option<String>,
    pub status: StaffStatus,
    pub rating: f64,
    pub total_reviews: i32,
    /// Services this staff member performs
    pub service_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip)]
    pub lifecycle: Lifecycle,
}

#[derive(Debug, Clone)]
pub struct NewStaff {
    pub user_id: Uuid,
    pub salon_id: Uuid,
    pub speciality: Option<String>,
    pub experience: Option<i32>,
    pub bio: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct StaffChanges {
    pub speciality: Option<String>,
    pub experience: Option<i32>,
    pub bio: Option<String>,
    pub status: Option<StaffStatus>,
}
