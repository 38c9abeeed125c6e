//! Staff handlers.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{NewStaff, Staff, StaffChanges, StaffStatus};
use crate::errors::AppResult;
use crate::infra::repositories::StaffFilter;
use crate::types::{ApiResponse, Created, PaginationParams};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddStaffRequest {
    /// An existing active customer account
    pub user_id: Uuid,
    pub salon_id: Uuid,
    #[validate(length(max = 100))]
    pub speciality: Option<String>,
    /// Years of experience
    #[validate(range(min = 0, max = 80))]
    pub experience: Option<i32>,
    pub bio: Option<String>,
    #[serde(default)]
    pub service_ids: Vec<Uuid>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStaffRequest {
    #[validate(length(max = 100))]
    pub speciality: Option<String>,
    #[validate(range(min = 0, max = 80))]
    pub experience: Option<i32>,
    pub bio: Option<String>,
    pub status: Option<StaffStatus>,
    /// Replaces the linked services when present
    pub service_ids: Option<Vec<Uuid>>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct StaffQuery {
    pub salon_id: Option<Uuid>,
    pub status: Option<StaffStatus>,
}

pub fn staff_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_staff).post(add_staff))
        .route("/:id", get(get_staff).patch(update_staff).delete(remove_staff))
}

/// Promote a customer to staff of an owned salon
#[utoipa::path(
    post,
    path = "/api/v1/staff",
    tag = "Staff",
    request_body = AddStaffRequest,
    responses(
        (status = 201, description = "Staff member added", body = Staff),
        (status = 409, description = "User is already staff or holds another role")
    ),
    security(("bearer_auth" = []))
)]
pub async fn add_staff(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidatedJson(payload): ValidatedJson<AddStaffRequest>,
) -> AppResult<Created<Staff>> {
    let staff = NewStaff {
        user_id: payload.user_id,
        salon_id: payload.salon_id,
        speciality: payload.speciality,
        experience: payload.experience,
        bio: payload.bio,
    };
    let staff = state
        .services
        .staff()
        .add(user.actor(), staff, payload.service_ids)
        .await?;
    Ok(Created::new("Staff member added successfully", staff))
}

#[utoipa::path(
    get,
    path = "/api/v1/staff",
    tag = "Staff",
    params(StaffQuery, PaginationParams),
    responses((status = 200, description = "Staff retrieved", body = [Staff]))
)]
pub async fn list_staff(
    State(state): State<AppState>,
    Query(query): Query<StaffQuery>,
    Query(page): Query<PaginationParams>,
) -> AppResult<ApiResponse<Vec<Staff>>> {
    let filter = StaffFilter {
        salon_id: query.salon_id,
        status: query.status,
    };
    let staff = state.services.staff().list(filter, page).await?;
    Ok(ApiResponse::paginated("Staff retrieved successfully", staff))
}

#[utoipa::path(
    get,
    path = "/api/v1/staff/{id}",
    tag = "Staff",
    params(("id" = Uuid, Path, description = "Staff ID")),
    responses(
        (status = 200, description = "Staff member found", body = Staff),
        (status = 404, description = "Staff member not found")
    )
)]
pub async fn get_staff(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<Staff>> {
    let staff = state.services.staff().get(id).await?;
    Ok(ApiResponse::ok("Staff member retrieved successfully", staff))
}

#[utoipa::path(
    patch,
    path = "/api/v1/staff/{id}",
    tag = "Staff",
    params(("id" = Uuid, Path, description = "Staff ID")),
    request_body = UpdateStaffRequest,
    responses((status = 200, description = "Staff member updated", body = Staff)),
    security(("bearer_auth" = []))
)]
pub async fn update_staff(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateStaffRequest>,
) -> AppResult<ApiResponse<Staff>> {
    let changes = StaffChanges {
        speciality: payload.speciality,
        experience: payload.experience,
        bio: payload.bio,
        status: payload.status,
    };
    let staff = state
        .services
        .staff()
        .update(user.actor(), id, changes, payload.service_ids)
        .await?;
    Ok(ApiResponse::ok("Staff member updated successfully", staff))
}

/// Remove a staff member; the account goes back to CUSTOMER
#[utoipa::path(
    delete,
    path = "/api/v1/staff/{id}",
    tag = "Staff",
    params(("id" = Uuid, Path, description = "Staff ID")),
    responses((status = 200, description = "Staff member removed")),
    security(("bearer_auth" = []))
)]
pub async fn remove_staff(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<()>> {
    state.services.staff().remove(user.actor(), id).await?;
    Ok(ApiResponse::message("Staff member removed successfully"))
}
