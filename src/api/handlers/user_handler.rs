//! User administration handlers.

use axum::{
    extract::{Path, Query, State},
    routing::{get, patch},
    Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{Gender, ProfileChanges, Role, UserResponse, UserStatus, PHONE_PATTERN};
use crate::errors::AppResult;
use crate::infra::repositories::UserFilter;
use crate::types::{ApiResponse, PaginationParams};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserQuery {
    /// Matches name, email or phone
    pub search: Option<String>,
    pub role: Option<Role>,
    pub status: Option<UserStatus>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(regex(path = *PHONE_PATTERN, message = "Invalid phone number"))]
    pub phone: Option<String>,
    pub gender: Option<Gender>,
    pub date_of_birth: Option<NaiveDate>,
    #[validate(length(max = 255))]
    pub address: Option<String>,
    #[validate(url(message = "Profile photo must be a URL"))]
    pub profile_photo: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateStatusRequest {
    pub status: UserStatus,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateRoleRequest {
    pub role: Role,
}

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route("/:id", get(get_user).patch(update_user).delete(delete_user))
        .route("/:id/status", patch(update_status))
        .route("/:id/role", patch(update_role))
}

/// List users (admin)
#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "Users",
    params(UserQuery, PaginationParams),
    responses(
        (status = 200, description = "Users retrieved", body = [UserResponse]),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_users(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<UserQuery>,
    Query(page): Query<PaginationParams>,
) -> AppResult<ApiResponse<Vec<UserResponse>>> {
    let filter = UserFilter {
        search: query.search,
        role: query.role,
        status: query.status,
    };
    let users = state.services.users().list(user.actor(), filter, page).await?;
    Ok(ApiResponse::paginated("Users retrieved successfully", users))
}

/// Get a user (self or admin)
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 403, description = "Not your account"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_user(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<UserResponse>> {
    let found = state.services.users().get(user.actor(), id).await?;
    Ok(ApiResponse::ok("User retrieved successfully", found))
}

/// Update profile fields (self or admin)
#[utoipa::path(
    patch,
    path = "/api/v1/users/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 403, description = "Not your account")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_user(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateProfileRequest>,
) -> AppResult<ApiResponse<UserResponse>> {
    let changes = ProfileChanges {
        name: payload.name,
        phone: payload.phone,
        gender: payload.gender,
        date_of_birth: payload.date_of_birth,
        address: payload.address,
        profile_photo: payload.profile_photo,
    };
    let updated = state
        .services
        .users()
        .update_profile(user.actor(), id, changes)
        .await?;
    Ok(ApiResponse::ok("User updated successfully", updated))
}

/// Change account status (admin)
#[utoipa::path(
    patch,
    path = "/api/v1/users/{id}/status",
    tag = "Users",
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = UpdateStatusRequest,
    responses((status = 200, description = "Status updated", body = UserResponse)),
    security(("bearer_auth" = []))
)]
pub async fn update_status(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateStatusRequest>,
) -> AppResult<ApiResponse<UserResponse>> {
    let updated = state
        .services
        .users()
        .set_status(user.actor(), id, payload.status)
        .await?;
    Ok(ApiResponse::ok("User status updated successfully", updated))
}

/// Change role (admin); creates the owner or admin profile when missing
#[utoipa::path(
    patch,
    path = "/api/v1/users/{id}/role",
    tag = "Users",
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = UpdateRoleRequest,
    responses((status = 200, description = "Role updated", body = UserResponse)),
    security(("bearer_auth" = []))
)]
pub async fn update_role(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateRoleRequest>,
) -> AppResult<ApiResponse<UserResponse>> {
    let updated = state
        .services
        .users()
        .set_role(user.actor(), id, payload.role)
        .await?;
    Ok(ApiResponse::ok("User role updated successfully", updated))
}

/// Soft delete a user (admin)
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_user(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<()>> {
    state.services.users().delete(user.actor(), id).await?;
    Ok(ApiResponse::message("User deleted successfully"))
}
