//! Salon handlers. Browsing is public; changes need an owner or admin.

use axum::{
    extract::{Path, Query, State},
    routing::{get, patch},
    Router,
};
use serde::Deserialize;
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{NewSalon, Salon, SalonChanges, SalonStatus, PHONE_PATTERN};
use crate::errors::AppResult;
use crate::infra::repositories::SalonFilter;
use crate::types::{ApiResponse, Created, PaginationParams};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSalonRequest {
    #[validate(length(min = 1, max = 150, message = "Salon name is required"))]
    #[schema(example = "Shear Bliss")]
    pub name: String,
    pub description: Option<String>,
    #[validate(length(min = 1, message = "Address is required"))]
    pub address: String,
    #[validate(length(min = 1, message = "City is required"))]
    #[schema(example = "Dhaka")]
    pub city: String,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    #[validate(regex(path = *PHONE_PATTERN, message = "Invalid phone number"))]
    pub phone: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[schema(value_type = Option<Object>)]
    pub operating_hours: Option<Value>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSalonRequest {
    #[validate(length(min = 1, max = 150))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(length(min = 1))]
    pub address: Option<String>,
    #[validate(length(min = 1))]
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    #[validate(regex(path = *PHONE_PATTERN, message = "Invalid phone number"))]
    pub phone: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    pub images: Option<Vec<String>>,
    #[schema(value_type = Option<Object>)]
    pub operating_hours: Option<Value>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SalonStatusRequest {
    pub status: SalonStatus,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SalonQuery {
    /// Matches name, description or city
    pub search: Option<String>,
    pub city: Option<String>,
    /// Defaults to ACTIVE
    pub status: Option<SalonStatus>,
}

pub fn salon_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_salons).post(create_salon))
        .route("/my-salons", get(my_salons))
        .route("/:id", get(get_salon).patch(update_salon).delete(delete_salon))
        .route("/:id/status", patch(update_salon_status))
}

/// Register a salon (salon owners); it starts as PENDING_APPROVAL
#[utoipa::path(
    post,
    path = "/api/v1/salons",
    tag = "Salons",
    request_body = CreateSalonRequest,
    responses(
        (status = 201, description = "Salon created", body = Salon),
        (status = 403, description = "Not a salon owner")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_salon(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidatedJson(payload): ValidatedJson<CreateSalonRequest>,
) -> AppResult<Created<Salon>> {
    let salon = NewSalon {
        owner_id: Uuid::nil(),
        name: payload.name,
        description: payload.description,
        address: payload.address,
        city: payload.city,
        state: payload.state,
        zip_code: payload.zip_code,
        phone: payload.phone,
        email: payload.email,
        images: payload.images,
        operating_hours: payload.operating_hours,
    };
    let salon = state.services.salons().create(user.actor(), salon).await?;
    Ok(Created::new("Salon created successfully", salon))
}

/// Browse salons
#[utoipa::path(
    get,
    path = "/api/v1/salons",
    tag = "Salons",
    params(SalonQuery, PaginationParams),
    responses((status = 200, description = "Salons retrieved", body = [Salon]))
)]
pub async fn list_salons(
    State(state): State<AppState>,
    Query(query): Query<SalonQuery>,
    Query(page): Query<PaginationParams>,
) -> AppResult<ApiResponse<Vec<Salon>>> {
    let filter = SalonFilter {
        search: query.search,
        city: query.city,
        status: query.status,
        owner_id: None,
    };
    let salons = state.services.salons().list(filter, page).await?;
    Ok(ApiResponse::paginated("Salons retrieved successfully", salons))
}

/// Salons owned by the caller
#[utoipa::path(
    get,
    path = "/api/v1/salons/my-salons",
    tag = "Salons",
    params(PaginationParams),
    responses((status = 200, description = "Salons retrieved", body = [Salon])),
    security(("bearer_auth" = []))
)]
pub async fn my_salons(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(page): Query<PaginationParams>,
) -> AppResult<ApiResponse<Vec<Salon>>> {
    let salons = state.services.salons().my_salons(user.actor(), page).await?;
    Ok(ApiResponse::paginated("Salons retrieved successfully", salons))
}

#[utoipa::path(
    get,
    path = "/api/v1/salons/{id}",
    tag = "Salons",
    params(("id" = Uuid, Path, description = "Salon ID")),
    responses(
        (status = 200, description = "Salon found", body = Salon),
        (status = 404, description = "Salon not found")
    )
)]
pub async fn get_salon(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<Salon>> {
    let salon = state.services.salons().get(id).await?;
    Ok(ApiResponse::ok("Salon retrieved successfully", salon))
}

/// Update an owned salon
#[utoipa::path(
    patch,
    path = "/api/v1/salons/{id}",
    tag = "Salons",
    params(("id" = Uuid, Path, description = "Salon ID")),
    request_body = UpdateSalonRequest,
    responses(
        (status = 200, description = "Salon updated", body = Salon),
        (status = 403, description = "Not your salon")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_salon(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateSalonRequest>,
) -> AppResult<ApiResponse<Salon>> {
    let changes = SalonChanges {
        name: payload.name,
        description: payload.description,
        address: payload.address,
        city: payload.city,
        state: payload.state,
        zip_code: payload.zip_code,
        phone: payload.phone,
        email: payload.email,
        images: payload.images,
        operating_hours: payload.operating_hours,
    };
    let salon = state
        .services
        .salons()
        .update(user.actor(), id, changes)
        .await?;
    Ok(ApiResponse::ok("Salon updated successfully", salon))
}

/// Approve, reject or deactivate a salon (admin)
#[utoipa::path(
    patch,
    path = "/api/v1/salons/{id}/status",
    tag = "Salons",
    params(("id" = Uuid, Path, description = "Salon ID")),
    request_body = SalonStatusRequest,
    responses((status = 200, description = "Status updated", body = Salon)),
    security(("bearer_auth" = []))
)]
pub async fn update_salon_status(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<SalonStatusRequest>,
) -> AppResult<ApiResponse<Salon>> {
    let salon = state
        .services
        .salons()
        .set_status(user.actor(), id, payload.status)
        .await?;
    Ok(ApiResponse::ok("Salon status updated successfully", salon))
}

/// Soft delete a salon (its owner or an admin)
#[utoipa::path(
    delete,
    path = "/api/v1/salons/{id}",
    tag = "Salons",
    params(("id" = Uuid, Path, description = "Salon ID")),
    responses(
        (status = 200, description = "Salon deleted"),
        (status = 403, description = "Not your salon")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_salon(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<()>> {
    state.services.salons().delete(user.actor(), id).await?;
    Ok(ApiResponse::message("Salon deleted successfully"))
}
