//! Salon owner application handlers.

use axum::{
    extract::{Path, Query, State},
    routing::{get, patch, post},
    Router,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{ApplicationStatus, BusinessDetails, SalonOwner, PHONE_PATTERN};
use crate::errors::AppResult;
use crate::infra::repositories::ApplicationFilter;
use crate::types::{ApiResponse, Created, PaginationParams};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplyRequest {
    #[validate(length(min = 1, max = 150))]
    #[schema(example = "Shear Bliss")]
    pub business_name: Option<String>,
    #[validate(length(max = 255))]
    pub business_address: Option<String>,
    #[validate(regex(path = *PHONE_PATTERN, message = "Invalid phone number"))]
    pub business_phone: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub business_email: Option<String>,
    #[validate(url(message = "Document must be a URL"))]
    pub document_url: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RejectRequest {
    #[validate(length(min = 5, message = "Rejection reason must be at least 5 characters"))]
    pub reason: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ApplicationQuery {
    pub status: Option<ApplicationStatus>,
    /// Matches business name or email
    pub search: Option<String>,
}

pub fn application_routes() -> Router<AppState> {
    Router::new()
        .route("/apply", post(apply))
        .route("/me", get(my_application))
        .route("/applications", get(list_applications))
        .route("/applications/:id", get(get_application))
        .route("/applications/:id/approve", patch(approve))
        .route("/applications/:id/reject", patch(reject))
}

/// Apply to become a salon owner (customers)
#[utoipa::path(
    post,
    path = "/api/v1/become-salon-owner/apply",
    tag = "Salon Owner Applications",
    request_body = ApplyRequest,
    responses(
        (status = 201, description = "Application submitted", body = SalonOwner),
        (status = 409, description = "An application is pending or approved")
    ),
    security(("bearer_auth" = []))
)]
pub async fn apply(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidatedJson(payload): ValidatedJson<ApplyRequest>,
) -> AppResult<Created<SalonOwner>> {
    let details = BusinessDetails {
        business_name: payload.business_name,
        business_address: payload.business_address,
        business_phone: payload.business_phone,
        business_email: payload.business_email,
        document_url: payload.document_url,
    };
    let application = state
        .services
        .applications()
        .apply(user.actor(), details)
        .await?;
    Ok(Created::new("Application submitted successfully", application))
}

/// The caller's own application
#[utoipa::path(
    get,
    path = "/api/v1/become-salon-owner/me",
    tag = "Salon Owner Applications",
    responses(
        (status = 200, description = "Application found", body = SalonOwner),
        (status = 404, description = "No application")
    ),
    security(("bearer_auth" = []))
)]
pub async fn my_application(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<ApiResponse<SalonOwner>> {
    let application = state.services.applications().mine(user.actor()).await?;
    Ok(ApiResponse::ok("Application retrieved successfully", application))
}

/// List applications (admin)
#[utoipa::path(
    get,
    path = "/api/v1/become-salon-owner/applications",
    tag = "Salon Owner Applications",
    params(ApplicationQuery, PaginationParams),
    responses((status = 200, description = "Applications retrieved", body = [SalonOwner])),
    security(("bearer_auth" = []))
)]
pub async fn list_applications(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<ApplicationQuery>,
    Query(page): Query<PaginationParams>,
) -> AppResult<ApiResponse<Vec<SalonOwner>>> {
    let filter = ApplicationFilter {
        status: query.status,
        search: query.search,
    };
    let applications = state
        .services
        .applications()
        .list(user.actor(), filter, page)
        .await?;
    Ok(ApiResponse::paginated("Applications retrieved successfully", applications))
}

/// Get one application (admin)
#[utoipa::path(
    get,
    path = "/api/v1/become-salon-owner/applications/{id}",
    tag = "Salon Owner Applications",
    params(("id" = Uuid, Path, description = "Application ID")),
    responses(
        (status = 200, description = "Application found", body = SalonOwner),
        (status = 404, description = "Application not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_application(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<SalonOwner>> {
    let application = state.services.applications().get(user.actor(), id).await?;
    Ok(ApiResponse::ok("Application retrieved successfully", application))
}

/// Approve a pending application (admin)
#[utoipa::path(
    patch,
    path = "/api/v1/become-salon-owner/applications/{id}/approve",
    tag = "Salon Owner Applications",
    params(("id" = Uuid, Path, description = "Application ID")),
    responses(
        (status = 200, description = "Application approved", body = SalonOwner),
        (status = 400, description = "Application is not pending")
    ),
    security(("bearer_auth" = []))
)]
pub async fn approve(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<SalonOwner>> {
    let application = state
        .services
        .applications()
        .approve(user.actor(), id)
        .await?;
    Ok(ApiResponse::ok("Application approved successfully", application))
}

/// Reject a pending application (admin)
#[utoipa::path(
    patch,
    path = "/api/v1/become-salon-owner/applications/{id}/reject",
    tag = "Salon Owner Applications",
    params(("id" = Uuid, Path, description = "Application ID")),
    request_body = RejectRequest,
    responses(
        (status = 200, description = "Application rejected", body = SalonOwner),
        (status = 400, description = "Application is not pending or reason too short")
    ),
    security(("bearer_auth" = []))
)]
pub async fn reject(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<RejectRequest>,
) -> AppResult<ApiResponse<SalonOwner>> {
    let application = state
        .services
        .applications()
        .reject(user.actor(), id, payload.reason)
        .await?;
    Ok(ApiResponse::ok("Application rejected", application))
}
