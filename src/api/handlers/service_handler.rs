//! Handlers for the services a salon offers.

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
use crate::domain::{NewSalonService, SalonService, SalonServiceChanges, ServiceCategory};
use crate::errors::AppResult;
use crate::infra::repositories::ServiceFilter;
use crate::types::{ApiResponse, Created, PaginationParams};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateServiceRequest {
    pub salon_id: Uuid,
    #[validate(length(min = 1, max = 150, message = "Service name is required"))]
    #[schema(example = "Classic haircut")]
    pub name: String,
    pub description: Option<String>,
    pub category: ServiceCategory,
    #[validate(range(exclusive_min = 0.0, message = "Price must be greater than zero"))]
    #[schema(example = 25.0)]
    pub price: f64,
    /// Minutes
    #[validate(range(min = 1, message = "Duration must be at least one minute"))]
    #[schema(example = 30)]
    pub duration: i32,
    #[serde(default)]
    pub images: Vec<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateServiceRequest {
    #[validate(length(min = 1, max = 150))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<ServiceCategory>,
    #[validate(range(exclusive_min = 0.0, message = "Price must be greater than zero"))]
    pub price: Option<f64>,
    #[validate(range(min = 1, message = "Duration must be at least one minute"))]
    pub duration: Option<i32>,
    pub images: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ServiceQuery {
    /// Matches name or description
    pub search: Option<String>,
    pub salon_id: Option<Uuid>,
    pub category: Option<ServiceCategory>,
}

pub fn service_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_services).post(create_service))
        .route(
            "/:id",
            get(get_service).patch(update_service).delete(delete_service),
        )
}

/// Add a service to an owned salon
#[utoipa::path(
    post,
    path = "/api/v1/services",
    tag = "Services",
    request_body = CreateServiceRequest,
    responses(
        (status = 201, description = "Service created", body = SalonService),
        (status = 403, description = "Not your salon")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_service(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidatedJson(payload): ValidatedJson<CreateServiceRequest>,
) -> AppResult<Created<SalonService>> {
    let service = NewSalonService {
        salon_id: payload.salon_id,
        name: payload.name,
        description: payload.description,
        category: payload.category,
        price: payload.price,
        duration: payload.duration,
        images: payload.images,
    };
    let service = state.services.catalog().create(user.actor(), service).await?;
    Ok(Created::new("Service created successfully", service))
}

/// Browse active services
#[utoipa::path(
    get,
    path = "/api/v1/services",
    tag = "Services",
    params(ServiceQuery, PaginationParams),
    responses((status = 200, description = "Services retrieved", body = [SalonService]))
)]
pub async fn list_services(
    State(state): State<AppState>,
    Query(query): Query<ServiceQuery>,
    Query(page): Query<PaginationParams>,
) -> AppResult<ApiResponse<Vec<SalonService>>> {
    let filter = ServiceFilter {
        search: query.search,
        salon_id: query.salon_id,
        category: query.category,
        include_inactive: false,
    };
    let services = state.services.catalog().list(filter, page).await?;
    Ok(ApiResponse::paginated("Services retrieved successfully", services))
}

#[utoipa::path(
    get,
    path = "/api/v1/services/{id}",
    tag = "Services",
    params(("id" = Uuid, Path, description = "Service ID")),
    responses(
        (status = 200, description = "Service found", body = SalonService),
        (status = 404, description = "Service not found")
    )
)]
pub async fn get_service(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<SalonService>> {
    let service = state.services.catalog().get(id).await?;
    Ok(ApiResponse::ok("Service retrieved successfully", service))
}

#[utoipa::path(
    patch,
    path = "/api/v1/services/{id}",
    tag = "Services",
    params(("id" = Uuid, Path, description = "Service ID")),
    request_body = UpdateServiceRequest,
    responses((status = 200, description = "Service updated", body = SalonService)),
    security(("bearer_auth" = []))
)]
pub async fn update_service(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateServiceRequest>,
) -> AppResult<ApiResponse<SalonService>> {
    let changes = SalonServiceChanges {
        name: payload.name,
        description: payload.description,
        category: payload.category,
        price: payload.price,
        duration: payload.duration,
        images: payload.images,
        is_active: payload.is_active,
    };
    let service = state
        .services
        .catalog()
        .update(user.actor(), id, changes)
        .await?;
    Ok(ApiResponse::ok("Service updated successfully", service))
}

#[utoipa::path(
    delete,
    path = "/api/v1/services/{id}",
    tag = "Services",
    params(("id" = Uuid, Path, description = "Service ID")),
    responses((status = 200, description = "Service deleted")),
    security(("bearer_auth" = []))
)]
pub async fn delete_service(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<()>> {
    state.services.catalog().delete(user.actor(), id).await?;
    Ok(ApiResponse::message("Service deleted successfully"))
}
