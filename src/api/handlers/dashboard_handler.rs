//! Dashboard statistics handlers.

use axum::{extract::State, routing::get, Router};

use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::errors::AppResult;
use crate::services::{AdminStats, CustomerStats, OwnerStats};
use crate::types::ApiResponse;

pub fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/admin", get(admin_stats))
        .route("/salon-owner", get(salon_owner_stats))
        .route("/customer", get(customer_stats))
}

#[utoipa::path(
    get,
    path = "/api/v1/dashboard-stats/admin",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Platform statistics", body = AdminStats),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = []))
)]
pub async fn admin_stats(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<ApiResponse<AdminStats>> {
    let stats = state.services.dashboard().admin(user.actor()).await?;
    Ok(ApiResponse::ok("Admin dashboard stats retrieved successfully", stats))
}

#[utoipa::path(
    get,
    path = "/api/v1/dashboard-stats/salon-owner",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Statistics over the caller's salons", body = OwnerStats),
        (status = 403, description = "Salon owners only")
    ),
    security(("bearer_auth" = []))
)]
pub async fn salon_owner_stats(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<ApiResponse<OwnerStats>> {
    let stats = state.services.dashboard().salon_owner(user.actor()).await?;
    Ok(ApiResponse::ok("Salon owner dashboard stats retrieved successfully", stats))
}

#[utoipa::path(
    get,
    path = "/api/v1/dashboard-stats/customer",
    tag = "Dashboard",
    responses(
        (status = 200, description = "The caller's booking statistics", body = CustomerStats),
        (status = 403, description = "Customers only")
    ),
    security(("bearer_auth" = []))
)]
pub async fn customer_stats(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<ApiResponse<CustomerStats>> {
    let stats = state.services.dashboard().customer(user.actor()).await?;
    Ok(ApiResponse::ok("Customer dashboard stats retrieved successfully", stats))
}
