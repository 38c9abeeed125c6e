//! Counter handlers.

use axum::{
    extract::{Path, Query, State},
    routing::{delete, get},
    Router,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::Counter;
use crate::errors::AppResult;
use crate::types::{ApiResponse, Created};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCounterRequest {
    pub salon_id: Uuid,
    #[validate(length(min = 1, max = 100, message = "Counter name is required"))]
    #[schema(example = "Chair 1")]
    pub name: String,
    /// Unique among the salon's counters
    #[validate(length(max = 20))]
    #[schema(example = "C1")]
    pub code: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct CounterQuery {
    pub salon_id: Uuid,
}

pub fn counter_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_counters).post(create_counter))
        .route("/:id", delete(delete_counter))
}

#[utoipa::path(
    post,
    path = "/api/v1/counters",
    tag = "Counters",
    request_body = CreateCounterRequest,
    responses(
        (status = 201, description = "Counter created", body = Counter),
        (status = 409, description = "Code already used in this salon")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_counter(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidatedJson(payload): ValidatedJson<CreateCounterRequest>,
) -> AppResult<Created<Counter>> {
    let counter = state
        .services
        .counters()
        .create(user.actor(), payload.salon_id, payload.name, payload.code)
        .await?;
    Ok(Created::new("Counter created successfully", counter))
}

/// Counters of one salon
#[utoipa::path(
    get,
    path = "/api/v1/counters",
    tag = "Counters",
    params(CounterQuery),
    responses((status = 200, description = "Counters retrieved", body = [Counter]))
)]
pub async fn list_counters(
    State(state): State<AppState>,
    Query(query): Query<CounterQuery>,
) -> AppResult<ApiResponse<Vec<Counter>>> {
    let counters = state.services.counters().list(query.salon_id).await?;
    Ok(ApiResponse::ok("Counters retrieved successfully", counters))
}

#[utoipa::path(
    delete,
    path = "/api/v1/counters/{id}",
    tag = "Counters",
    params(("id" = Uuid, Path, description = "Counter ID")),
    responses((status = 200, description = "Counter deleted")),
    security(("bearer_auth" = []))
)]
pub async fn delete_counter(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<()>> {
    state.services.counters().delete(user.actor(), id).await?;
    Ok(ApiResponse::message("Counter deleted successfully"))
}
