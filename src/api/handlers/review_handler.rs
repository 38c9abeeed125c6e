//! Review handlers.

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
use crate::domain::Review;
use crate::errors::AppResult;
use crate::infra::repositories::ReviewFilter;
use crate::services::ReviewRequest;
use crate::types::{ApiResponse, Created, PaginationParams};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequest {
    pub appointment_id: Uuid,
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    #[schema(example = 5, minimum = 1, maximum = 5)]
    pub rating: i32,
    #[validate(length(max = 1000))]
    pub comment: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ReviewQuery {
    pub salon_id: Option<Uuid>,
    pub staff_id: Option<Uuid>,
}

pub fn review_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_reviews).post(create_review))
        .route("/:id", get(get_review))
}

/// Review a completed appointment (customers)
#[utoipa::path(
    post,
    path = "/api/v1/reviews",
    tag = "Reviews",
    request_body = CreateReviewRequest,
    responses(
        (status = 201, description = "Review created", body = Review),
        (status = 400, description = "Appointment is not completed"),
        (status = 403, description = "Not your appointment"),
        (status = 409, description = "Appointment already reviewed")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_review(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidatedJson(payload): ValidatedJson<CreateReviewRequest>,
) -> AppResult<Created<Review>> {
    let request = ReviewRequest {
        appointment_id: payload.appointment_id,
        rating: payload.rating,
        comment: payload.comment,
    };
    let review = state.services.reviews().create(user.actor(), request).await?;
    Ok(Created::new("Review created successfully", review))
}

#[utoipa::path(
    get,
    path = "/api/v1/reviews",
    tag = "Reviews",
    params(ReviewQuery, PaginationParams),
    responses((status = 200, description = "Reviews retrieved", body = [Review]))
)]
pub async fn list_reviews(
    State(state): State<AppState>,
    Query(query): Query<ReviewQuery>,
    Query(page): Query<PaginationParams>,
) -> AppResult<ApiResponse<Vec<Review>>> {
    let filter = ReviewFilter {
        salon_id: query.salon_id,
        staff_id: query.staff_id,
    };
    let reviews = state.services.reviews().list(filter, page).await?;
    Ok(ApiResponse::paginated("Reviews retrieved successfully", reviews))
}

#[utoipa::path(
    get,
    path = "/api/v1/reviews/{id}",
    tag = "Reviews",
    params(("id" = Uuid, Path, description = "Review ID")),
    responses(
        (status = 200, description = "Review found", body = Review),
        (status = 404, description = "Review not found")
    )
)]
pub async fn get_review(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<Review>> {
    let review = state.services.reviews().get(id).await?;
    Ok(ApiResponse::ok("Review retrieved successfully", review))
}
