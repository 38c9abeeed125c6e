//! Payment handlers.

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
use crate::domain::{Payment, PaymentMethod, PaymentStatus, RecordFilter};
use crate::errors::AppResult;
use crate::services::PaymentRequest;
use crate::types::{ApiResponse, Created, PaginationParams};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentRequest {
    pub appointment_id: Uuid,
    /// Defaults to the booked service's price
    #[validate(range(exclusive_min = 0.0, message = "Amount must be greater than zero"))]
    pub amount: Option<f64>,
    pub payment_method: PaymentMethod,
    /// Defaults to PENDING
    pub status: Option<PaymentStatus>,
    #[validate(length(max = 100))]
    pub transaction_id: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PaymentQuery {
    pub status: Option<PaymentStatus>,
    pub salon_id: Option<Uuid>,
}

pub fn payment_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_payments).post(create_payment))
        .route("/:id", get(get_payment))
}

/// Record the payment of an appointment
#[utoipa::path(
    post,
    path = "/api/v1/payments",
    tag = "Payments",
    request_body = CreatePaymentRequest,
    responses(
        (status = 201, description = "Payment recorded", body = Payment),
        (status = 404, description = "Appointment not found"),
        (status = 409, description = "Appointment already has a payment")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_payment(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidatedJson(payload): ValidatedJson<CreatePaymentRequest>,
) -> AppResult<Created<Payment>> {
    let request = PaymentRequest {
        appointment_id: payload.appointment_id,
        amount: payload.amount,
        payment_method: payload.payment_method,
        status: payload.status,
        transaction_id: payload.transaction_id,
    };
    let payment = state.services.payments().create(user.actor(), request).await?;
    Ok(Created::new("Payment created successfully", payment))
}

/// Payments visible to the caller's role
#[utoipa::path(
    get,
    path = "/api/v1/payments",
    tag = "Payments",
    params(PaymentQuery, PaginationParams),
    responses((status = 200, description = "Payments retrieved", body = [Payment])),
    security(("bearer_auth" = []))
)]
pub async fn list_payments(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<PaymentQuery>,
    Query(page): Query<PaginationParams>,
) -> AppResult<ApiResponse<Vec<Payment>>> {
    let filter = RecordFilter {
        status: query.status,
        salon_id: query.salon_id,
    };
    let payments = state
        .services
        .payments()
        .list(user.actor(), filter, page)
        .await?;
    Ok(ApiResponse::paginated("Payments retrieved successfully", payments))
}

#[utoipa::path(
    get,
    path = "/api/v1/payments/{id}",
    tag = "Payments",
    params(("id" = Uuid, Path, description = "Payment ID")),
    responses(
        (status = 200, description = "Payment found", body = Payment),
        (status = 404, description = "Not found or not visible to the caller")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_payment(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<Payment>> {
    let payment = state.services.payments().get(user.actor(), id).await?;
    Ok(ApiResponse::ok("Payment retrieved successfully", payment))
}
