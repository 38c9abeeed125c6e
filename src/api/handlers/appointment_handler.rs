//! Appointment handlers.

use axum::{
    extract::{Path, Query, State},
    routing::{get, patch},
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{Action, Appointment, AppointmentStatus, RecordFilter, START_TIME_PATTERN};
use crate::errors::AppResult;
use crate::services::BookingRequest;
use crate::types::{ApiResponse, Created, PaginationParams};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookAppointmentRequest {
    pub salon_id: Uuid,
    pub service_id: Uuid,
    pub staff_id: Uuid,
    pub counter_id: Uuid,
    #[schema(example = "2024-01-10")]
    pub appointment_date: NaiveDate,
    #[validate(regex(path = *START_TIME_PATTERN, message = "Start time must be in HH:MM format"))]
    #[schema(example = "10:00")]
    pub start_time: String,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAppointmentStatusRequest {
    pub status: AppointmentStatus,
    /// Stored only when cancelling
    #[validate(length(max = 500))]
    pub cancellation_reason: Option<String>,
}

/// Optional body of a cancellation
#[derive(Debug, Deserialize, ToSchema)]
pub struct CancelAppointmentRequest {
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AppointmentQuery {
    pub status: Option<AppointmentStatus>,
    /// Narrows the caller's visible appointments to one salon
    pub salon_id: Option<Uuid>,
}

pub fn appointment_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_appointments).post(book_appointment))
        .route("/my-appointments", get(my_appointments))
        .route("/:id", get(get_appointment).delete(cancel_appointment))
        .route("/:id/status", patch(update_appointment_status))
}

/// Book an appointment (customers)
#[utoipa::path(
    post,
    path = "/api/v1/appointments",
    tag = "Appointments",
    request_body = BookAppointmentRequest,
    responses(
        (status = 201, description = "Appointment booked", body = Appointment),
        (status = 404, description = "Salon or service not found or inactive, or staff or counter not found"),
        (status = 409, description = "Counter or staff already booked for the slot")
    ),
    security(("bearer_auth" = []))
)]
pub async fn book_appointment(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidatedJson(payload): ValidatedJson<BookAppointmentRequest>,
) -> AppResult<Created<Appointment>> {
    let actor = user.permit(Action::BookAppointment)?;
    let request = BookingRequest {
        salon_id: payload.salon_id,
        service_id: payload.service_id,
        staff_id: payload.staff_id,
        counter_id: payload.counter_id,
        appointment_date: payload.appointment_date,
        start_time: payload.start_time,
        notes: payload.notes,
    };
    let appointment = state.services.appointments().book(actor, request).await?;
    Ok(Created::new("Appointment booked successfully", appointment))
}

/// Appointments visible to the caller's role
#[utoipa::path(
    get,
    path = "/api/v1/appointments",
    tag = "Appointments",
    params(AppointmentQuery, PaginationParams),
    responses((status = 200, description = "Appointments retrieved", body = [Appointment])),
    security(("bearer_auth" = []))
)]
pub async fn list_appointments(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<AppointmentQuery>,
    Query(page): Query<PaginationParams>,
) -> AppResult<ApiResponse<Vec<Appointment>>> {
    let filter = RecordFilter {
        status: query.status,
        salon_id: query.salon_id,
    };
    let appointments = state
        .services
        .appointments()
        .list(user.actor(), filter, page)
        .await?;
    Ok(ApiResponse::paginated("Appointments retrieved successfully", appointments))
}

/// The caller's own bookings (customers)
#[utoipa::path(
    get,
    path = "/api/v1/appointments/my-appointments",
    tag = "Appointments",
    params(AppointmentQuery, PaginationParams),
    responses((status = 200, description = "Appointments retrieved", body = [Appointment])),
    security(("bearer_auth" = []))
)]
pub async fn my_appointments(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<AppointmentQuery>,
    Query(page): Query<PaginationParams>,
) -> AppResult<ApiResponse<Vec<Appointment>>> {
    let appointments = state
        .services
        .appointments()
        .my_appointments(user.actor(), query.status, page)
        .await?;
    Ok(ApiResponse::paginated("Appointments retrieved successfully", appointments))
}

#[utoipa::path(
    get,
    path = "/api/v1/appointments/{id}",
    tag = "Appointments",
    params(("id" = Uuid, Path, description = "Appointment ID")),
    responses(
        (status = 200, description = "Appointment found", body = Appointment),
        (status = 404, description = "Not found or not visible to the caller")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_appointment(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<Appointment>> {
    let appointment = state.services.appointments().get(user.actor(), id).await?;
    Ok(ApiResponse::ok("Appointment retrieved successfully", appointment))
}

/// Move an appointment through its status machine
#[utoipa::path(
    patch,
    path = "/api/v1/appointments/{id}/status",
    tag = "Appointments",
    params(("id" = Uuid, Path, description = "Appointment ID")),
    request_body = UpdateAppointmentStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = Appointment),
        (status = 403, description = "Transition not allowed for the caller")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_appointment_status(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateAppointmentStatusRequest>,
) -> AppResult<ApiResponse<Appointment>> {
    let appointment = state
        .services
        .appointments()
        .update_status(user.actor(), id, payload.status, payload.cancellation_reason)
        .await?;
    Ok(ApiResponse::ok("Appointment status updated successfully", appointment))
}

/// Cancel one of the caller's bookings
#[utoipa::path(
    delete,
    path = "/api/v1/appointments/{id}",
    tag = "Appointments",
    params(("id" = Uuid, Path, description = "Appointment ID")),
    request_body = CancelAppointmentRequest,
    responses(
        (status = 200, description = "Appointment cancelled", body = Appointment),
        (status = 403, description = "Not yours, or already completed or cancelled")
    ),
    security(("bearer_auth" = []))
)]
pub async fn cancel_appointment(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    payload: Option<Json<CancelAppointmentRequest>>,
) -> AppResult<ApiResponse<Appointment>> {
    let reason = payload.and_then(|Json(body)| body.reason);
    let appointment = state
        .services
        .appointments()
        .cancel(user.actor(), id, reason)
        .await?;
    Ok(ApiResponse::ok("Appointment cancelled successfully", appointment))
}
