//! OpenAPI documentation configuration.
//!
//! Served through Swagger UI at `/swagger-ui`.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{
    application_handler, appointment_handler, auth_handler, counter_handler, dashboard_handler,
    payment_handler, review_handler, salon_handler, service_handler, staff_handler, user_handler,
};
use crate::domain::{
    AdminProfile, ApplicationStatus, Appointment, AppointmentStatus, Counter, Gender, Payment,
    PaymentMethod, PaymentStatus, Review, Role, Salon, SalonOwner, SalonService, SalonStatus,
    ServiceCategory, Staff, StaffStatus, UserResponse, UserStatus,
};
use crate::services::{
    AccountProfile, AdminStats, CustomerStats, OwnerStats, StatusCount, TokenPair,
};
use crate::types::PaginationMeta;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Salon Booking API",
        version = "0.1.0",
        description = "Salon discovery, staff and counter management, appointment booking with slot conflict detection, payments and reviews",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:5000", description = "Local development server")
    ),
    paths(
        auth_handler::register,
        auth_handler::login,
        auth_handler::refresh_token,
        auth_handler::logout,
        auth_handler::change_password,
        auth_handler::me,
        user_handler::list_users,
        user_handler::get_user,
        user_handler::update_user,
        user_handler::update_status,
        user_handler::update_role,
        user_handler::delete_user,
        application_handler::apply,
        application_handler::my_application,
        application_handler::list_applications,
        application_handler::get_application,
        application_handler::approve,
        application_handler::reject,
        salon_handler::create_salon,
        salon_handler::list_salons,
        salon_handler::my_salons,
        salon_handler::get_salon,
        salon_handler::update_salon,
        salon_handler::update_salon_status,
        salon_handler::delete_salon,
        service_handler::create_service,
        service_handler::list_services,
        service_handler::get_service,
        service_handler::update_service,
        service_handler::delete_service,
        staff_handler::add_staff,
        staff_handler::list_staff,
        staff_handler::get_staff,
        staff_handler::update_staff,
        staff_handler::remove_staff,
        counter_handler::create_counter,
        counter_handler::list_counters,
        counter_handler::delete_counter,
        appointment_handler::book_appointment,
        appointment_handler::list_appointments,
        appointment_handler::my_appointments,
        appointment_handler::get_appointment,
        appointment_handler::update_appointment_status,
        appointment_handler::cancel_appointment,
        payment_handler::create_payment,
        payment_handler::list_payments,
        payment_handler::get_payment,
        review_handler::create_review,
        review_handler::list_reviews,
        review_handler::get_review,
        dashboard_handler::admin_stats,
        dashboard_handler::salon_owner_stats,
        dashboard_handler::customer_stats,
    ),
    components(
        schemas(
            // Domain types
            Role,
            UserStatus,
            Gender,
            UserResponse,
            ApplicationStatus,
            SalonOwner,
            AdminProfile,
            SalonStatus,
            Salon,
            ServiceCategory,
            SalonService,
            StaffStatus,
            Staff,
            Counter,
            AppointmentStatus,
            Appointment,
            PaymentStatus,
            PaymentMethod,
            Payment,
            Review,
            PaginationMeta,
            // Service types
            TokenPair,
            AccountProfile,
            StatusCount,
            AdminStats,
            OwnerStats,
            CustomerStats,
            // Request and response bodies
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
            auth_handler::RefreshRequest,
            auth_handler::ChangePasswordRequest,
            auth_handler::LoginResponse,
            user_handler::UpdateProfileRequest,
            user_handler::UpdateStatusRequest,
            user_handler::UpdateRoleRequest,
            application_handler::ApplyRequest,
            application_handler::RejectRequest,
            salon_handler::CreateSalonRequest,
            salon_handler::UpdateSalonRequest,
            salon_handler::SalonStatusRequest,
            service_handler::CreateServiceRequest,
            service_handler::UpdateServiceRequest,
            staff_handler::AddStaffRequest,
            staff_handler::UpdateStaffRequest,
            counter_handler::CreateCounterRequest,
            appointment_handler::BookAppointmentRequest,
            appointment_handler::UpdateAppointmentStatusRequest,
            appointment_handler::CancelAppointmentRequest,
            payment_handler::CreatePaymentRequest,
            review_handler::CreateReviewRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, login and token refresh"),
        (name = "Users", description = "Account administration"),
        (name = "Salon Owner Applications", description = "Becoming a salon owner"),
        (name = "Salons", description = "Salon listings"),
        (name = "Services", description = "Salon service catalog"),
        (name = "Staff", description = "Salon staff"),
        (name = "Counters", description = "Physical service stations"),
        (name = "Appointments", description = "Booking and appointment lifecycle"),
        (name = "Payments", description = "Appointment payments"),
        (name = "Reviews", description = "Ratings of completed appointments"),
        (name = "Dashboard", description = "Role-specific statistics")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some(
                            "Access token from /api/v1/auth/login; the accessToken cookie also works",
                        ))
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_resource() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/v1/auth/login",
            "/api/v1/salons",
            "/api/v1/appointments/{id}/status",
            "/api/v1/dashboard-stats/customer",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
