//! HTTP request handlers, one module per resource.

pub mod application_handler;
pub mod appointment_handler;
pub mod auth_handler;
pub mod counter_handler;
pub mod dashboard_handler;
pub mod payment_handler;
pub mod review_handler;
pub mod salon_handler;
pub mod service_handler;
pub mod staff_handler;
pub mod user_handler;

pub use application_handler::application_routes;
pub use appointment_handler::appointment_routes;
pub use auth_handler::{account_routes, auth_routes};
pub use counter_handler::counter_routes;
pub use dashboard_handler::dashboard_routes;
pub use payment_handler::payment_routes;
pub use review_handler::review_routes;
pub use salon_handler::salon_routes;
pub use service_handler::service_routes;
pub use staff_handler::staff_routes;
pub use user_handler::user_routes;
