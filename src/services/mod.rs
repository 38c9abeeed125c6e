//! Application services layer - use cases and business rules that need
//! the store.
//!
//! Every service takes the calling `Actor` where authority matters and
//! reaches the store through the Unit of Work.

pub(crate) mod access;
mod application_service;
mod appointment_service;
mod auth_service;
mod catalog_service;
pub mod container;
mod counter_service;
mod dashboard_service;
mod payment_service;
mod review_service;
mod salon_service;
mod staff_service;
mod user_service;

pub use container::{ServiceContainer, Services};

pub use application_service::{ApplicationManager, ApplicationService};
pub use appointment_service::{
    slot_conflict, AppointmentService, BookingManager, BookingRequest, COUNTER_TAKEN,
    STAFF_TAKEN, STATUS_CHANGED,
};
pub use auth_service::{
    AccountProfile, AuthService, Authenticator, Claims, Registration, Session, TokenPair,
};
pub use catalog_service::{CatalogManager, CatalogService};
pub use counter_service::{CounterManager, CounterService};
pub use dashboard_service::{
    AdminStats, CustomerStats, DashboardManager, DashboardService, OwnerStats, StatusCount,
};
pub use payment_service::{PaymentManager, PaymentRequest, PaymentService};
pub use review_service::{ReviewManager, ReviewRequest, ReviewService};
pub use salon_service::{SalonDirectory, SalonManager};
pub use staff_service::{StaffManager, StaffService};
pub use user_service::{UserManager, UserService};

#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;
