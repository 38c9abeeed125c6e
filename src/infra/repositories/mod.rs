//! Repository layer - Data access abstraction
//!
//! Each repository is a trait (mockable in tests) implemented by a pooled
//! `*Store`. The query logic lives in a `*Queries` type generic over the
//! connection, so the same code runs on the pool and inside a transaction.

use sea_orm::{ConnectionTrait, EntityTrait, PaginatorTrait, Select};

use crate::errors::AppResult;
use crate::types::PaginationParams;

mod appointment_repository;
mod catalog_repository;
mod counter_repository;
pub(crate) mod entities;
mod payment_repository;
mod profile_repository;
mod review_repository;
mod salon_repository;
mod staff_repository;
mod user_repository;

pub use appointment_repository::{AppointmentQueries, AppointmentRepository, AppointmentStore};
pub use catalog_repository::{CatalogQueries, CatalogRepository, CatalogStore, ServiceFilter};
pub use counter_repository::{CounterQueries, CounterRepository, CounterStore};
pub use payment_repository::{PaymentQueries, PaymentRepository, PaymentStore};
pub use profile_repository::{
    ApplicationDecision, ApplicationFilter, ProfileQueries, ProfileRepository, ProfileStore,
};
pub use review_repository::{ReviewFilter, ReviewQueries, ReviewRepository, ReviewStore};
pub use salon_repository::{SalonFilter, SalonQueries, SalonRepository, SalonStore};
pub use staff_repository::{StaffFilter, StaffQueries, StaffRepository, StaffStore};
pub use user_repository::{UserFilter, UserQueries, UserRepository, UserStore};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use appointment_repository::MockAppointmentRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use catalog_repository::MockCatalogRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use counter_repository::MockCounterRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use payment_repository::MockPaymentRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use profile_repository::MockProfileRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use review_repository::MockReviewRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use salon_repository::MockSalonRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use staff_repository::MockStaffRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;

/// Fetch one page of `query` together with the size of the full result set.
pub(crate) async fn fetch_page<C, E>(
    conn: &C,
    query: Select<E>,
    params: PaginationParams,
) -> AppResult<(Vec<E::Model>, u64)>
where
    C: ConnectionTrait,
    E: EntityTrait,
    E::Model: Send + Sync + 'static,
{
    let paginator = query.paginate(conn, params.limit());
    let total = paginator.num_items().await?;
    let rows = paginator.fetch_page(params.page() - 1).await?;
    Ok((rows, total))
}
