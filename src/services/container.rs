//! Service Container - one handle on every application service.
//!
//! Handlers depend on the `ServiceContainer` trait, never on concrete
//! managers, so API tests can swap in `MockServiceContainer`.

use std::sync::Arc;

use super::{
    AppointmentService, ApplicationService, AuthService, CatalogService, CounterService,
    DashboardService, PaymentService, ReviewService, SalonDirectory, StaffService, UserService,
};
use crate::config::Config;
use crate::infra::Persistence;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;

    fn users(&self) -> Arc<dyn UserService>;

    fn applications(&self) -> Arc<dyn ApplicationService>;

    fn salons(&self) -> Arc<dyn SalonDirectory>;

    fn catalog(&self) -> Arc<dyn CatalogService>;

    fn staff(&self) -> Arc<dyn StaffService>;

    fn counters(&self) -> Arc<dyn CounterService>;

    fn appointments(&self) -> Arc<dyn AppointmentService>;

    fn payments(&self) -> Arc<dyn PaymentService>;

    fn reviews(&self) -> Arc<dyn ReviewService>;

    fn dashboard(&self) -> Arc<dyn DashboardService>;
}

/// Production container backed by one `Persistence` unit of work.
pub struct Services {
    auth: Arc<dyn AuthService>,
    users: Arc<dyn UserService>,
    applications: Arc<dyn ApplicationService>,
    salons: Arc<dyn SalonDirectory>,
    catalog: Arc<dyn CatalogService>,
    staff: Arc<dyn StaffService>,
    counters: Arc<dyn CounterService>,
    appointments: Arc<dyn AppointmentService>,
    payments: Arc<dyn PaymentService>,
    reviews: Arc<dyn ReviewService>,
    dashboard: Arc<dyn DashboardService>,
}

impl Services {
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: Config) -> Self {
        use super::{
            ApplicationManager, Authenticator, BookingManager, CatalogManager, CounterManager,
            DashboardManager, PaymentManager, ReviewManager, SalonManager, StaffManager,
            UserManager,
        };

        let uow = Arc::new(Persistence::new(db));
        Self {
            auth: Arc::new(Authenticator::new(uow.clone(), config)),
            users: Arc::new(UserManager::new(uow.clone())),
            applications: Arc::new(ApplicationManager::new(uow.clone())),
            salons: Arc::new(SalonManager::new(uow.clone())),
            catalog: Arc::new(CatalogManager::new(uow.clone())),
            staff: Arc::new(StaffManager::new(uow.clone())),
            counters: Arc::new(CounterManager::new(uow.clone())),
            appointments: Arc::new(BookingManager::new(uow.clone())),
            payments: Arc::new(PaymentManager::new(uow.clone())),
            reviews: Arc::new(ReviewManager::new(uow.clone())),
            dashboard: Arc::new(DashboardManager::new(uow)),
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.users.clone()
    }

    fn applications(&self) -> Arc<dyn ApplicationService> {
        self.applications.clone()
    }

    fn salons(&self) -> Arc<dyn SalonDirectory> {
        self.salons.clone()
    }

    fn catalog(&self) -> Arc<dyn CatalogService> {
        self.catalog.clone()
    }

    fn staff(&self) -> Arc<dyn StaffService> {
        self.staff.clone()
    }

    fn counters(&self) -> Arc<dyn CounterService> {
        self.counters.clone()
    }

    fn appointments(&self) -> Arc<dyn AppointmentService> {
        self.appointments.clone()
    }

    fn payments(&self) -> Arc<dyn PaymentService> {
        self.payments.clone()
    }

    fn reviews(&self) -> Arc<dyn ReviewService> {
        self.reviews.clone()
    }

    fn dashboard(&self) -> Arc<dyn DashboardService> {
        self.dashboard.clone()
    }
}
