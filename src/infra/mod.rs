//! Infrastructure layer - External systems integration
//!
//! - Postgres connection, migrations and repositories
//! - Unit of Work for transaction management
//! - Optional Redis connection for rate limiting

pub mod cache;
pub mod db;
pub mod repositories;
pub mod unit_of_work;

pub use cache::Cache;
pub use db::{Database, Migrator};
pub use repositories::{
    AppointmentRepository, CatalogRepository, CounterRepository, PaymentRepository,
    ProfileRepository, ReviewRepository, SalonRepository, StaffRepository, UserRepository,
};
pub use unit_of_work::{Persistence, TransactionContext, TxFuture, UnitOfWork};
