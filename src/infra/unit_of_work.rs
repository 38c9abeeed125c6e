//! Unit of Work: one entry point for every repository plus transactions.
//!
//! Outside a transaction, services reach the pooled repositories through
//! `UnitOfWork`. Inside `transaction`, the closure gets a
//! `TransactionContext` whose query handles all share one database
//! transaction, committed when the closure succeeds and rolled back when it
//! fails.

use async_trait::async_trait;
use sea_orm::{
    AccessMode, DatabaseConnection, DatabaseTransaction, IsolationLevel, TransactionTrait,
};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use super::repositories::{
    AppointmentQueries, AppointmentRepository, AppointmentStore, CatalogQueries,
    CatalogRepository, CatalogStore, CounterQueries, CounterRepository, CounterStore,
    PaymentQueries, PaymentRepository, PaymentStore, ProfileQueries, ProfileRepository,
    ProfileStore, ReviewQueries, ReviewRepository, ReviewStore, SalonQueries, SalonRepository,
    SalonStore, StaffQueries, StaffRepository, StaffStore, UserQueries, UserRepository,
    UserStore,
};
use crate::errors::AppResult;

/// Boxed future returned by a transaction closure.
pub type TxFuture<'a, T> = Pin<Box<dyn Future<Output = AppResult<T>> + Send + 'a>>;

/// Unit of Work trait for dependency injection.
///
/// Not mockable through mockall because of the generic transaction methods;
/// tests implement it by hand around mocked repositories.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    fn users(&self) -> Arc<dyn UserRepository>;

    fn profiles(&self) -> Arc<dyn ProfileRepository>;

    fn salons(&self) -> Arc<dyn SalonRepository>;

    fn catalog(&self) -> Arc<dyn CatalogRepository>;

    fn staff(&self) -> Arc<dyn StaffRepository>;

    fn counters(&self) -> Arc<dyn CounterRepository>;

    fn appointments(&self) -> Arc<dyn AppointmentRepository>;

    fn payments(&self) -> Arc<dyn PaymentRepository>;

    fn reviews(&self) -> Arc<dyn ReviewRepository>;

    /// Run a closure inside a READ COMMITTED transaction.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send;
}

/// Repository access bound to one open transaction.
#[derive(Clone, Copy)]
pub struct TransactionContext<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TransactionContext<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub fn users(&self) -> UserQueries<'a, DatabaseTransaction> {
        UserQueries::new(self.txn)
    }

    pub fn profiles(&self) -> ProfileQueries<'a, DatabaseTransaction> {
        ProfileQueries::new(self.txn)
    }

    pub fn salons(&self) -> SalonQueries<'a, DatabaseTransaction> {
        SalonQueries::new(self.txn)
    }

    pub fn catalog(&self) -> CatalogQueries<'a, DatabaseTransaction> {
        CatalogQueries::new(self.txn)
    }

    pub fn staff(&self) -> StaffQueries<'a, DatabaseTransaction> {
        StaffQueries::new(self.txn)
    }

    pub fn counters(&self) -> CounterQueries<'a, DatabaseTransaction> {
        CounterQueries::new(self.txn)
    }

    pub fn appointments(&self) -> AppointmentQueries<'a, DatabaseTransaction> {
        AppointmentQueries::new(self.txn)
    }

    pub fn payments(&self) -> PaymentQueries<'a, DatabaseTransaction> {
        PaymentQueries::new(self.txn)
    }

    pub fn reviews(&self) -> ReviewQueries<'a, DatabaseTransaction> {
        ReviewQueries::new(self.txn)
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    users: Arc<UserStore>,
    profiles: Arc<ProfileStore>,
    salons: Arc<SalonStore>,
    catalog: Arc<CatalogStore>,
    staff: Arc<StaffStore>,
    counters: Arc<CounterStore>,
    appointments: Arc<AppointmentStore>,
    payments: Arc<PaymentStore>,
    reviews: Arc<ReviewStore>,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            users: Arc::new(UserStore::new(db.clone())),
            profiles: Arc::new(ProfileStore::new(db.clone())),
            salons: Arc::new(SalonStore::new(db.clone())),
            catalog: Arc::new(CatalogStore::new(db.clone())),
            staff: Arc::new(StaffStore::new(db.clone())),
            counters: Arc::new(CounterStore::new(db.clone())),
            appointments: Arc::new(AppointmentStore::new(db.clone())),
            payments: Arc::new(PaymentStore::new(db.clone())),
            reviews: Arc::new(ReviewStore::new(db.clone())),
            db,
        }
    }

    async fn execute_transaction<F, T>(&self, isolation: IsolationLevel, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        let txn = self
            .db
            .begin_with_config(Some(isolation), Some(AccessMode::ReadWrite))
            .await?;

        match f(TransactionContext::new(&txn)).await {
            Ok(result) => {
                txn.commit().await?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn profiles(&self) -> Arc<dyn ProfileRepository> {
        self.profiles.clone()
    }

    fn salons(&self) -> Arc<dyn SalonRepository> {
        self.salons.clone()
    }

    fn catalog(&self) -> Arc<dyn CatalogRepository> {
        self.catalog.clone()
    }

    fn staff(&self) -> Arc<dyn StaffRepository> {
        self.staff.clone()
    }

    fn counters(&self) -> Arc<dyn CounterRepository> {
        self.counters.clone()
    }

    fn appointments(&self) -> Arc<dyn AppointmentRepository> {
        self.appointments.clone()
    }

    fn payments(&self) -> Arc<dyn PaymentRepository> {
        self.payments.clone()
    }

    fn reviews(&self) -> Arc<dyn ReviewRepository> {
        self.reviews.clone()
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        self.execute_transaction(IsolationLevel::ReadCommitted, f).await
    }
}
