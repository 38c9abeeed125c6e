//! User service tests over mocked repositories.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use mockall::predicate::eq;
use uuid::Uuid;

use salon_booking::domain::{Actor, Lifecycle, Role, User, UserStatus};
use salon_booking::errors::{AppError, AppResult};
use salon_booking::infra::repositories::{
    MockAppointmentRepository, MockCatalogRepository, MockCounterRepository,
    MockPaymentRepository, MockProfileRepository, MockReviewRepository, MockSalonRepository,
    MockStaffRepository, MockUserRepository,
};
use salon_booking::infra::{
    AppointmentRepository, CatalogRepository, CounterRepository, PaymentRepository,
    ProfileRepository, ReviewRepository, SalonRepository, StaffRepository, TransactionContext,
    TxFuture, UnitOfWork, UserRepository,
};
use salon_booking::services::{UserManager, UserService};

fn user(id: Uuid, role: Role) -> User {
    let now = Utc::now();
    User {
        id,
        email: "user@salon.test".to_string(),
        password_hash: "hashed".to_string(),
        name: "Test User".to_string(),
        phone: None,
        gender: None,
        date_of_birth: None,
        address: None,
        profile_photo: None,
        role,
        status: UserStatus::Active,
        created_at: now,
        updated_at: now,
        lifecycle: Lifecycle::Active,
    }
}

/// Unit of work around a mocked user repository. Every other repository
/// panics when touched.
struct TestUnitOfWork {
    users: Arc<MockUserRepository>,
}

impl TestUnitOfWork {
    fn new(users: MockUserRepository) -> Self {
        Self {
            users: Arc::new(users),
        }
    }
}

#[async_trait]
impl UnitOfWork for TestUnitOfWork {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn profiles(&self) -> Arc<dyn ProfileRepository> {
        Arc::new(MockProfileRepository::new())
    }

    fn salons(&self) -> Arc<dyn SalonRepository> {
        Arc::new(MockSalonRepository::new())
    }

    fn catalog(&self) -> Arc<dyn CatalogRepository> {
        Arc::new(MockCatalogRepository::new())
    }

    fn staff(&self) -> Arc<dyn StaffRepository> {
        Arc::new(MockStaffRepository::new())
    }

    fn counters(&self) -> Arc<dyn CounterRepository> {
        Arc::new(MockCounterRepository::new())
    }

    fn appointments(&self) -> Arc<dyn AppointmentRepository> {
        Arc::new(MockAppointmentRepository::new())
    }

    fn payments(&self) -> Arc<dyn PaymentRepository> {
        Arc::new(MockPaymentRepository::new())
    }

    fn reviews(&self) -> Arc<dyn ReviewRepository> {
        Arc::new(MockReviewRepository::new())
    }

    async fn transaction<F, T>(&self, _f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        Err(AppError::internal("Transactions not supported in test mock"))
    }
}

fn service(users: MockUserRepository) -> UserManager<TestUnitOfWork> {
    UserManager::new(Arc::new(TestUnitOfWork::new(users)))
}

fn admin() -> Actor {
    Actor::new(Uuid::new_v4(), Role::Admin)
}

#[tokio::test]
async fn admin_reads_any_user() {
    let id = Uuid::new_v4();
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id()
        .with(eq(id))
        .times(1)
        .returning(|id| Ok(Some(user(id, Role::Customer))));

    let found = service(repo).get(admin(), id).await.unwrap();
    assert_eq!(found.id, id);
    assert_eq!(found.role, Role::Customer);
}

#[tokio::test]
async fn customers_only_read_themselves() {
    let me = Uuid::new_v4();
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id()
        .with(eq(me))
        .returning(|id| Ok(Some(user(id, Role::Customer))));
    let users = service(repo);
    let actor = Actor::new(me, Role::Customer);

    assert!(users.get(actor, me).await.is_ok());
    assert!(matches!(
        users.get(actor, Uuid::new_v4()).await,
        Err(AppError::Forbidden(_))
    ));
}

#[tokio::test]
async fn missing_user_is_not_found() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id().returning(|_| Ok(None));

    let result = service(repo).get(admin(), Uuid::new_v4()).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn status_updates_never_delete() {
    let users = service(MockUserRepository::new());
    let result = users
        .set_status(admin(), Uuid::new_v4(), UserStatus::Deleted)
        .await;
    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn suspending_a_user() {
    let id = Uuid::new_v4();
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id()
        .returning(|id| Ok(Some(user(id, Role::Customer))));
    repo.expect_set_status()
        .with(eq(id), eq(UserStatus::Suspended))
        .times(1)
        .returning(|id, status| {
            let mut updated = user(id, Role::Customer);
            updated.status = status;
            Ok(updated)
        });

    let updated = service(repo)
        .set_status(admin(), id, UserStatus::Suspended)
        .await
        .unwrap();
    assert_eq!(updated.status, UserStatus::Suspended);
}

#[tokio::test]
async fn admins_cannot_delete_themselves() {
    let actor = admin();
    let result = service(MockUserRepository::new())
        .delete(actor, actor.id)
        .await;
    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn deleting_soft_deletes() {
    let id = Uuid::new_v4();
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id()
        .returning(|id| Ok(Some(user(id, Role::Customer))));
    repo.expect_soft_delete()
        .with(eq(id))
        .times(1)
        .returning(|_| Ok(()));

    assert!(service(repo).delete(admin(), id).await.is_ok());
}

#[tokio::test]
async fn role_changes_run_in_a_transaction() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id()
        .returning(|id| Ok(Some(user(id, Role::Customer))));
    repo.expect_set_role().never();

    let result = service(repo)
        .set_role(admin(), Uuid::new_v4(), Role::SalonOwner)
        .await;
    assert!(matches!(result, Err(AppError::Internal(_))));
}

#[tokio::test]
async fn seeding_keeps_an_existing_admin() {
    let existing = user(Uuid::new_v4(), Role::Admin);
    let existing_id = existing.id;
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_email_with_deleted()
        .times(1)
        .returning(move |email| {
            assert_eq!(email, "admin@salon.test");
            Ok(Some(existing.clone()))
        });
    repo.expect_create().never();

    let seeded = service(repo)
        .seed_admin("  Admin@Salon.test ", "admin-password")
        .await
        .unwrap();
    assert_eq!(seeded.id, existing_id);
}

#[tokio::test]
async fn non_admins_cannot_list_users() {
    let actor = Actor::new(Uuid::new_v4(), Role::SalonOwner);
    let result = service(MockUserRepository::new())
        .list(actor, Default::default(), Default::default())
        .await;
    assert!(matches!(result, Err(AppError::Forbidden(_))));
}
