//! Accounts, owner applications and salon administration.

mod common;

use salon_booking::domain::{
    ApplicationStatus, BusinessDetails, NewStaff, Role, SalonStatus, UserStatus,
};
use salon_booking::errors::AppError;
use salon_booking::infra::repositories::SalonFilter;
use salon_booking::services::{Registration, ServiceContainer};
use salon_booking::types::PaginationParams;

use common::{new_salon, World, ADMIN_EMAIL, ADMIN_PASSWORD, PASSWORD};

#[tokio::test]
async fn register_login_and_refresh() {
    let world = World::new().await;
    let auth = world.services.auth();

    let user = world.register("Alice").await;
    assert_eq!(user.role, Role::Customer);
    assert_ne!(user.password_hash, PASSWORD);

    let duplicate = auth
        .register(Registration {
            name: "Alice Again".into(),
            email: "ALICE@salon.test".into(),
            password: PASSWORD.into(),
            phone: None,
        })
        .await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));

    let session = auth
        .login("alice@salon.test".into(), PASSWORD.into())
        .await
        .unwrap();
    assert_eq!(session.user.id, user.id);
    let claims = auth.verify_token(&session.tokens.access_token).unwrap();
    assert_eq!(claims.sub, user.id);
    assert_eq!(claims.role, Role::Customer);

    let refreshed = auth.refresh(&session.tokens.refresh_token).await.unwrap();
    assert!(auth.verify_token(&refreshed.access_token).is_ok());

    // An access token is not a refresh token
    assert!(auth.refresh(&session.tokens.access_token).await.is_err());

    assert!(matches!(
        auth.login("alice@salon.test".into(), "wrong-password".into())
            .await,
        Err(AppError::InvalidCredentials)
    ));
    assert!(matches!(
        auth.login("nobody@salon.test".into(), PASSWORD.into()).await,
        Err(AppError::InvalidCredentials)
    ));
}

#[tokio::test]
async fn changing_the_password() {
    let world = World::new().await;
    let auth = world.services.auth();
    let user = world.register("Bella").await;

    assert!(matches!(
        auth.change_password(user.id, "not-it".into(), "new-password-1".into())
            .await,
        Err(AppError::Validation(_))
    ));
    auth.change_password(user.id, PASSWORD.into(), "new-password-1".into())
        .await
        .unwrap();

    assert!(auth
        .login("bella@salon.test".into(), PASSWORD.into())
        .await
        .is_err());
    assert!(auth
        .login("bella@salon.test".into(), "new-password-1".into())
        .await
        .is_ok());
}

#[tokio::test]
async fn blocked_accounts_cannot_sign_in() {
    let world = World::new().await;
    let auth = world.services.auth();
    let user = world.register("Carl").await;
    let session = auth
        .login("carl@salon.test".into(), PASSWORD.into())
        .await
        .unwrap();

    world
        .services
        .users()
        .set_status(world.admin, user.id, UserStatus::Blocked)
        .await
        .unwrap();

    assert!(matches!(
        auth.login("carl@salon.test".into(), PASSWORD.into()).await,
        Err(AppError::Forbidden(_))
    ));
    assert!(auth
        .authenticate(&session.tokens.access_token)
        .await
        .is_err());
}

#[tokio::test]
async fn seeding_the_admin_is_idempotent() {
    let world = World::new().await;
    let again = world
        .services
        .users()
        .seed_admin(ADMIN_EMAIL, ADMIN_PASSWORD)
        .await
        .unwrap();
    assert_eq!(again.id, world.admin.id);

    let profile = world.services.auth().me(world.admin.id).await.unwrap();
    assert_eq!(profile.user.role, Role::Admin);
    assert!(profile.admin.is_some());
}

#[tokio::test]
async fn rejected_applicants_may_reapply() {
    let world = World::new().await;
    let applications = world.services.applications();
    let applicant = world.customer("Dana").await;
    let details = || BusinessDetails {
        business_name: Some("Dana Hair".into()),
        ..Default::default()
    };

    let first = applications.apply(applicant, details()).await.unwrap();
    assert_eq!(first.application_status, ApplicationStatus::Pending);
    assert!(matches!(
        applications.apply(applicant, details()).await,
        Err(AppError::Conflict(_))
    ));

    assert!(matches!(
        applications.reject(world.admin, first.id, "no".into()).await,
        Err(AppError::Validation(_))
    ));
    let rejected = applications
        .reject(world.admin, first.id, "Missing trade licence".into())
        .await
        .unwrap();
    assert_eq!(rejected.application_status, ApplicationStatus::Rejected);
    assert_eq!(
        rejected.rejection_reason.as_deref(),
        Some("Missing trade licence")
    );

    let second = applications.apply(applicant, details()).await.unwrap();
    assert_eq!(second.application_status, ApplicationStatus::Pending);

    let approved = applications.approve(world.admin, second.id).await.unwrap();
    assert_eq!(approved.application_status, ApplicationStatus::Approved);
    assert!(approved.verification_status);

    let profile = world.services.auth().me(applicant.id).await.unwrap();
    assert_eq!(profile.user.role, Role::SalonOwner);
    assert!(profile.salon_owner.is_some());

    // Customers cannot decide applications
    assert!(matches!(
        applications.approve(applicant, second.id).await,
        Err(AppError::Forbidden(_))
    ));
}

#[tokio::test]
async fn new_salons_wait_for_approval() {
    let world = World::new().await;
    let owner = world.owner("Eve").await;
    let salons = world.services.salons();
    let page = PaginationParams::default();

    let salon = salons.create(owner, new_salon("Pending Place")).await.unwrap();
    assert_eq!(salon.status, SalonStatus::PendingApproval);

    let public = salons.list(SalonFilter::default(), page).await.unwrap();
    assert!(public.data.is_empty());

    let mine = salons.my_salons(owner, page).await.unwrap();
    assert_eq!(mine.data.len(), 1);

    assert!(matches!(
        salons.set_status(owner, salon.id, SalonStatus::Active).await,
        Err(AppError::Forbidden(_))
    ));
    salons
        .set_status(world.admin, salon.id, SalonStatus::Active)
        .await
        .unwrap();
    let public = salons.list(SalonFilter::default(), page).await.unwrap();
    assert_eq!(public.data.len(), 1);

    // Customers cannot open salons
    let customer = world.customer("Finn").await;
    assert!(matches!(
        salons.create(customer, new_salon("Nope")).await,
        Err(AppError::Forbidden(_))
    ));
}

#[tokio::test]
async fn owners_only_manage_their_own_salons() {
    let world = World::new().await;
    let first = world.owner("Gina").await;
    let second = world.owner("Hugo").await;
    let setup = world.salon(first, "Gina Cuts", 0, 0).await;

    assert!(matches!(
        world
            .services
            .counters()
            .create(second, setup.salon.id, "Chair".into(), None)
            .await,
        Err(AppError::Forbidden(_))
    ));
    assert!(matches!(
        world.services.salons().delete(second, setup.salon.id).await,
        Err(AppError::Forbidden(_))
    ));
}

#[tokio::test]
async fn counter_codes_are_unique_per_salon() {
    let world = World::new().await;
    let owner = world.owner("Iris").await;
    let setup = world.salon(owner, "Iris Studio", 0, 1).await;
    let counters = world.services.counters();

    assert!(matches!(
        counters
            .create(owner, setup.salon.id, "Another".into(), Some("C1".into()))
            .await,
        Err(AppError::Conflict(_))
    ));

    counters.delete(owner, setup.counters[0].id).await.unwrap();
    counters
        .create(owner, setup.salon.id, "Replacement".into(), Some("C1".into()))
        .await
        .unwrap();
    assert_eq!(counters.list(setup.salon.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn staff_membership_follows_the_user_role() {
    let world = World::new().await;
    let owner = world.owner("Jade").await;
    let setup = world.salon(owner, "Jade Salon", 0, 0).await;
    let staff = world.services.staff();
    let user = world.register("Kim").await;
    let member = || NewStaff {
        user_id: user.id,
        salon_id: setup.salon.id,
        speciality: None,
        experience: None,
        bio: None,
    };

    let added = staff.add(owner, member(), vec![setup.service.id]).await.unwrap();
    assert_eq!(added.service_ids, vec![setup.service.id]);
    let profile = world.services.auth().me(user.id).await.unwrap();
    assert_eq!(profile.user.role, Role::Staff);

    assert!(matches!(
        staff.add(owner, member(), Vec::new()).await,
        Err(AppError::Conflict(_))
    ));

    staff.remove(owner, added.id).await.unwrap();
    let profile = world.services.auth().me(user.id).await.unwrap();
    assert_eq!(profile.user.role, Role::Customer);

    // Removed members can be hired again
    staff.add(owner, member(), Vec::new()).await.unwrap();
}

#[tokio::test]
async fn admins_manage_users() {
    let world = World::new().await;
    let users = world.services.users();
    let customer = world.customer("Lena").await;
    let page = PaginationParams::default();

    assert!(matches!(
        users.list(customer, Default::default(), page).await,
        Err(AppError::Forbidden(_))
    ));
    let all = users.list(world.admin, Default::default(), page).await.unwrap();
    assert_eq!(all.data.len(), 2);

    assert!(matches!(
        users.delete(world.admin, world.admin.id).await,
        Err(AppError::Validation(_)) | Err(AppError::Forbidden(_))
    ));

    users.delete(world.admin, customer.id).await.unwrap();
    assert!(matches!(
        users.get(world.admin, customer.id).await,
        Err(AppError::NotFound(_))
    ));
}
