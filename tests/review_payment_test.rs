//! Reviews, payments and dashboards over completed appointments.

mod common;

use salon_booking::domain::{
    Actor, Appointment, AppointmentStatus, PaymentMethod, PaymentStatus, RecordFilter,
};
use salon_booking::errors::AppError;
use salon_booking::infra::repositories::ReviewFilter;
use salon_booking::services::{PaymentRequest, ReviewRequest, ServiceContainer};
use salon_booking::types::PaginationParams;

use common::{SalonSetup, World};

/// Book and walk an appointment through to COMPLETED.
async fn completed(
    world: &World,
    setup: &SalonSetup,
    customer: Actor,
    start_time: &str,
) -> Appointment {
    let bookings = world.services.appointments();
    let appointment = bookings
        .book(customer, setup.booking(0, 0, start_time))
        .await
        .unwrap();
    for status in [
        AppointmentStatus::Confirmed,
        AppointmentStatus::InProgress,
        AppointmentStatus::Completed,
    ] {
        bookings
            .update_status(setup.owner, appointment.id, status, None)
            .await
            .unwrap();
    }
    bookings.get(customer, appointment.id).await.unwrap()
}

fn review(appointment: &Appointment, rating: i32) -> ReviewRequest {
    ReviewRequest {
        appointment_id: appointment.id,
        rating,
        comment: Some("Lovely".into()),
    }
}

#[tokio::test]
async fn one_review_per_completed_appointment() {
    let world = World::new().await;
    let owner = world.owner("Ophelia").await;
    let setup = world.salon(owner, "Gloss", 1, 1).await;
    let alice = world.customer("Alice").await;
    let reviews = world.services.reviews();

    let pending = world
        .services
        .appointments()
        .book(alice, setup.booking(0, 0, "08:00"))
        .await
        .unwrap();
    assert!(matches!(
        reviews.create(alice, review(&pending, 5)).await,
        Err(AppError::Validation(_))
    ));

    let appointment = completed(&world, &setup, alice, "09:00").await;
    let created = reviews.create(alice, review(&appointment, 5)).await.unwrap();
    assert_eq!(created.salon_id, setup.salon.id);
    assert_eq!(created.staff_id, Some(setup.staff[0].1.id));

    assert!(matches!(
        reviews.create(alice, review(&appointment, 4)).await,
        Err(AppError::Conflict(_))
    ));
}

#[tokio::test]
async fn only_the_customer_can_review() {
    let world = World::new().await;
    let owner = world.owner("Orin").await;
    let setup = world.salon(owner, "Comb", 1, 1).await;
    let alice = world.customer("Alice").await;
    let bob = world.customer("Bob").await;

    let appointment = completed(&world, &setup, alice, "10:00").await;
    assert!(matches!(
        world.services.reviews().create(bob, review(&appointment, 3)).await,
        Err(AppError::Forbidden(_))
    ));
    assert!(matches!(
        world.services.reviews().create(owner, review(&appointment, 3)).await,
        Err(AppError::Forbidden(_))
    ));
}

#[tokio::test]
async fn ratings_are_out_of_five() {
    let world = World::new().await;
    let owner = world.owner("Oona").await;
    let setup = world.salon(owner, "Brush", 1, 1).await;
    let alice = world.customer("Alice").await;

    let appointment = completed(&world, &setup, alice, "10:00").await;
    for rating in [0, 6] {
        assert!(matches!(
            world
                .services
                .reviews()
                .create(alice, review(&appointment, rating))
                .await,
            Err(AppError::Validation(_))
        ));
    }
}

#[tokio::test]
async fn salon_and_staff_ratings_are_the_mean() {
    let world = World::new().await;
    let owner = world.owner("Octavia").await;
    let setup = world.salon(owner, "Shine", 1, 1).await;
    let alice = world.customer("Alice").await;
    let bob = world.customer("Bob").await;
    let reviews = world.services.reviews();

    let first = completed(&world, &setup, alice, "10:00").await;
    let second = completed(&world, &setup, bob, "11:00").await;
    reviews.create(alice, review(&first, 5)).await.unwrap();
    reviews.create(bob, review(&second, 4)).await.unwrap();

    let salon = world.services.salons().get(setup.salon.id).await.unwrap();
    assert_eq!(salon.total_reviews, 2);
    assert!((salon.rating - 4.5).abs() < 1e-9);

    let staff = world
        .services
        .staff()
        .get(setup.staff[0].1.id)
        .await
        .unwrap();
    assert_eq!(staff.total_reviews, 2);
    assert!((staff.rating - 4.5).abs() < 1e-9);

    let listed = reviews
        .list(
            ReviewFilter {
                salon_id: Some(setup.salon.id),
                staff_id: None,
            },
            PaginationParams::default(),
        )
        .await
        .unwrap();
    assert_eq!(listed.data.len(), 2);
}

#[tokio::test]
async fn payment_defaults_to_the_service_price() {
    let world = World::new().await;
    let owner = world.owner("Odette").await;
    let setup = world.salon(owner, "Bloom", 1, 1).await;
    let alice = world.customer("Alice").await;
    let payments = world.services.payments();

    let appointment = completed(&world, &setup, alice, "13:00").await;
    let payment = payments
        .create(
            alice,
            PaymentRequest {
                appointment_id: appointment.id,
                amount: None,
                payment_method: PaymentMethod::Cash,
                status: None,
                transaction_id: None,
            },
        )
        .await
        .unwrap();
    assert!((payment.amount - setup.service.price).abs() < 1e-9);
    assert_eq!(payment.status, PaymentStatus::Pending);

    let duplicate = payments
        .create(
            owner,
            PaymentRequest {
                appointment_id: appointment.id,
                amount: Some(10.0),
                payment_method: PaymentMethod::Card,
                status: Some(PaymentStatus::Completed),
                transaction_id: None,
            },
        )
        .await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));

    let page = PaginationParams::default();
    let own = payments
        .list(alice, RecordFilter::default(), page)
        .await
        .unwrap();
    assert_eq!(own.data.len(), 1);

    let bob = world.customer("Bob").await;
    assert!(matches!(
        payments.get(bob, payment.id).await,
        Err(AppError::NotFound(_))
    ));
    let empty = payments.list(bob, RecordFilter::default(), page).await.unwrap();
    assert!(empty.data.is_empty());
}

#[tokio::test]
async fn dashboards_count_what_each_role_sees() {
    let world = World::new().await;
    let owner = world.owner("Odin").await;
    let setup = world.salon(owner, "Crown", 1, 1).await;
    let alice = world.customer("Alice").await;

    completed(&world, &setup, alice, "10:00").await;
    world
        .services
        .appointments()
        .book(alice, setup.booking(0, 0, "12:00"))
        .await
        .unwrap();

    let dashboard = world.services.dashboard();
    let customer = dashboard.customer(alice).await.unwrap();
    assert_eq!(customer.total_appointments, 2);
    assert_eq!(customer.completed_appointments, 1);

    let owner_stats = dashboard.salon_owner(owner).await.unwrap();
    assert_eq!(owner_stats.total_salons, 1);
    assert_eq!(owner_stats.total_appointments, 2);

    let admin = dashboard.admin(world.admin).await.unwrap();
    assert_eq!(admin.total_salons, 1);
    assert_eq!(admin.total_appointments, 2);

    assert!(matches!(
        dashboard.admin(alice).await,
        Err(AppError::Forbidden(_))
    ));
}
