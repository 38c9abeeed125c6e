//! Booking scenarios against a migrated SQLite database.

mod common;

use std::sync::Arc;

use salon_booking::domain::{
    AppointmentStatus, NewAppointment, RecordFilter, SalonServiceChanges, StartTime,
};
use salon_booking::errors::AppError;
use salon_booking::infra::{Persistence, UnitOfWork};
use salon_booking::services::{slot_conflict, ServiceContainer, COUNTER_TAKEN, STAFF_TAKEN};
use salon_booking::types::PaginationParams;

use common::{new_salon, SalonSetup, World};

fn conflict_message(result: Result<impl std::fmt::Debug, AppError>) -> String {
    match result {
        Err(AppError::Conflict(message)) => message,
        other => panic!("expected a conflict, got {other:?}"),
    }
}

/// The row `book` would insert, without any of its checks.
fn raw_booking(setup: &SalonSetup, customer_id: uuid::Uuid, staff: usize, counter: usize) -> NewAppointment {
    let request = setup.booking(staff, counter, "10:00");
    NewAppointment {
        customer_id,
        salon_id: request.salon_id,
        service_id: request.service_id,
        staff_id: request.staff_id,
        counter_id: request.counter_id,
        appointment_date: request.appointment_date,
        start_time: StartTime::parse(&request.start_time).unwrap(),
        notes: None,
    }
}

#[tokio::test]
async fn counter_and_staff_slots_are_exclusive() {
    let world = World::new().await;
    let owner = world.owner("Olivia").await;
    let setup = world.salon(owner, "Shear", 2, 2).await;
    let alice = world.customer("Alice").await;
    let bob = world.customer("Bob").await;
    let bookings = world.services.appointments();

    let first = bookings
        .book(alice, setup.booking(0, 0, "10:00"))
        .await
        .unwrap();
    assert_eq!(first.status, AppointmentStatus::Pending);
    assert_eq!(first.customer_id, alice.id);

    // Different stylist, same chair
    let err = bookings.book(bob, setup.booking(1, 0, "10:00")).await;
    assert_eq!(conflict_message(err), COUNTER_TAKEN);

    // Same stylist, different chair
    let err = bookings.book(bob, setup.booking(0, 1, "10:00")).await;
    assert_eq!(conflict_message(err), STAFF_TAKEN);

    // Both free
    bookings
        .book(bob, setup.booking(1, 1, "10:00"))
        .await
        .unwrap();

    // Same resources, another time
    bookings
        .book(bob, setup.booking(0, 0, "10:30"))
        .await
        .unwrap();
}

#[tokio::test]
async fn cancelled_slot_can_be_booked_again() {
    let world = World::new().await;
    let owner = world.owner("Oscar").await;
    let setup = world.salon(owner, "Trim", 1, 1).await;
    let alice = world.customer("Alice").await;
    let bob = world.customer("Bob").await;
    let bookings = world.services.appointments();

    let first = bookings
        .book(alice, setup.booking(0, 0, "09:00"))
        .await
        .unwrap();
    bookings
        .cancel(alice, first.id, Some("Running late".into()))
        .await
        .unwrap();

    let second = bookings
        .book(bob, setup.booking(0, 0, "09:00"))
        .await
        .unwrap();
    assert_eq!(second.customer_id, bob.id);
}

#[tokio::test]
async fn concurrent_bookings_for_one_slot_have_one_winner() {
    let world = World::new().await;
    let owner = world.owner("Olga").await;
    let setup = world.salon(owner, "Fade", 1, 1).await;
    let alice = world.customer("Alice").await;
    let bob = world.customer("Bob").await;

    let services = Arc::new(world.services);
    let (a, b) = tokio::join!(
        {
            let services = services.clone();
            let request = setup.booking(0, 0, "11:00");
            async move { services.appointments().book(alice, request).await }
        },
        {
            let services = services.clone();
            let request = setup.booking(0, 0, "11:00");
            async move { services.appointments().book(bob, request).await }
        }
    );

    let outcomes = [a, b];
    assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
    let loser = outcomes.into_iter().find(|r| r.is_err()).unwrap();
    assert!(matches!(loser, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn malformed_start_time_is_rejected() {
    let world = World::new().await;
    let owner = world.owner("Omar").await;
    let setup = world.salon(owner, "Buzz", 1, 1).await;
    let alice = world.customer("Alice").await;

    let err = world
        .services
        .appointments()
        .book(alice, setup.booking(0, 0, "25:00"))
        .await;
    assert!(matches!(err, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn counters_from_another_salon_cannot_be_booked() {
    let world = World::new().await;
    let owner = world.owner("Opal").await;
    let here = world.salon(owner, "Here", 1, 1).await;
    let there = world.salon(owner, "There", 1, 1).await;
    let alice = world.customer("Alice").await;

    let mut request = here.booking(0, 0, "12:00");
    request.counter_id = there.counters[0].id;
    let err = world.services.appointments().book(alice, request).await;
    assert!(matches!(err, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn listings_are_scoped_to_the_caller() {
    let world = World::new().await;
    let first_owner = world.owner("Orla").await;
    let second_owner = world.owner("Otto").await;
    let first = world.salon(first_owner, "First", 2, 2).await;
    let second = world.salon(second_owner, "Second", 1, 1).await;
    let alice = world.customer("Alice").await;
    let bob = world.customer("Bob").await;
    let bookings = world.services.appointments();
    let page = PaginationParams::default();

    bookings.book(alice, first.booking(0, 0, "10:00")).await.unwrap();
    bookings.book(bob, first.booking(1, 1, "10:00")).await.unwrap();
    bookings.book(bob, second.booking(0, 0, "10:00")).await.unwrap();

    let mine = bookings.my_appointments(alice, None, page).await.unwrap();
    assert_eq!(mine.data.len(), 1);
    assert!(mine.data.iter().all(|a| a.customer_id == alice.id));

    let owned = bookings
        .list(first_owner, RecordFilter::default(), page)
        .await
        .unwrap();
    assert_eq!(owned.data.len(), 2);
    assert!(owned.data.iter().all(|a| a.salon_id == first.salon.id));

    // Asking for someone else's salon narrows to nothing
    let leaked = bookings
        .list(
            first_owner,
            RecordFilter {
                status: None,
                salon_id: Some(second.salon.id),
            },
            page,
        )
        .await
        .unwrap();
    assert!(leaked.data.is_empty());

    let (stylist, member) = &first.staff[1];
    let assigned = bookings
        .list(*stylist, RecordFilter::default(), page)
        .await
        .unwrap();
    assert_eq!(assigned.data.len(), 1);
    assert_eq!(assigned.data[0].staff_id, member.id);

    let everything = bookings
        .list(world.admin, RecordFilter::default(), page)
        .await
        .unwrap();
    assert_eq!(everything.data.len(), 3);
}

#[tokio::test]
async fn other_customers_appointments_read_as_missing() {
    let world = World::new().await;
    let owner = world.owner("Odile").await;
    let setup = world.salon(owner, "Curl", 1, 1).await;
    let alice = world.customer("Alice").await;
    let bob = world.customer("Bob").await;
    let bookings = world.services.appointments();

    let appointment = bookings
        .book(alice, setup.booking(0, 0, "14:00"))
        .await
        .unwrap();

    assert!(bookings.get(alice, appointment.id).await.is_ok());
    assert!(bookings.get(owner, appointment.id).await.is_ok());
    assert!(matches!(
        bookings.get(bob, appointment.id).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn status_changes_follow_the_lifecycle() {
    let world = World::new().await;
    let owner = world.owner("Orson").await;
    let setup = world.salon(owner, "Wave", 1, 1).await;
    let alice = world.customer("Alice").await;
    let bob = world.customer("Bob").await;
    let bookings = world.services.appointments();
    let (stylist, _) = setup.staff[0];

    let appointment = bookings
        .book(alice, setup.booking(0, 0, "15:00"))
        .await
        .unwrap();

    // Customers may only cancel
    assert!(matches!(
        bookings
            .update_status(alice, appointment.id, AppointmentStatus::Confirmed, None)
            .await,
        Err(AppError::Forbidden(_))
    ));
    // Not their appointment
    assert!(matches!(
        bookings.cancel(bob, appointment.id, None).await,
        Err(AppError::Forbidden(_))
    ));
    // Skipping a step
    assert!(matches!(
        bookings
            .update_status(owner, appointment.id, AppointmentStatus::Completed, None)
            .await,
        Err(AppError::Forbidden(_))
    ));

    bookings
        .update_status(owner, appointment.id, AppointmentStatus::Confirmed, None)
        .await
        .unwrap();
    bookings
        .update_status(stylist, appointment.id, AppointmentStatus::InProgress, None)
        .await
        .unwrap();
    let done = bookings
        .update_status(stylist, appointment.id, AppointmentStatus::Completed, None)
        .await
        .unwrap();
    assert_eq!(done.status, AppointmentStatus::Completed);

    assert!(matches!(
        bookings.cancel(alice, appointment.id, None).await,
        Err(AppError::Forbidden(_))
    ));
}

#[tokio::test]
async fn cancellation_keeps_the_reason() {
    let world = World::new().await;
    let owner = world.owner("Ottilie").await;
    let setup = world.salon(owner, "Bob", 1, 1).await;
    let alice = world.customer("Alice").await;
    let bookings = world.services.appointments();

    let appointment = bookings
        .book(alice, setup.booking(0, 0, "16:00"))
        .await
        .unwrap();
    let cancelled = bookings
        .cancel(alice, appointment.id, Some("Feeling unwell".into()))
        .await
        .unwrap();
    assert_eq!(cancelled.status, AppointmentStatus::Cancelled);
    assert_eq!(cancelled.cancellation_reason.as_deref(), Some("Feeling unwell"));

    // Owners cannot use the customer cancel endpoint
    assert!(matches!(
        bookings.cancel(owner, appointment.id, None).await,
        Err(AppError::Forbidden(_))
    ));
}

#[tokio::test]
async fn slot_indexes_catch_inserts_that_skip_the_check() {
    let world = World::new().await;
    let owner = world.owner("Odessa").await;
    let setup = world.salon(owner, "Strand", 2, 2).await;
    let alice = world.customer("Alice").await;
    let bob = world.customer("Bob").await;

    world
        .services
        .appointments()
        .book(alice, setup.booking(0, 0, "10:00"))
        .await
        .unwrap();

    let appointments = Persistence::new(world.db.clone()).appointments();

    // Another stylist on the occupied chair
    let err = appointments
        .create(raw_booking(&setup, bob.id, 1, 0))
        .await
        .unwrap_err();
    assert!(err.is_unique_violation());
    assert_eq!(conflict_message(Err::<(), _>(slot_conflict(err))), COUNTER_TAKEN);

    // The occupied stylist on another chair
    let err = appointments
        .create(raw_booking(&setup, bob.id, 0, 1))
        .await
        .unwrap_err();
    assert!(err.is_unique_violation());
    assert_eq!(conflict_message(Err::<(), _>(slot_conflict(err))), STAFF_TAKEN);

    appointments
        .create(raw_booking(&setup, bob.id, 1, 1))
        .await
        .unwrap();
}

#[tokio::test]
async fn status_writes_from_a_stale_read_are_refused() {
    let world = World::new().await;
    let owner = world.owner("Odalys").await;
    let setup = world.salon(owner, "Plait", 1, 1).await;
    let alice = world.customer("Alice").await;
    let bookings = world.services.appointments();

    let appointment = bookings
        .book(alice, setup.booking(0, 0, "10:00"))
        .await
        .unwrap();
    let appointments = Persistence::new(world.db.clone()).appointments();

    // Both callers read PENDING; the cancellation lands first
    let cancelled = appointments
        .update_status(
            appointment.id,
            AppointmentStatus::Pending,
            AppointmentStatus::Cancelled,
            Some("Changed plans".into()),
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(cancelled.status, AppointmentStatus::Cancelled);

    let confirmed = appointments
        .update_status(
            appointment.id,
            AppointmentStatus::Pending,
            AppointmentStatus::Confirmed,
            None,
        )
        .await
        .unwrap();
    assert!(confirmed.is_none());

    // Through the service the fresh read sees a terminal status
    assert!(matches!(
        bookings
            .update_status(owner, appointment.id, AppointmentStatus::Confirmed, None)
            .await,
        Err(AppError::Forbidden(_))
    ));
    let current = bookings.get(alice, appointment.id).await.unwrap();
    assert_eq!(current.status, AppointmentStatus::Cancelled);
    assert_eq!(current.cancellation_reason.as_deref(), Some("Changed plans"));
}

#[tokio::test]
async fn unusable_resources_cannot_be_booked() {
    let world = World::new().await;
    let owner = world.owner("Oksana").await;
    let alice = world.customer("Alice").await;
    let bookings = world.services.appointments();
    let not_found = |result: Result<_, AppError>| matches!(result, Err(AppError::NotFound(_)));

    // Salon still waiting for approval
    let setup = world.salon(owner, "Open", 1, 1).await;
    let pending = world
        .services
        .salons()
        .create(owner, new_salon("Waiting"))
        .await
        .unwrap();
    let mut request = setup.booking(0, 0, "09:00");
    request.salon_id = pending.id;
    assert!(not_found(bookings.book(alice, request).await));

    // Service switched off
    world
        .services
        .catalog()
        .update(
            owner,
            setup.service.id,
            SalonServiceChanges {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(not_found(bookings.book(alice, setup.booking(0, 0, "09:00")).await));

    // Service deleted
    let setup = world.salon(owner, "Deleted", 1, 1).await;
    world
        .services
        .catalog()
        .delete(owner, setup.service.id)
        .await
        .unwrap();
    assert!(not_found(bookings.book(alice, setup.booking(0, 0, "09:00")).await));

    // Counter deleted
    let setup = world.salon(owner, "Chairless", 1, 1).await;
    world
        .services
        .counters()
        .delete(owner, setup.counters[0].id)
        .await
        .unwrap();
    assert!(not_found(bookings.book(alice, setup.booking(0, 0, "09:00")).await));

    // Stylist removed
    let setup = world.salon(owner, "Unstaffed", 1, 1).await;
    world
        .services
        .staff()
        .remove(owner, setup.staff[0].1.id)
        .await
        .unwrap();
    assert!(not_found(bookings.book(alice, setup.booking(0, 0, "09:00")).await));
}
