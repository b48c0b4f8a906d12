//! Concurrent bookings against the same slot.
//!
//! Many requests race for one exclusive room or for the last seats of the
//! shared hall; the area lock must admit exactly what fits.

mod support;

use futures::future::join_all;

use goldenbay_reservations::application::handlers::CreateReservationCommand;
use goldenbay_reservations::domain::foundation::{CommandMetadata, Timestamp};
use goldenbay_reservations::domain::reservation::{
    MealSession, Rejection, ReservationError, ReservationStatus,
};
use goldenbay_reservations::ports::ReservationReader;

use support::{dinner_date, draft, Harness};

fn is_slot_rejection(err: &ReservationError) -> bool {
    matches!(
        err,
        ReservationError::Validation(Rejection::AreaTaken { .. })
            | ReservationError::Conflict(Rejection::AreaTaken { .. })
            | ReservationError::Validation(Rejection::CapacityExceeded { .. })
            | ReservationError::Conflict(Rejection::CapacityExceeded { .. })
    )
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn exclusive_room_admits_exactly_one_of_many_concurrent_requests() {
    let harness = Harness::new();
    let create = harness.app.state.reservations.create.clone();

    let attempts = (0..20).map(|i| {
        let create = create.clone();
        let mut d = draft(&harness.vip_room, 8);
        d.customer_contact = format!("0917 555 {:04}", i);
        tokio::spawn(async move {
            create
                .handle(CreateReservationCommand { draft: d }, CommandMetadata::public())
                .await
        })
    });
    let results: Vec<_> = join_all(attempts)
        .await
        .into_iter()
        .map(|joined| joined.unwrap())
        .collect();

    let accepted = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(accepted, 1);
    for err in results.iter().filter_map(|r| r.as_ref().err()) {
        assert!(is_slot_rejection(err), "unexpected error: {:?}", err);
    }

    let stored = harness
        .ports
        .reader
        .slot_bookings(dinner_date(), MealSession::Dinner)
        .await
        .unwrap();
    assert_eq!(stored.len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn shared_hall_never_oversells_under_contention() {
    let harness = Harness::new();
    let create = harness.app.state.reservations.create.clone();

    // 12 parties of 30 compete for 250 seats: 8 fit, 10 seats stay free
    let attempts = (0..12).map(|i| {
        let create = create.clone();
        let mut d = draft(&harness.hall, 30);
        d.customer_contact = format!("0917 666 {:04}", i);
        tokio::spawn(async move {
            create
                .handle(CreateReservationCommand { draft: d }, CommandMetadata::public())
                .await
        })
    });
    let results: Vec<_> = join_all(attempts)
        .await
        .into_iter()
        .map(|joined| joined.unwrap())
        .collect();

    let accepted = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(accepted, 8);
    for err in results.iter().filter_map(|r| r.as_ref().err()) {
        assert!(is_slot_rejection(err), "unexpected error: {:?}", err);
    }

    let booked: u32 = harness
        .ports
        .reader
        .slot_bookings(dinner_date(), MealSession::Dinner)
        .await
        .unwrap()
        .iter()
        .map(|b| b.pax)
        .sum();
    assert_eq!(booked, 240);
}

#[tokio::test]
async fn lunch_booking_does_not_block_dinner_in_the_same_room() {
    let harness = Harness::new();
    let create = &harness.app.state.reservations.create;

    let mut lunch = draft(&harness.manila_room, 12);
    lunch.session = MealSession::Lunch;
    lunch.time = chrono::NaiveTime::from_hms_opt(12, 0, 0).unwrap();
    create
        .handle(CreateReservationCommand { draft: lunch }, CommandMetadata::public())
        .await
        .unwrap();

    let dinner = create
        .handle(
            CreateReservationCommand {
                draft: draft(&harness.manila_room, 12),
            },
            CommandMetadata::public(),
        )
        .await
        .unwrap();
    assert_eq!(dinner.reservation.status, ReservationStatus::Pending);
}

#[tokio::test]
async fn every_accepted_booking_reaches_the_outbox_once() {
    let harness = Harness::new();
    let create = &harness.app.state.reservations.create;

    for i in 0..3 {
        let mut d = draft(&harness.hall, 4);
        d.customer_contact = format!("0917 777 {:04}", i);
        create
            .handle(CreateReservationCommand { draft: d }, CommandMetadata::public())
            .await
            .unwrap();
    }
    let rejected = create
        .handle(
            CreateReservationCommand {
                draft: draft(&harness.hall, 251),
            },
            CommandMetadata::public(),
        )
        .await;
    assert!(rejected.is_err());

    let published = harness.app.outbox_publisher.process_batch().await.unwrap();
    assert_eq!(published, 3);
    harness.settle(Timestamp::now()).await;
    assert_eq!(harness.app.outbox_publisher.process_batch().await.unwrap(), 0);
}
