//! End-to-end booking lifecycle over the wired application.
//!
//! Commands write through the ledger, the outbox publisher feeds the
//! customer sync and the notification planner, and the worker sends what
//! falls due.

mod support;

use chrono::{Duration, NaiveTime, TimeZone, Utc};

use goldenbay_reservations::application::handlers::{
    CreateReservationCommand, UpdateReservationCommand, UpdateReservationResult,
};
use goldenbay_reservations::domain::foundation::{
    AuthenticatedUser, CommandMetadata, ReservationId, StaffRole, Timestamp,
};
use goldenbay_reservations::domain::reservation::{
    HistoryKind, Reservation, ReservationDraft, ReservationPatch, ReservationStatus,
};
use goldenbay_reservations::ports::{CustomerDirectory, ReservationLedger, TaskQueue};

use support::{draft, staff, Harness, STAFF_EMAIL};

async fn book(harness: &Harness, d: ReservationDraft) -> Reservation {
    harness
        .app
        .state
        .reservations
        .create
        .handle(CreateReservationCommand { draft: d }, CommandMetadata::public())
        .await
        .unwrap()
        .reservation
}

async fn edit(
    harness: &Harness,
    id: ReservationId,
    patch: ReservationPatch,
    actor: &AuthenticatedUser,
) -> UpdateReservationResult {
    harness
        .app
        .state
        .reservations
        .update
        .handle(
            UpdateReservationCommand {
                reservation_id: id,
                patch,
                expected_version: None,
            },
            actor,
            CommandMetadata::staff(actor.id.clone()),
        )
        .await
        .unwrap()
}

async fn walk_to(harness: &Harness, id: ReservationId, path: &[ReservationStatus]) {
    let host = staff("host-1", StaffRole::Receptionist);
    for status in path {
        edit(harness, id, ReservationPatch::status(*status), &host).await;
    }
}

const TO_COMPLETED: [ReservationStatus; 3] = [
    ReservationStatus::Confirmed,
    ReservationStatus::Seated,
    ReservationStatus::Completed,
];

#[tokio::test]
async fn new_booking_alerts_the_guest_and_every_staff_contact() {
    let harness = Harness::new();
    book(&harness, draft(&harness.hall, 6)).await;

    harness.settle(Timestamp::now()).await;

    let sms: Vec<String> = harness.sms.sent().into_iter().map(|s| s.to).collect();
    assert_eq!(sms, vec!["0917 123 4567", "0917 000 0001", "0917 000 0002"]);
    let emails: Vec<String> = harness.email.sent().into_iter().map(|e| e.to).collect();
    assert_eq!(emails, vec!["maria@example.com".to_string(), STAFF_EMAIL.to_string()]);
}

#[tokio::test]
async fn third_completed_visit_makes_the_guest_vip() {
    let harness = Harness::new();
    let now = Timestamp::now();

    for week in 0..3 {
        let mut d = draft(&harness.hall, 4);
        d.date += Duration::weeks(week);
        let reservation = book(&harness, d).await;
        walk_to(&harness, reservation.id, &TO_COMPLETED).await;
        harness.settle(now).await;

        let customer = harness
            .ports
            .customers
            .find_by_phone("0917 123 4567")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(customer.visit_count, week as u32 + 1);
        assert_eq!(customer.is_vip, week == 2);
    }
}

#[tokio::test]
async fn vip_status_survives_a_later_no_show() {
    let harness = Harness::new();
    let now = Timestamp::now();

    for week in 0..3 {
        let mut d = draft(&harness.hall, 4);
        d.date += Duration::weeks(week);
        let reservation = book(&harness, d).await;
        walk_to(&harness, reservation.id, &TO_COMPLETED).await;
    }
    let mut d = draft(&harness.hall, 4);
    d.date += Duration::weeks(3);
    let missed = book(&harness, d).await;
    walk_to(
        &harness,
        missed.id,
        &[ReservationStatus::Confirmed, ReservationStatus::NoShow],
    )
    .await;
    harness.settle(now).await;

    let customer = harness
        .ports
        .customers
        .find_by_phone("0917 123 4567")
        .await
        .unwrap()
        .unwrap();
    assert!(customer.is_vip);
    assert_eq!(customer.visit_count, 3);
    assert_eq!(customer.no_show_count, 1);
}

#[tokio::test]
async fn feedback_request_goes_out_two_hours_after_completion() {
    let harness = Harness::new();
    let now = Timestamp::now();
    let reservation = book(&harness, draft(&harness.hall, 2)).await;
    walk_to(&harness, reservation.id, &TO_COMPLETED).await;

    harness.settle(now).await;
    let before = harness.sent_count();

    harness.settle(now.plus(Duration::minutes(90))).await;
    assert_eq!(harness.sent_count(), before);

    harness.settle(now.plus(Duration::minutes(121))).await;
    assert_eq!(harness.sent_count(), before + 2);
    let last = harness.sms.sent().pop().unwrap();
    assert!(last.body.contains("feedback"));
}

#[tokio::test]
async fn reopened_booking_gets_no_feedback_request() {
    let harness = Harness::new();
    let now = Timestamp::now();
    let reservation = book(&harness, draft(&harness.hall, 2)).await;
    walk_to(&harness, reservation.id, &TO_COMPLETED).await;
    harness.settle(now).await;

    let supervisor = staff("sup-1", StaffRole::Supervisor);
    edit(
        &harness,
        reservation.id,
        ReservationPatch::status(ReservationStatus::Seated),
        &supervisor,
    )
    .await;
    harness.settle(now).await;
    let before = harness.sent_count();

    harness.settle(now.plus(Duration::hours(3))).await;
    assert_eq!(harness.sent_count(), before);
    let feedback_left = harness
        .ports
        .tasks
        .claim_due(now.plus(Duration::hours(3)), 10)
        .await
        .unwrap();
    assert!(feedback_left.is_empty());
}

#[tokio::test]
async fn time_change_sends_modified_message_and_keeps_reminder_flag() {
    let harness = Harness::new();
    let now = Timestamp::now();
    let reservation = book(&harness, draft(&harness.hall, 2)).await;
    walk_to(&harness, reservation.id, &[ReservationStatus::Confirmed]).await;
    harness.settle(now).await;
    let before = harness.sent_count();

    let host = staff("host-1", StaffRole::Receptionist);
    let patch = ReservationPatch {
        time: Some(NaiveTime::from_hms_opt(20, 0, 0).unwrap()),
        ..ReservationPatch::default()
    };
    let result = edit(&harness, reservation.id, patch, &host).await;
    assert!(result.changes.details_changed);
    assert!(!result.reservation.reminder_sent);

    harness.settle(now).await;
    assert_eq!(harness.sent_count(), before + 2);
    assert!(harness.sms.sent().pop().unwrap().body.contains("UPDATED"));
}

#[tokio::test]
async fn reminder_goes_out_once_four_hours_before_arrival() {
    let harness = Harness::new();
    let reservation = book(&harness, draft(&harness.hall, 2)).await;
    walk_to(&harness, reservation.id, &[ReservationStatus::Confirmed]).await;
    harness.settle(Timestamp::now()).await;
    let before = harness.sent_count();

    // 19:00 in Manila is 11:00 UTC; four hours earlier is 07:00 UTC
    let date = support::dinner_date();
    let scan_at = Timestamp::from_datetime(
        Utc.from_utc_datetime(&date.and_hms_opt(7, 0, 0).unwrap()),
    );

    assert_eq!(harness.app.reminders.handle(scan_at).await.unwrap(), 1);
    assert_eq!(harness.app.reminders.handle(scan_at).await.unwrap(), 0);

    harness.settle(scan_at).await;
    assert_eq!(harness.sent_count(), before + 2);

    let stored = harness
        .ports
        .ledger
        .find_by_id(&reservation.id)
        .await
        .unwrap()
        .unwrap();
    assert!(stored.reminder_sent);
    let history = harness.ports.ledger.history(&reservation.id).await.unwrap();
    assert_eq!(history.last().unwrap().kind, HistoryKind::System);
}

#[tokio::test]
async fn cancelled_booking_frees_the_exclusive_room() {
    let harness = Harness::new();
    let first = book(&harness, draft(&harness.vip_room, 10)).await;

    let supervisor = staff("sup-1", StaffRole::Supervisor);
    edit(
        &harness,
        first.id,
        ReservationPatch::status(ReservationStatus::Cancelled),
        &supervisor,
    )
    .await;

    let second = book(&harness, draft(&harness.vip_room, 10)).await;
    assert_eq!(second.status, ReservationStatus::Pending);
}
