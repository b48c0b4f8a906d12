//! ScheduleRemindersHandler - one pass of the reminder scan.
//!
//! Looks at confirmed bookings for today and tomorrow and queues a
//! reminder for each one whose arrival is about four hours away. The
//! reminder flag is claimed before the job is queued, so a booking is
//! reminded at most once even when scans overlap.

use std::sync::Arc;

use crate::domain::foundation::{BusinessClock, DomainError, Timestamp};
use crate::domain::notification::{
    in_reminder_window, is_reminder_candidate, NotificationJob, NotificationKind,
};
use crate::ports::{ReservationLedger, ReservationReader, TaskQueue};

pub struct ScheduleRemindersHandler {
    reader: Arc<dyn ReservationReader>,
    ledger: Arc<dyn ReservationLedger>,
    queue: Arc<dyn TaskQueue>,
    clock: BusinessClock,
}

impl ScheduleRemindersHandler {
    pub fn new(
        reader: Arc<dyn ReservationReader>,
        ledger: Arc<dyn ReservationLedger>,
        queue: Arc<dyn TaskQueue>,
        clock: BusinessClock,
    ) -> Self {
        Self {
            reader,
            ledger,
            queue,
            clock,
        }
    }

    /// Returns how many reminders were queued.
    pub async fn handle(&self, now: Timestamp) -> Result<u32, DomainError> {
        let today = self.clock.local_date(&now);
        let dates: Vec<_> = std::iter::once(today).chain(today.succ_opt()).collect();
        let candidates = self.reader.reminder_candidates(&dates).await?;
        tracing::debug!(candidates = candidates.len(), %today, "reminder scan");

        let mut queued = 0;
        for reservation in candidates {
            if !is_reminder_candidate(&reservation, today) {
                continue;
            }
            let arrival = self.clock.instant_of(reservation.date, reservation.time);
            if !in_reminder_window(arrival.duration_since(&now)) {
                continue;
            }
            if !self.ledger.mark_reminder_sent(&reservation.id).await? {
                continue;
            }

            let job = NotificationJob::new(
                reservation.id,
                NotificationKind::Reminder,
                reservation.status,
                now,
            );
            let job_id = job.id;
            if let Err(e) = self.queue.enqueue(job).await {
                // the flag is already set, so no later scan will retry this booking
                tracing::warn!(
                    job_id = %job_id,
                    reservation_id = %reservation.id,
                    error = %e,
                    "reminder flagged but job not queued"
                );
                continue;
            }
            tracing::info!(
                job_id = %job_id,
                reservation_id = %reservation.id,
                "reminder queued"
            );
            queued += 1;
        }
        Ok(queued)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryOutbox, InMemoryReservationStore, InMemoryTaskQueue};
    use crate::domain::area::{Area, AreaKind};
    use crate::domain::reservation::fixtures::draft_for;
    use crate::domain::foundation::{ErrorCode, JobId};
    use crate::domain::reservation::{HistoryKind, Reservation, ReservationStatus};
    use crate::ports::LedgerRecord;
    use chrono::{NaiveTime, TimeZone, Utc};

    struct Harness {
        store: Arc<InMemoryReservationStore>,
        queue: Arc<InMemoryTaskQueue>,
        hall: Area,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                store: Arc::new(InMemoryReservationStore::new(Arc::new(InMemoryOutbox::new()))),
                queue: Arc::new(InMemoryTaskQueue::new()),
                hall: Area::new("Main Dining Hall", AreaKind::Shared, 250).unwrap(),
            }
        }

        fn handler(&self) -> ScheduleRemindersHandler {
            ScheduleRemindersHandler::new(
                self.store.clone(),
                self.store.clone(),
                self.queue.clone(),
                BusinessClock::from_offset_minutes(480).unwrap(),
            )
        }

        async fn booking_at(&self, hour: u32, minute: u32, status: ReservationStatus) -> Reservation {
            let mut draft = draft_for(&self.hall, 2);
            draft.time = NaiveTime::from_hms_opt(hour, minute, 0).unwrap();
            let mut reservation = Reservation::create(draft, &self.hall, None).unwrap();
            reservation.status = status;
            self.store
                .insert(
                    &reservation,
                    &self.hall,
                    LedgerRecord::new(HistoryKind::Created, "public", Vec::new()),
                )
                .await
                .unwrap();
            reservation
        }
    }

    /// 11:00 in Manila on the fixture booking date.
    fn eleven_am() -> Timestamp {
        Timestamp::from_datetime(Utc.with_ymd_and_hms(2025, 3, 1, 3, 0, 0).unwrap())
    }

    #[tokio::test]
    async fn queues_only_bookings_inside_the_window() {
        let h = Harness::new();
        let on_time = h.booking_at(15, 0, ReservationStatus::Confirmed).await;
        let early_edge = h.booking_at(14, 45, ReservationStatus::Confirmed).await;
        let late_edge = h.booking_at(15, 15, ReservationStatus::Confirmed).await;
        let too_soon = h.booking_at(14, 44, ReservationStatus::Confirmed).await;
        let too_far = h.booking_at(15, 16, ReservationStatus::Confirmed).await;
        let pending = h.booking_at(15, 0, ReservationStatus::Pending).await;

        let queued = h.handler().handle(eleven_am()).await.unwrap();

        assert_eq!(queued, 3);
        let reminded: Vec<_> = h.queue.jobs().await.iter().map(|j| j.reservation_id).collect();
        assert!(reminded.contains(&on_time.id));
        assert!(reminded.contains(&early_edge.id));
        assert!(reminded.contains(&late_edge.id));
        for skipped in [&too_soon, &too_far, &pending] {
            assert!(!reminded.contains(&skipped.id));
        }
    }

    #[tokio::test]
    async fn flag_is_set_and_second_scan_sends_nothing() {
        let h = Harness::new();
        let booking = h.booking_at(15, 0, ReservationStatus::Confirmed).await;

        assert_eq!(h.handler().handle(eleven_am()).await.unwrap(), 1);
        assert_eq!(h.handler().handle(eleven_am()).await.unwrap(), 0);

        let stored = h.store.find_by_id(&booking.id).await.unwrap().unwrap();
        assert!(stored.reminder_sent);
        assert_eq!(h.queue.jobs().await.len(), 1);
        let history = h.store.history(&booking.id).await.unwrap();
        assert_eq!(history.last().map(|e| e.kind), Some(HistoryKind::System));
    }

    struct UnavailableQueue;

    #[async_trait::async_trait]
    impl TaskQueue for UnavailableQueue {
        async fn enqueue(&self, _: NotificationJob) -> Result<(), DomainError> {
            Err(DomainError::new(ErrorCode::DatabaseError, "queue down"))
        }

        async fn claim_due(&self, _: Timestamp, _: u32) -> Result<Vec<NotificationJob>, DomainError> {
            Ok(Vec::new())
        }

        async fn mark_done(&self, _: &JobId) -> Result<(), DomainError> {
            Ok(())
        }

        async fn mark_failed(&self, _: &JobId, _: &str) -> Result<(), DomainError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn queue_failure_skips_the_booking_and_finishes_the_scan() {
        let h = Harness::new();
        let first = h.booking_at(15, 0, ReservationStatus::Confirmed).await;
        let second = h.booking_at(15, 5, ReservationStatus::Confirmed).await;
        let handler = ScheduleRemindersHandler::new(
            h.store.clone(),
            h.store.clone(),
            Arc::new(UnavailableQueue),
            BusinessClock::from_offset_minutes(480).unwrap(),
        );

        assert_eq!(handler.handle(eleven_am()).await.unwrap(), 0);

        for booking in [&first, &second] {
            let stored = h.store.find_by_id(&booking.id).await.unwrap().unwrap();
            assert!(stored.reminder_sent);
        }
    }
}
