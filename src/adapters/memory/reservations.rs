//! In-memory reservation ledger and reader.
//!
//! A tokio mutex per area plays the part of the row lock: writes into the
//! same area are serialized, writes into different areas run in parallel.
//! The record, its history entry and its outbox events are stored under one
//! state lock, so readers never see a partial write.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use crate::domain::area::Area;
use crate::domain::foundation::{AreaId, DomainError, ErrorCode, ReservationId};
use crate::domain::reservation::{
    check_slot, HistoryEntry, HistoryKind, MealSession, Rejection, Reservation, ReservationError,
    ReservationStatus, SlotBooking, SlotUsage,
};
use crate::ports::{
    LedgerRecord, OutboxEntry, ReservationFilter, ReservationLedger, ReservationReader,
};

use super::InMemoryOutbox;

#[derive(Default)]
struct LedgerState {
    reservations: HashMap<ReservationId, Reservation>,
    history: HashMap<ReservationId, Vec<HistoryEntry>>,
}

pub struct InMemoryReservationStore {
    state: RwLock<LedgerState>,
    area_locks: Mutex<HashMap<AreaId, Arc<Mutex<()>>>>,
    outbox: Arc<InMemoryOutbox>,
}

impl InMemoryReservationStore {
    pub fn new(outbox: Arc<InMemoryOutbox>) -> Self {
        Self {
            state: RwLock::new(LedgerState::default()),
            area_locks: Mutex::new(HashMap::new()),
            outbox,
        }
    }

    /// Every stored reservation, for projections built in memory.
    pub async fn all(&self) -> Vec<Reservation> {
        self.state.read().await.reservations.values().cloned().collect()
    }

    async fn area_lock(&self, area_id: AreaId) -> Arc<Mutex<()>> {
        let mut locks = self.area_locks.lock().await;
        Arc::clone(locks.entry(area_id).or_default())
    }

    fn admit(state: &LedgerState, reservation: &Reservation, area: &Area) -> Result<(), Rejection> {
        if !reservation.holds_area() {
            return Ok(());
        }
        let slot = reservation.slot();
        let bookings: Vec<SlotBooking> = state
            .reservations
            .values()
            .filter(|r| r.slot() == slot)
            .map(Reservation::as_slot_booking)
            .collect();
        let usage = SlotUsage::tally(bookings.iter(), Some(reservation.id));
        check_slot(area, &usage, reservation.pax)
    }

    async fn commit(&self, state: &mut LedgerState, reservation: &Reservation, record: LedgerRecord) {
        let trail = state.history.entry(reservation.id).or_default();
        let sequence = trail.len() as i64 + 1;
        trail.push(HistoryEntry::new(sequence, record.kind, record.actor, reservation));
        state.reservations.insert(reservation.id, reservation.clone());

        let partition = reservation.id.to_string();
        for event in record.events {
            self.outbox.push(OutboxEntry::new(event, partition.clone())).await;
        }
    }
}

#[async_trait]
impl ReservationLedger for InMemoryReservationStore {
    async fn insert(
        &self,
        reservation: &Reservation,
        area: &Area,
        record: LedgerRecord,
    ) -> Result<(), ReservationError> {
        let lock = self.area_lock(area.id).await;
        let _guard = lock.lock().await;

        let mut state = self.state.write().await;
        if state.reservations.contains_key(&reservation.id) {
            return Err(DomainError::new(ErrorCode::DatabaseError, "duplicate reservation id").into());
        }
        Self::admit(&state, reservation, area).map_err(ReservationError::Conflict)?;
        self.commit(&mut state, reservation, record).await;
        Ok(())
    }

    async fn update(
        &self,
        expected_version: i64,
        reservation: &Reservation,
        area: &Area,
        record: LedgerRecord,
    ) -> Result<Reservation, ReservationError> {
        let lock = self.area_lock(area.id).await;
        let _guard = lock.lock().await;

        let mut state = self.state.write().await;
        let stored = state
            .reservations
            .get(&reservation.id)
            .ok_or_else(|| ReservationError::not_found("Reservation", reservation.id))?;
        if stored.version != expected_version {
            return Err(ReservationError::Conflict(Rejection::StaleVersion));
        }
        // the reminder scan flips this flag without a version bump
        let mut committed = reservation.clone();
        committed.reminder_sent = stored.reminder_sent;

        Self::admit(&state, &committed, area).map_err(ReservationError::Conflict)?;
        self.commit(&mut state, &committed, record).await;
        Ok(committed)
    }

    async fn find_by_id(&self, id: &ReservationId) -> Result<Option<Reservation>, DomainError> {
        Ok(self.state.read().await.reservations.get(id).cloned())
    }

    async fn history(&self, id: &ReservationId) -> Result<Vec<HistoryEntry>, DomainError> {
        Ok(self
            .state
            .read()
            .await
            .history
            .get(id)
            .cloned()
            .unwrap_or_default())
    }

    async fn mark_reminder_sent(&self, id: &ReservationId) -> Result<bool, DomainError> {
        let mut state = self.state.write().await;
        let Some(reservation) = state.reservations.get_mut(id) else {
            return Ok(false);
        };
        if reservation.reminder_sent {
            return Ok(false);
        }
        reservation.reminder_sent = true;
        let snapshot = reservation.clone();
        let trail = state.history.entry(*id).or_default();
        let sequence = trail.len() as i64 + 1;
        trail.push(HistoryEntry::new(sequence, HistoryKind::System, "system", &snapshot));
        Ok(true)
    }
}

#[async_trait]
impl ReservationReader for InMemoryReservationStore {
    async fn slot_bookings(
        &self,
        date: NaiveDate,
        session: MealSession,
    ) -> Result<Vec<SlotBooking>, DomainError> {
        Ok(self
            .state
            .read()
            .await
            .reservations
            .values()
            .filter(|r| r.date == date && r.session == session)
            .map(Reservation::as_slot_booking)
            .collect())
    }

    async fn list(&self, filter: &ReservationFilter) -> Result<Vec<Reservation>, DomainError> {
        let mut found: Vec<Reservation> = self
            .state
            .read()
            .await
            .reservations
            .values()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.date.cmp(&a.date).then(b.time.cmp(&a.time)));
        Ok(found)
    }

    async fn reminder_candidates(
        &self,
        dates: &[NaiveDate],
    ) -> Result<Vec<Reservation>, DomainError> {
        Ok(self
            .state
            .read()
            .await
            .reservations
            .values()
            .filter(|r| {
                r.status == ReservationStatus::Confirmed
                    && !r.reminder_sent
                    && dates.contains(&r.date)
            })
            .cloned()
            .collect())
    }
}
