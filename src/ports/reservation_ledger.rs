//! ReservationLedger port - serialized writes of reservations.
//!
//! Every write runs under an exclusive lock on the resulting booking's area.
//! While the lock is held the ledger re-tallies the slot, excluding the
//! booking being written, and re-runs the slot check. The reservation row, a
//! history entry and the outbox events are committed together.

use async_trait::async_trait;

use crate::domain::area::Area;
use crate::domain::foundation::{DomainError, EventEnvelope, ReservationId};
use crate::domain::reservation::{HistoryEntry, HistoryKind, Reservation, ReservationError};

/// Audit and outbox data committed alongside a reservation write.
#[derive(Debug, Clone)]
pub struct LedgerRecord {
    pub kind: HistoryKind,
    pub actor: String,
    pub events: Vec<EventEnvelope>,
}

impl LedgerRecord {
    pub fn new(kind: HistoryKind, actor: impl Into<String>, events: Vec<EventEnvelope>) -> Self {
        Self {
            kind,
            actor: actor.into(),
            events,
        }
    }
}

#[async_trait]
pub trait ReservationLedger: Send + Sync {
    /// Stores a new reservation.
    ///
    /// Returns `ReservationError::Conflict` when the slot check fails under
    /// the lock.
    async fn insert(
        &self,
        reservation: &Reservation,
        area: &Area,
        record: LedgerRecord,
    ) -> Result<(), ReservationError>;

    /// Replaces a stored reservation.
    ///
    /// `expected_version` is the version the caller read; a mismatch yields
    /// `Conflict(StaleVersion)`. The slot is re-checked whenever the updated
    /// booking still holds its area. The reminder flag is owned by the
    /// ledger and keeps its stored value; the committed row is returned.
    async fn update(
        &self,
        expected_version: i64,
        reservation: &Reservation,
        area: &Area,
        record: LedgerRecord,
    ) -> Result<Reservation, ReservationError>;

    async fn find_by_id(&self, id: &ReservationId) -> Result<Option<Reservation>, DomainError>;

    /// Audit trail, oldest first.
    async fn history(&self, id: &ReservationId) -> Result<Vec<HistoryEntry>, DomainError>;

    /// Sets the reminder flag if it is still unset.
    ///
    /// Returns `false` when another scan already claimed the reminder.
    async fn mark_reminder_sent(&self, id: &ReservationId) -> Result<bool, DomainError>;
}
