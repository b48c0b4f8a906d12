//! GetReservationHandler and GetReservationHistoryHandler - single-booking reads.

use std::sync::Arc;

use crate::domain::foundation::ReservationId;
use crate::domain::reservation::{HistoryEntry, Reservation, ReservationError};
use crate::ports::ReservationLedger;

pub struct GetReservationHandler {
    ledger: Arc<dyn ReservationLedger>,
}

impl GetReservationHandler {
    pub fn new(ledger: Arc<dyn ReservationLedger>) -> Self {
        Self { ledger }
    }

    pub async fn handle(&self, id: ReservationId) -> Result<Reservation, ReservationError> {
        self.ledger
            .find_by_id(&id)
            .await?
            .ok_or_else(|| ReservationError::not_found("Reservation", id))
    }
}

/// Audit trail of one booking, oldest entry first.
pub struct GetReservationHistoryHandler {
    ledger: Arc<dyn ReservationLedger>,
}

impl GetReservationHistoryHandler {
    pub fn new(ledger: Arc<dyn ReservationLedger>) -> Self {
        Self { ledger }
    }

    pub async fn handle(&self, id: ReservationId) -> Result<Vec<HistoryEntry>, ReservationError> {
        let history = self.ledger.history(&id).await?;
        if history.is_empty() && self.ledger.find_by_id(&id).await?.is_none() {
            return Err(ReservationError::not_found("Reservation", id));
        }
        Ok(history)
    }
}
