//! CreateReservationHandler - accepts a booking from the public form or from staff.

use std::sync::Arc;

use crate::domain::area::Area;
use crate::domain::foundation::{CommandMetadata, EventEnvelope};
use crate::domain::reservation::{
    check_slot, HistoryKind, Reservation, ReservationCreated, ReservationDraft, ReservationError,
    SlotUsage,
};
use crate::ports::{AreaRegistry, LedgerRecord, ReservationLedger, ReservationReader};

#[derive(Debug, Clone)]
pub struct CreateReservationCommand {
    pub draft: ReservationDraft,
}

#[derive(Debug, Clone)]
pub struct CreateReservationResult {
    pub reservation: Reservation,
    pub area: Area,
}

pub struct CreateReservationHandler {
    areas: Arc<dyn AreaRegistry>,
    ledger: Arc<dyn ReservationLedger>,
    reader: Arc<dyn ReservationReader>,
}

impl CreateReservationHandler {
    pub fn new(
        areas: Arc<dyn AreaRegistry>,
        ledger: Arc<dyn ReservationLedger>,
        reader: Arc<dyn ReservationReader>,
    ) -> Self {
        Self {
            areas,
            ledger,
            reader,
        }
    }

    /// Staff bookings carry the actor in `metadata` and may pick any status.
    /// Public bookings are always Pending.
    pub async fn handle(
        &self,
        cmd: CreateReservationCommand,
        metadata: CommandMetadata,
    ) -> Result<CreateReservationResult, ReservationError> {
        // 1. Resolve the area and build the record
        let area = self
            .areas
            .get(&cmd.draft.area_id)
            .await?
            .ok_or_else(|| ReservationError::not_found("Area", cmd.draft.area_id))?;
        let reservation = Reservation::create(cmd.draft, &area, metadata.actor.clone())?;

        // 2. Advisory check against what is booked right now
        if reservation.holds_area() {
            let bookings = self
                .reader
                .slot_bookings(reservation.date, reservation.session)
                .await?;
            let usage = SlotUsage::tally(
                bookings.iter().filter(|b| b.area_id == area.id),
                None,
            );
            check_slot(&area, &usage, reservation.pax).map_err(ReservationError::Validation)?;
        }

        // 3. Guarded write with the creation event
        let event = ReservationCreated::new(&reservation, &area.name);
        let envelope = EventEnvelope::from_event(&event)
            .map_err(|e| ReservationError::Infrastructure(e.to_string()))?
            .with_correlation_id(metadata.correlation_id())
            .with_user_id(metadata.actor_label());

        self.ledger
            .insert(
                &reservation,
                &area,
                LedgerRecord::new(HistoryKind::Created, metadata.actor_label(), vec![envelope]),
            )
            .await?;

        tracing::info!(
            reservation_id = %reservation.id,
            area = %area.name,
            date = %reservation.date,
            session = %reservation.session,
            pax = reservation.pax,
            actor = %metadata.actor_label(),
            "reservation created"
        );

        Ok(CreateReservationResult { reservation, area })
    }
}
