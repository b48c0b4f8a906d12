//! Reservation domain events.
//!
//! - `ReservationCreated` - a booking was accepted
//! - `ReservationUpdated` - a staff edit was accepted, with what changed
//!
//! Both carry the full record so consumers never read back inside the
//! writer's transaction.

use serde::{Deserialize, Serialize};

use super::{ChangeSet, Reservation};
use crate::domain::foundation::{domain_event, EventId, ReservationId, Timestamp};

pub const RESERVATION_CREATED: &str = "reservation.created.v1";
pub const RESERVATION_UPDATED: &str = "reservation.updated.v1";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationCreated {
    pub event_id: EventId,
    pub reservation_id: ReservationId,
    pub reservation: Reservation,
    /// Name of the booked area, for message templates.
    pub area_name: String,
    pub occurred_at: Timestamp,
}

domain_event!(
    ReservationCreated,
    event_type = RESERVATION_CREATED,
    schema_version = 1,
    aggregate_id = reservation_id,
    aggregate_type = "Reservation",
    occurred_at = occurred_at,
    event_id = event_id
);

impl ReservationCreated {
    pub fn new(reservation: &Reservation, area_name: impl Into<String>) -> Self {
        Self {
            event_id: EventId::new(),
            reservation_id: reservation.id,
            reservation: reservation.clone(),
            area_name: area_name.into(),
            occurred_at: reservation.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationUpdated {
    pub event_id: EventId,
    pub reservation_id: ReservationId,
    pub reservation: Reservation,
    pub area_name: String,
    pub changes: ChangeSet,
    pub occurred_at: Timestamp,
}

domain_event!(
    ReservationUpdated,
    event_type = RESERVATION_UPDATED,
    schema_version = 1,
    aggregate_id = reservation_id,
    aggregate_type = "Reservation",
    occurred_at = occurred_at,
    event_id = event_id
);

impl ReservationUpdated {
    pub fn new(reservation: &Reservation, area_name: impl Into<String>, changes: ChangeSet) -> Self {
        Self {
            event_id: EventId::new(),
            reservation_id: reservation.id,
            reservation: reservation.clone(),
            area_name: area_name.into(),
            changes,
            occurred_at: reservation.updated_at,
        }
    }
}
