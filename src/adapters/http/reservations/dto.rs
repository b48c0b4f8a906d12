//! HTTP DTOs for reservation endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::reservation::{ChangeSet, Reservation, ReservationPatch};

/// Body of `PATCH /api/reservations/:id`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateReservationRequest {
    #[serde(flatten)]
    pub patch: ReservationPatch,
    /// Version the client last saw. A mismatch answers 409.
    #[serde(default)]
    pub expected_version: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatedReservationResponse {
    pub message: String,
    pub area_name: String,
    pub reservation: Reservation,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdatedReservationResponse {
    pub reservation: Reservation,
    pub changes: ChangeSet,
}
