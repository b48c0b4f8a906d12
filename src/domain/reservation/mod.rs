//! Reservation domain module.
//!
//! The booking record, its lifecycle state machine, the slot occupancy
//! rules shared by the availability view and the guarded write, and the
//! role policy gating status changes.
//!
//! # Events
//!
//! - `ReservationCreated` - a booking was accepted
//! - `ReservationUpdated` - a staff edit was accepted

mod aggregate;
mod authorizer;
mod errors;
mod events;
mod history;
mod occupancy;
mod status;

pub use aggregate::{ChangeSet, Reservation, ReservationDraft, ReservationPatch};
pub use authorizer::LifecycleAuthorizer;
pub use errors::{Rejection, ReservationError};
pub use events::{ReservationCreated, ReservationUpdated, RESERVATION_CREATED, RESERVATION_UPDATED};
pub use history::{HistoryEntry, HistoryKind};
pub use occupancy::{check_slot, AreaAvailability, Slot, SlotBooking, SlotUsage};
pub use status::{BookingSource, MealSession, ReservationStatus};

#[cfg(test)]
pub(crate) use aggregate::fixtures;
