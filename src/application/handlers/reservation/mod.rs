//! Reservation command and query handlers.

mod create_reservation;
mod get_reservation;
mod list_reservations;
mod update_reservation;

pub use create_reservation::{
    CreateReservationCommand, CreateReservationHandler, CreateReservationResult,
};
pub use get_reservation::{GetReservationHandler, GetReservationHistoryHandler};
pub use list_reservations::ListReservationsHandler;
pub use update_reservation::{
    UpdateReservationCommand, UpdateReservationHandler, UpdateReservationResult,
};
