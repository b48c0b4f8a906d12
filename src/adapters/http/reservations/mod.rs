//! HTTP adapter for reservations, availability and the staff dashboard.

mod dto;
mod handlers;
mod routes;

pub use dto::{CreatedReservationResponse, UpdateReservationRequest, UpdatedReservationResponse};
pub use handlers::ReservationHandlers;
pub use routes::reservation_routes;
