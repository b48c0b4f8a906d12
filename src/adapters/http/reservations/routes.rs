//! HTTP routes for reservation endpoints.

use axum::{routing::get, Router};

use super::handlers::{
    create_reservation, get_availability, get_dashboard, get_history, get_reservation,
    list_reservations, update_reservation, ReservationHandlers,
};

/// Mounted under `/api/reservations`.
pub fn reservation_routes(handlers: ReservationHandlers) -> Router {
    Router::new()
        .route("/", get(list_reservations).post(create_reservation))
        .route("/availability", get(get_availability))
        .route("/dashboard", get(get_dashboard))
        .route("/:id", get(get_reservation).patch(update_reservation))
        .route("/:id/history", get(get_history))
        .with_state(handlers)
}
