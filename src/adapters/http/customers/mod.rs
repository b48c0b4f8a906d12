//! HTTP adapter for the customer directory.

mod handlers;

use axum::{routing::get, Router};

pub use handlers::CustomerHandlers;
use handlers::{delete_customer, get_customer, list_customers, update_customer};

/// Mounted under `/api/customers`.
pub fn customer_routes(handlers: CustomerHandlers) -> Router {
    Router::new()
        .route("/", get(list_customers))
        .route(
            "/:id",
            get(get_customer)
                .patch(update_customer)
                .delete(delete_customer),
        )
        .with_state(handlers)
}
