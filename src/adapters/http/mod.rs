//! HTTP adapters - REST API implementations.
//!
//! Each module has its own handlers and routes; `router` stitches them
//! together behind the auth middleware and the tower-http layers.

pub mod areas;
pub mod customers;
pub mod error;
pub mod middleware;
pub mod reservations;
pub mod router;

pub use error::{error_response, ErrorResponse};
pub use router::{api_router, health, AppState};
