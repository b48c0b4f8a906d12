//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Writes go through the reservation ledger; reads use the reader ports.

pub mod handlers;

pub use handlers::*;
