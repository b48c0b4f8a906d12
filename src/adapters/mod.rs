//! Adapters - Implementations of port interfaces.
//!
//! - `auth` - Bearer token validation
//! - `events` - In-process event bus, outbox publisher, idempotent handlers
//! - `http` - axum REST API
//! - `memory` - In-memory storage for tests and local runs
//! - `notify` - Email and SMS gateways
//! - `postgres` - PostgreSQL storage
//! - `workers` - Notification delivery and reminder scan loops

pub mod auth;
pub mod events;
pub mod http;
pub mod memory;
pub mod notify;
pub mod postgres;
pub mod workers;

pub use events::{IdempotentHandler, InProcessEventBus, OutboxPublisher, OutboxPublisherConfig};
