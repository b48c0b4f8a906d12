//! Event delivery adapters.
//!
//! - `InProcessEventBus` - Dispatches envelopes to handlers in this process
//! - `IdempotentHandler` - Wrapper for at-most-once event processing
//! - `OutboxPublisher` - Background service moving outbox entries onto the bus

mod idempotent_handler;
mod in_process;
mod outbox_publisher;

pub use idempotent_handler::IdempotentHandler;
pub use in_process::InProcessEventBus;
pub use outbox_publisher::{OutboxPublisher, OutboxPublisherConfig};
