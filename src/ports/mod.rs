//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Storage Ports
//!
//! - `AreaRegistry` - Dining areas
//! - `ReservationLedger` - Locked, versioned reservation writes with history
//! - `ReservationReader` / `DashboardReader` - Read-side queries
//! - `CustomerDirectory` - Guest profiles
//! - `TaskQueue` - Pending notification jobs
//!
//! ## Event Ports
//!
//! - `OutboxWriter` - Events committed with the reservation write
//! - `EventPublisher` / `EventSubscriber` / `EventHandler` - In-process delivery
//! - `ProcessedEventStore` - Idempotency tracking for event handlers
//!
//! ## Delivery and Access
//!
//! - `EmailTransport` / `SmsTransport` - Outbound messages
//! - `SessionValidator` - Staff bearer tokens

mod area_registry;
mod customer_directory;
mod dashboard_reader;
mod event_publisher;
mod event_subscriber;
mod notification_transport;
mod outbox_writer;
mod processed_event_store;
mod reservation_ledger;
mod reservation_reader;
mod session_validator;
mod task_queue;

pub use area_registry::AreaRegistry;
pub use customer_directory::CustomerDirectory;
pub use dashboard_reader::DashboardReader;
pub use event_publisher::EventPublisher;
pub use event_subscriber::{EventBus, EventHandler, EventSubscriber};
pub use notification_transport::{EmailTransport, SmsTransport};
pub use outbox_writer::{OutboxEntry, OutboxStatus, OutboxWriter, MAX_OUTBOX_ATTEMPTS};
pub use processed_event_store::ProcessedEventStore;
pub use reservation_ledger::{LedgerRecord, ReservationLedger};
pub use reservation_reader::{ReservationFilter, ReservationReader};
pub use session_validator::SessionValidator;
pub use task_queue::TaskQueue;
