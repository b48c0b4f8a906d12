//! In-memory adapters for every storage port.
//!
//! Used by the test suites and for running the service without PostgreSQL.

mod areas;
mod customers;
mod dashboard;
mod outbox;
mod reservations;
mod tasks;

pub use areas::InMemoryAreaRegistry;
pub use customers::InMemoryCustomerDirectory;
pub use dashboard::InMemoryDashboardReader;
pub use outbox::{InMemoryOutbox, InMemoryProcessedEventStore};
pub use reservations::InMemoryReservationStore;
pub use tasks::InMemoryTaskQueue;
