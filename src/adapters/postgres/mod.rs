//! PostgreSQL adapters - Database implementations for the storage ports.
//!
//! - `PostgresAreaRegistry` - Dining areas
//! - `PostgresReservationStore` - Guarded reservation writes, history and reads
//! - `PostgresCustomerDirectory` - Guest profiles keyed by phone
//! - `PostgresTaskQueue` - Notification jobs claimed with `SKIP LOCKED`
//! - `PostgresOutboxWriter` / `PostgresProcessedEventStore` - Event delivery
//! - `PostgresDashboardReader` - Aggregates for the staff dashboard

mod areas;
mod customers;
mod dashboard;
mod outbox;
mod reservations;
mod tasks;

pub use areas::PostgresAreaRegistry;
pub use customers::PostgresCustomerDirectory;
pub use dashboard::PostgresDashboardReader;
pub use outbox::{PostgresOutboxWriter, PostgresProcessedEventStore};
pub use reservations::PostgresReservationStore;
pub use tasks::PostgresTaskQueue;

use sqlx::PgPool;

use crate::domain::foundation::{DomainError, ErrorCode};

/// Runs the embedded migrations in `migrations/`.
pub async fn run_migrations(pool: &PgPool) -> Result<(), DomainError> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| DomainError::new(ErrorCode::DatabaseError, format!("Migration failed: {}", e)))
}

/// Maps a sqlx failure to a `DatabaseError` naming what was attempted.
fn db_error(action: &'static str) -> impl Fn(sqlx::Error) -> DomainError {
    move |e| DomainError::new(ErrorCode::DatabaseError, format!("Failed to {}: {}", action, e))
}
