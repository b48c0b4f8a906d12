//! ProcessedEventStore port - remembers which handler saw which event.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, EventId, Timestamp};

#[async_trait]
pub trait ProcessedEventStore: Send + Sync {
    async fn contains(&self, event_id: &EventId, handler_name: &str) -> Result<bool, DomainError>;

    async fn mark_processed(&self, event_id: &EventId, handler_name: &str)
        -> Result<(), DomainError>;

    async fn delete_before(&self, timestamp: Timestamp) -> Result<u64, DomainError>;
}
