//! In-memory outbox and processed-event store.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::collections::HashSet;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, ErrorCode, EventEnvelope, EventId, Timestamp};
use crate::ports::{OutboxEntry, OutboxStatus, OutboxWriter, ProcessedEventStore, MAX_OUTBOX_ATTEMPTS};

#[derive(Debug, Default)]
pub struct InMemoryOutbox {
    entries: RwLock<Vec<OutboxEntry>>,
}

impl InMemoryOutbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) async fn push(&self, entry: OutboxEntry) {
        self.entries.write().await.push(entry);
    }

    pub async fn entries(&self) -> Vec<OutboxEntry> {
        self.entries.read().await.clone()
    }

    async fn update(&self, id: Uuid, f: impl FnOnce(&mut OutboxEntry)) -> Result<(), DomainError> {
        let mut entries = self.entries.write().await;
        let entry = entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| DomainError::new(ErrorCode::InternalError, "outbox entry not found"))?;
        f(entry);
        Ok(())
    }
}

#[async_trait]
impl OutboxWriter for InMemoryOutbox {
    async fn write(
        &self,
        event: &EventEnvelope,
        partition_key: &str,
    ) -> Result<OutboxEntry, DomainError> {
        let entry = OutboxEntry::new(event.clone(), partition_key);
        self.push(entry.clone()).await;
        Ok(entry)
    }

    async fn get_pending(&self, limit: u32) -> Result<Vec<OutboxEntry>, DomainError> {
        Ok(self
            .entries
            .read()
            .await
            .iter()
            .filter(|e| match e.status {
                OutboxStatus::Pending => true,
                OutboxStatus::Failed => e.attempts < MAX_OUTBOX_ATTEMPTS,
                OutboxStatus::Published => false,
            })
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn mark_published(&self, id: Uuid) -> Result<(), DomainError> {
        self.update(id, OutboxEntry::mark_published).await
    }

    async fn mark_failed(&self, id: Uuid, error: &str) -> Result<(), DomainError> {
        self.update(id, |e| e.mark_failed(error)).await
    }

    async fn cleanup_old(&self, older_than_hours: u32) -> Result<u64, DomainError> {
        let cutoff = Utc::now() - Duration::hours(i64::from(older_than_hours));
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|e| !(e.status == OutboxStatus::Published && e.created_at < cutoff));
        Ok((before - entries.len()) as u64)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryProcessedEventStore {
    processed: RwLock<HashSet<(String, String)>>,
}

impl InMemoryProcessedEventStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProcessedEventStore for InMemoryProcessedEventStore {
    async fn contains(&self, event_id: &EventId, handler_name: &str) -> Result<bool, DomainError> {
        let key = (event_id.as_str().to_string(), handler_name.to_string());
        Ok(self.processed.read().await.contains(&key))
    }

    async fn mark_processed(
        &self,
        event_id: &EventId,
        handler_name: &str,
    ) -> Result<(), DomainError> {
        let key = (event_id.as_str().to_string(), handler_name.to_string());
        self.processed.write().await.insert(key);
        Ok(())
    }

    async fn delete_before(&self, _timestamp: Timestamp) -> Result<u64, DomainError> {
        // No timestamps are kept in memory.
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn failed_entries_retry_until_attempt_limit() {
        let outbox = InMemoryOutbox::new();
        let entry = outbox.write(&EventEnvelope::test_fixture(), "r-1").await.unwrap();

        for _ in 0..MAX_OUTBOX_ATTEMPTS - 1 {
            outbox.mark_failed(entry.id, "boom").await.unwrap();
            assert_eq!(outbox.get_pending(10).await.unwrap().len(), 1);
        }
        outbox.mark_failed(entry.id, "boom").await.unwrap();
        assert!(outbox.get_pending(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn published_entries_leave_the_queue() {
        let outbox = InMemoryOutbox::new();
        let entry = outbox.write(&EventEnvelope::test_fixture(), "r-1").await.unwrap();

        outbox.mark_published(entry.id).await.unwrap();

        assert!(outbox.get_pending(10).await.unwrap().is_empty());
        assert_eq!(outbox.cleanup_old(0).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn processed_store_tracks_per_handler() {
        let store = InMemoryProcessedEventStore::new();
        let id = EventId::from_string("evt-1");

        store.mark_processed(&id, "customer_sync").await.unwrap();

        assert!(store.contains(&id, "customer_sync").await.unwrap());
        assert!(!store.contains(&id, "notification_planner").await.unwrap());
    }
}
