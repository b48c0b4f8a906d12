//! OutboxPublisher - moves committed events onto the event bus.
//!
//! The ledger writes events to the outbox in the same transaction as the
//! reservation. This service polls the outbox and hands each entry to the
//! publisher. A failed delivery is recorded on the entry and retried on a
//! later poll until it reaches the attempt limit.
//!
//! On shutdown the current batch is finished before the loop exits.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time;

use crate::config::WorkersConfig;
use crate::domain::foundation::DomainError;
use crate::ports::{EventPublisher, OutboxWriter};

#[derive(Debug, Clone)]
pub struct OutboxPublisherConfig {
    pub poll_interval: Duration,
    pub batch_size: u32,
}

impl Default for OutboxPublisherConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(500),
            batch_size: 50,
        }
    }
}

impl OutboxPublisherConfig {
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_batch_size(mut self, size: u32) -> Self {
        self.batch_size = size;
        self
    }
}

impl From<&WorkersConfig> for OutboxPublisherConfig {
    fn from(workers: &WorkersConfig) -> Self {
        Self {
            poll_interval: workers.outbox_poll_interval(),
            batch_size: workers.outbox_batch_size,
        }
    }
}

pub struct OutboxPublisher {
    outbox: Arc<dyn OutboxWriter>,
    event_publisher: Arc<dyn EventPublisher>,
    config: OutboxPublisherConfig,
}

impl OutboxPublisher {
    pub fn new(outbox: Arc<dyn OutboxWriter>, event_publisher: Arc<dyn EventPublisher>) -> Self {
        Self::with_config(outbox, event_publisher, OutboxPublisherConfig::default())
    }

    pub fn with_config(
        outbox: Arc<dyn OutboxWriter>,
        event_publisher: Arc<dyn EventPublisher>,
        config: OutboxPublisherConfig,
    ) -> Self {
        Self {
            outbox,
            event_publisher,
            config,
        }
    }

    /// Polls until `shutdown` flips to `true`.
    ///
    /// Storage errors during a poll are logged and the loop carries on.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut interval = time::interval(self.config.poll_interval);
        tracing::info!(
            poll_ms = self.config.poll_interval.as_millis() as u64,
            batch_size = self.config.batch_size,
            "outbox publisher started"
        );

        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        if let Err(e) = self.process_batch().await {
                            tracing::error!(error = %e, "final outbox batch failed");
                        }
                        tracing::info!("outbox publisher stopped");
                        return;
                    }
                }
                _ = interval.tick() => {
                    if let Err(e) = self.process_batch().await {
                        tracing::error!(error = %e, "outbox poll failed");
                    }
                }
            }
        }
    }

    /// Publishes one batch and returns how many entries were delivered.
    pub async fn process_batch(&self) -> Result<usize, DomainError> {
        let entries = self.outbox.get_pending(self.config.batch_size).await?;
        if !entries.is_empty() {
            tracing::debug!(count = entries.len(), "publishing outbox batch");
        }
        let mut published_count = 0;

        for entry in entries {
            match self.event_publisher.publish(entry.event.clone()).await {
                Ok(()) => {
                    self.outbox.mark_published(entry.id).await?;
                    published_count += 1;
                }
                Err(e) => {
                    tracing::warn!(
                        event_id = %entry.event.event_id,
                        event_type = %entry.event.event_type,
                        attempt = entry.attempts + 1,
                        error = %e,
                        "failed to publish outbox entry"
                    );
                    self.outbox.mark_failed(entry.id, &e.to_string()).await?;
                }
            }
        }

        Ok(published_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::events::InProcessEventBus;
    use crate::adapters::memory::InMemoryOutbox;
    use crate::domain::foundation::{ErrorCode, EventEnvelope, EventId};

    fn envelope(id: &str) -> EventEnvelope {
        let mut e = EventEnvelope::test_fixture();
        e.event_id = EventId::from_string(id);
        e
    }

    struct FailingPublisher;

    #[async_trait::async_trait]
    impl EventPublisher for FailingPublisher {
        async fn publish(&self, _: EventEnvelope) -> Result<(), DomainError> {
            Err(DomainError::new(ErrorCode::InternalError, "bus down"))
        }

        async fn publish_all(&self, _: Vec<EventEnvelope>) -> Result<(), DomainError> {
            Err(DomainError::new(ErrorCode::InternalError, "bus down"))
        }
    }

    #[tokio::test]
    async fn publishes_pending_entries_once() {
        let outbox = Arc::new(InMemoryOutbox::new());
        let bus = Arc::new(InProcessEventBus::recording());
        outbox.write(&envelope("evt-1"), "r-1").await.unwrap();
        outbox.write(&envelope("evt-2"), "r-1").await.unwrap();

        let publisher = OutboxPublisher::new(outbox.clone(), bus.clone());

        assert_eq!(publisher.process_batch().await.unwrap(), 2);
        assert_eq!(publisher.process_batch().await.unwrap(), 0);
        assert_eq!(bus.event_count(), 2);
    }

    #[tokio::test]
    async fn respects_batch_size() {
        let outbox = Arc::new(InMemoryOutbox::new());
        let bus = Arc::new(InProcessEventBus::new());
        for i in 0..5 {
            outbox.write(&envelope(&format!("evt-{}", i)), "r-1").await.unwrap();
        }
        let config = OutboxPublisherConfig::default().with_batch_size(2);
        let publisher = OutboxPublisher::with_config(outbox.clone(), bus, config);

        assert_eq!(publisher.process_batch().await.unwrap(), 2);
        assert_eq!(publisher.process_batch().await.unwrap(), 2);
        assert_eq!(publisher.process_batch().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn failed_delivery_is_recorded_on_the_entry() {
        let outbox = Arc::new(InMemoryOutbox::new());
        outbox.write(&envelope("evt-fail"), "r-1").await.unwrap();
        let publisher = OutboxPublisher::new(outbox.clone(), Arc::new(FailingPublisher));

        assert_eq!(publisher.process_batch().await.unwrap(), 0);

        let entries = outbox.entries().await;
        assert_eq!(entries[0].attempts, 1);
        assert!(entries[0].last_error.as_deref().unwrap().contains("bus down"));
    }

    #[tokio::test]
    async fn run_drains_and_stops_on_shutdown() {
        let outbox = Arc::new(InMemoryOutbox::new());
        let bus = Arc::new(InProcessEventBus::recording());
        outbox.write(&envelope("evt-1"), "r-1").await.unwrap();

        let config = OutboxPublisherConfig::default().with_poll_interval(Duration::from_millis(10));
        let publisher = OutboxPublisher::with_config(outbox.clone(), bus.clone(), config);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(async move { publisher.run(shutdown_rx).await });

        tokio::time::sleep(Duration::from_millis(50)).await;
        shutdown_tx.send(true).unwrap();
        handle.await.unwrap();

        assert_eq!(bus.event_count(), 1);
    }

    #[test]
    fn config_follows_worker_settings() {
        let workers = WorkersConfig {
            outbox_poll_ms: 250,
            outbox_batch_size: 10,
            ..Default::default()
        };
        let config = OutboxPublisherConfig::from(&workers);
        assert_eq!(config.poll_interval, Duration::from_millis(250));
        assert_eq!(config.batch_size, 10);
    }
}
