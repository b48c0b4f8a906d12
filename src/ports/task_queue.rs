//! TaskQueue port - durable notification jobs.

use async_trait::async_trait;
use chrono::Duration;

use crate::domain::foundation::{DomainError, JobId, Timestamp};
use crate::domain::notification::NotificationJob;

#[async_trait]
pub trait TaskQueue: Send + Sync {
    async fn enqueue(&self, job: NotificationJob) -> Result<(), DomainError>;

    /// Enqueues a job that becomes due `delay` after its current due time.
    async fn enqueue_delayed(
        &self,
        mut job: NotificationJob,
        delay: Duration,
    ) -> Result<(), DomainError> {
        job.due_at = job.due_at.plus(delay);
        self.enqueue(job).await
    }

    /// Claims up to `limit` pending jobs due at `now`.
    ///
    /// A claimed job is not handed to another worker until it is marked.
    async fn claim_due(&self, now: Timestamp, limit: u32)
        -> Result<Vec<NotificationJob>, DomainError>;

    async fn mark_done(&self, id: &JobId) -> Result<(), DomainError>;

    async fn mark_failed(&self, id: &JobId, error: &str) -> Result<(), DomainError>;
}
