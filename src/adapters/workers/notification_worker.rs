//! NotificationWorker - drains due jobs from the task queue.
//!
//! Each claimed job is handed to the dispatcher once. Success or a skip
//! marks it done; a transport or storage failure marks it failed with the
//! error text. Failed jobs are not retried.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time;

use crate::application::handlers::{DispatchOutcome, NotificationDispatcher};
use crate::domain::foundation::{DomainError, Timestamp};
use crate::ports::TaskQueue;

pub struct NotificationWorker {
    queue: Arc<dyn TaskQueue>,
    dispatcher: Arc<NotificationDispatcher>,
    poll_interval: Duration,
    batch_size: u32,
}

impl NotificationWorker {
    pub fn new(
        queue: Arc<dyn TaskQueue>,
        dispatcher: Arc<NotificationDispatcher>,
        poll_interval: Duration,
        batch_size: u32,
    ) -> Self {
        Self {
            queue,
            dispatcher,
            poll_interval,
            batch_size,
        }
    }

    /// Polls until `shutdown` flips to `true`.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut interval = time::interval(self.poll_interval);
        tracing::info!(
            poll_ms = self.poll_interval.as_millis() as u64,
            batch_size = self.batch_size,
            "notification worker started"
        );

        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        tracing::info!("notification worker stopped");
                        return;
                    }
                }
                _ = interval.tick() => {
                    if let Err(e) = self.process_due(Timestamp::now()).await {
                        tracing::error!(error = %e, "notification poll failed");
                    }
                }
            }
        }
    }

    /// Runs every job due at `now`, up to the batch size. Returns how many
    /// jobs finished without error.
    pub async fn process_due(&self, now: Timestamp) -> Result<usize, DomainError> {
        let jobs = self.queue.claim_due(now, self.batch_size).await?;
        if !jobs.is_empty() {
            tracing::debug!(count = jobs.len(), "dispatching notification jobs");
        }

        let mut done = 0;
        for job in jobs {
            match self.dispatcher.dispatch(&job).await {
                Ok(outcome) => {
                    if let DispatchOutcome::Skipped(reason) = outcome {
                        tracing::debug!(job_id = %job.id, reason, "job had nothing to send");
                    }
                    self.queue.mark_done(&job.id).await?;
                    done += 1;
                }
                Err(e) => {
                    tracing::warn!(
                        job_id = %job.id,
                        reservation_id = %job.reservation_id,
                        kind = job.kind.as_str(),
                        error = %e.message,
                        "notification job failed"
                    );
                    self.queue.mark_failed(&job.id, &e.message).await?;
                }
            }
        }
        Ok(done)
    }
}
