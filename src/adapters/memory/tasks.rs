//! In-memory notification task queue.

use async_trait::async_trait;
use std::collections::HashSet;
use tokio::sync::Mutex;

use crate::domain::foundation::{DomainError, ErrorCode, JobId, Timestamp};
use crate::domain::notification::{JobStatus, NotificationJob};
use crate::ports::TaskQueue;

#[derive(Debug, Default)]
struct QueueState {
    jobs: Vec<NotificationJob>,
    claimed: HashSet<JobId>,
}

#[derive(Debug, Default)]
pub struct InMemoryTaskQueue {
    state: Mutex<QueueState>,
}

impl InMemoryTaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn jobs(&self) -> Vec<NotificationJob> {
        self.state.lock().await.jobs.clone()
    }

    async fn finish(
        &self,
        id: &JobId,
        status: JobStatus,
        error: Option<&str>,
    ) -> Result<(), DomainError> {
        let mut state = self.state.lock().await;
        state.claimed.remove(id);
        let job = state
            .jobs
            .iter_mut()
            .find(|j| j.id == *id)
            .ok_or_else(|| DomainError::new(ErrorCode::InternalError, "job not found"))?;
        job.status = status;
        job.attempts += 1;
        job.last_error = error.map(str::to_string);
        Ok(())
    }
}

#[async_trait]
impl TaskQueue for InMemoryTaskQueue {
    async fn enqueue(&self, job: NotificationJob) -> Result<(), DomainError> {
        self.state.lock().await.jobs.push(job);
        Ok(())
    }

    async fn claim_due(
        &self,
        now: Timestamp,
        limit: u32,
    ) -> Result<Vec<NotificationJob>, DomainError> {
        let mut state = self.state.lock().await;
        let mut due: Vec<NotificationJob> = state
            .jobs
            .iter()
            .filter(|j| j.is_due(&now) && !state.claimed.contains(&j.id))
            .cloned()
            .collect();
        due.sort_by(|a, b| a.due_at.cmp(&b.due_at));
        due.truncate(limit as usize);
        for job in &due {
            state.claimed.insert(job.id);
        }
        Ok(due)
    }

    async fn mark_done(&self, id: &JobId) -> Result<(), DomainError> {
        self.finish(id, JobStatus::Done, None).await
    }

    async fn mark_failed(&self, id: &JobId, error: &str) -> Result<(), DomainError> {
        self.finish(id, JobStatus::Failed, Some(error)).await
    }
}
