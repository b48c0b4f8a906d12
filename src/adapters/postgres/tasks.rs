//! PostgreSQL notification job queue.
//!
//! Workers claim due jobs with `FOR UPDATE SKIP LOCKED` and stamp
//! `claimed_at`, so several instances never pick up the same job. A claim
//! that is never finished becomes claimable again after [`CLAIM_TIMEOUT_MINUTES`].

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use super::db_error;
use crate::domain::foundation::{DomainError, JobId, ReservationId, Timestamp};
use crate::domain::notification::{JobStatus, NotificationJob, NotificationKind};
use crate::domain::reservation::ReservationStatus;
use crate::ports::TaskQueue;

pub const CLAIM_TIMEOUT_MINUTES: i64 = 10;

#[derive(Clone)]
pub struct PostgresTaskQueue {
    pool: PgPool,
}

impl PostgresTaskQueue {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn finish(
        &self,
        id: &JobId,
        status: JobStatus,
        error: Option<&str>,
    ) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            UPDATE notification_jobs
            SET status = $2, attempts = attempts + 1, last_error = $3
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .bind(status.as_str())
        .bind(error)
        .execute(&self.pool)
        .await
        .map_err(db_error("finish notification job"))?;
        Ok(())
    }
}

fn row_to_job(row: &PgRow) -> Result<NotificationJob, DomainError> {
    let read = db_error("read notification job");
    let kind: String = row.try_get("kind").map_err(&read)?;
    let trigger_status: String = row.try_get("trigger_status").map_err(&read)?;
    let status: String = row.try_get("status").map_err(&read)?;
    let attempts: i32 = row.try_get("attempts").map_err(&read)?;
    let due_at: DateTime<Utc> = row.try_get("due_at").map_err(&read)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(&read)?;

    Ok(NotificationJob {
        id: JobId::from_uuid(row.try_get("id").map_err(&read)?),
        reservation_id: ReservationId::from_uuid(row.try_get("reservation_id").map_err(&read)?),
        kind: NotificationKind::parse(&kind)?,
        trigger_status: ReservationStatus::parse(&trigger_status)?,
        due_at: Timestamp::from_datetime(due_at),
        status: JobStatus::parse(&status)?,
        attempts: attempts as u32,
        last_error: row.try_get("last_error").map_err(&read)?,
        created_at: Timestamp::from_datetime(created_at),
    })
}

#[async_trait]
impl TaskQueue for PostgresTaskQueue {
    async fn enqueue(&self, job: NotificationJob) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO notification_jobs (
                id, reservation_id, kind, trigger_status, due_at, status, attempts, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(job.id.as_uuid())
        .bind(job.reservation_id.as_uuid())
        .bind(job.kind.as_str())
        .bind(job.trigger_status.as_str())
        .bind(job.due_at.as_datetime())
        .bind(job.status.as_str())
        .bind(job.attempts as i32)
        .bind(job.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("enqueue notification job"))?;
        Ok(())
    }

    async fn claim_due(
        &self,
        now: Timestamp,
        limit: u32,
    ) -> Result<Vec<NotificationJob>, DomainError> {
        let stale_claim = *now.as_datetime() - Duration::minutes(CLAIM_TIMEOUT_MINUTES);
        let rows = sqlx::query(
            r#"
            UPDATE notification_jobs SET claimed_at = $1
            WHERE id IN (
                SELECT id FROM notification_jobs
                WHERE status = 'pending'
                  AND due_at <= $1
                  AND (claimed_at IS NULL OR claimed_at < $3)
                ORDER BY due_at
                LIMIT $2
                FOR UPDATE SKIP LOCKED
            )
            RETURNING id, reservation_id, kind, trigger_status, due_at, status,
                      attempts, last_error, created_at
            "#,
        )
        .bind(now.as_datetime())
        .bind(i64::from(limit))
        .bind(stale_claim)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("claim notification jobs"))?;

        let mut jobs = rows
            .iter()
            .map(row_to_job)
            .collect::<Result<Vec<_>, _>>()?;
        jobs.sort_by(|a, b| a.due_at.cmp(&b.due_at));
        Ok(jobs)
    }

    async fn mark_done(&self, id: &JobId) -> Result<(), DomainError> {
        self.finish(id, JobStatus::Done, None).await
    }

    async fn mark_failed(&self, id: &JobId, error: &str) -> Result<(), DomainError> {
        self.finish(id, JobStatus::Failed, Some(error)).await
    }
}
