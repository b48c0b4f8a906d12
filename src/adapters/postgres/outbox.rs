//! PostgreSQL event outbox and processed-event log.
//!
//! The ledger writes outbox rows inside its own transaction through
//! [`insert_entry`]; the publisher drains them through `OutboxWriter`.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgConnection, PgPool, Row};
use uuid::Uuid;

use super::db_error;
use crate::domain::foundation::{DomainError, ErrorCode, EventEnvelope, EventId, Timestamp};
use crate::ports::{
    OutboxEntry, OutboxStatus, OutboxWriter, ProcessedEventStore, MAX_OUTBOX_ATTEMPTS,
};

pub(super) async fn insert_entry(
    conn: &mut PgConnection,
    entry: &OutboxEntry,
) -> Result<(), DomainError> {
    sqlx::query(
        r#"
        INSERT INTO event_outbox (
            id, event_id, event_type, envelope, partition_key, status, attempts, created_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(entry.id)
    .bind(entry.event.event_id.as_str())
    .bind(&entry.event.event_type)
    .bind(Json(&entry.event))
    .bind(&entry.partition_key)
    .bind(entry.status.as_str())
    .bind(entry.attempts as i32)
    .bind(entry.created_at)
    .execute(&mut *conn)
    .await
    .map_err(db_error("write outbox entry"))?;

    Ok(())
}

fn row_to_entry(row: &PgRow) -> Result<OutboxEntry, DomainError> {
    let read = db_error("read outbox entry");
    let envelope: Json<EventEnvelope> = row.try_get("envelope").map_err(&read)?;
    let status: String = row.try_get("status").map_err(&read)?;
    let attempts: i32 = row.try_get("attempts").map_err(&read)?;

    Ok(OutboxEntry {
        id: row.try_get("id").map_err(&read)?,
        event: envelope.0,
        status: parse_status(&status)?,
        created_at: row.try_get("created_at").map_err(&read)?,
        processed_at: row.try_get("processed_at").map_err(&read)?,
        attempts: attempts as u32,
        last_error: row.try_get("last_error").map_err(&read)?,
        partition_key: row.try_get("partition_key").map_err(&read)?,
    })
}

fn parse_status(s: &str) -> Result<OutboxStatus, DomainError> {
    match s {
        "pending" => Ok(OutboxStatus::Pending),
        "published" => Ok(OutboxStatus::Published),
        "failed" => Ok(OutboxStatus::Failed),
        other => Err(DomainError::new(
            ErrorCode::DatabaseError,
            format!("Unknown outbox status: {}", other),
        )),
    }
}

#[derive(Clone)]
pub struct PostgresOutboxWriter {
    pool: PgPool,
}

impl PostgresOutboxWriter {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OutboxWriter for PostgresOutboxWriter {
    async fn write(
        &self,
        event: &EventEnvelope,
        partition_key: &str,
    ) -> Result<OutboxEntry, DomainError> {
        let entry = OutboxEntry::new(event.clone(), partition_key);
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(db_error("acquire connection"))?;
        insert_entry(&mut conn, &entry).await?;
        Ok(entry)
    }

    async fn get_pending(&self, limit: u32) -> Result<Vec<OutboxEntry>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, envelope, partition_key, status, attempts, last_error,
                   created_at, processed_at
            FROM event_outbox
            WHERE status = 'pending' OR (status = 'failed' AND attempts < $2)
            ORDER BY created_at
            LIMIT $1
            "#,
        )
        .bind(i64::from(limit))
        .bind(MAX_OUTBOX_ATTEMPTS as i32)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("fetch pending outbox entries"))?;

        rows.iter().map(row_to_entry).collect()
    }

    async fn mark_published(&self, id: Uuid) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            UPDATE event_outbox
            SET status = 'published', processed_at = NOW(), attempts = attempts + 1
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(db_error("mark outbox entry published"))?;
        Ok(())
    }

    async fn mark_failed(&self, id: Uuid, error: &str) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            UPDATE event_outbox
            SET status = 'failed', processed_at = NOW(), attempts = attempts + 1, last_error = $2
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(error)
        .execute(&self.pool)
        .await
        .map_err(db_error("mark outbox entry failed"))?;
        Ok(())
    }

    async fn cleanup_old(&self, older_than_hours: u32) -> Result<u64, DomainError> {
        let cutoff: DateTime<Utc> = Utc::now() - Duration::hours(i64::from(older_than_hours));
        let result = sqlx::query(
            "DELETE FROM event_outbox WHERE status = 'published' AND processed_at < $1",
        )
        .bind(cutoff)
        .execute(&self.pool)
        .await
        .map_err(db_error("clean up outbox"))?;
        Ok(result.rows_affected())
    }
}

#[derive(Clone)]
pub struct PostgresProcessedEventStore {
    pool: PgPool,
}

impl PostgresProcessedEventStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProcessedEventStore for PostgresProcessedEventStore {
    async fn contains(&self, event_id: &EventId, handler_name: &str) -> Result<bool, DomainError> {
        let found: Option<i32> = sqlx::query_scalar(
            "SELECT 1 FROM processed_events WHERE event_id = $1 AND handler_name = $2",
        )
        .bind(event_id.as_str())
        .bind(handler_name)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("check processed event"))?;
        Ok(found.is_some())
    }

    async fn mark_processed(
        &self,
        event_id: &EventId,
        handler_name: &str,
    ) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO processed_events (event_id, handler_name, processed_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (event_id, handler_name) DO NOTHING
            "#,
        )
        .bind(event_id.as_str())
        .bind(handler_name)
        .execute(&self.pool)
        .await
        .map_err(db_error("record processed event"))?;
        Ok(())
    }

    async fn delete_before(&self, timestamp: Timestamp) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM processed_events WHERE processed_at < $1")
            .bind(timestamp.as_datetime())
            .execute(&self.pool)
            .await
            .map_err(db_error("prune processed events"))?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outbox_status_strings_parse_back() {
        for status in [OutboxStatus::Pending, OutboxStatus::Published, OutboxStatus::Failed] {
            assert_eq!(parse_status(status.as_str()).unwrap(), status);
        }
        assert!(parse_status("sent").is_err());
    }
}
