//! PostgreSQL dashboard aggregates.

use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use sqlx::{PgPool, Row};

use super::db_error;
use super::reservations::{row_to_reservation, RESERVATION_COLUMNS};
use crate::domain::dashboard::{DashboardFacts, RECENT_LIMIT, TREND_DAYS};
use crate::domain::foundation::DomainError;
use crate::ports::DashboardReader;

#[derive(Clone)]
pub struct PostgresDashboardReader {
    pool: PgPool,
}

impl PostgresDashboardReader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DashboardReader for PostgresDashboardReader {
    async fn facts(&self, today: NaiveDate) -> Result<DashboardFacts, DomainError> {
        let read = db_error("read dashboard figures");

        let totals = sqlx::query(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE r.date = $1) AS today_count,
                COUNT(*) FILTER (WHERE r.status = 'pending') AS pending_count,
                COALESCE(SUM(r.pax) FILTER (
                    WHERE r.date = $1 AND r.status IN ('confirmed', 'seated', 'completed')
                ), 0)::BIGINT AS pax_today,
                COALESCE(SUM(r.pax) FILTER (
                    WHERE r.date = $1 AND a.kind = 'exclusive'
                      AND r.status NOT IN ('cancelled', 'no_show')
                ), 0)::BIGINT AS vip_pax
            FROM reservations r
            JOIN dining_areas a ON a.id = r.area_id
            "#,
        )
        .bind(today)
        .fetch_one(&self.pool)
        .await
        .map_err(&read)?;

        let first_day = today - Duration::days(TREND_DAYS - 1);
        let daily = sqlx::query(
            r#"
            SELECT date, COUNT(*) AS bookings
            FROM reservations
            WHERE date BETWEEN $1 AND $2
            GROUP BY date
            "#,
        )
        .bind(first_day)
        .bind(today)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("read booking trend"))?;

        let sql = format!(
            "SELECT {} FROM reservations ORDER BY created_at DESC LIMIT $1",
            RESERVATION_COLUMNS
        );
        let recent = sqlx::query(&sql)
            .bind(RECENT_LIMIT as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("read recent bookings"))?;

        let mut facts = DashboardFacts {
            today_count: totals.try_get::<i64, _>("today_count").map_err(&read)? as u32,
            pending_count: totals.try_get::<i64, _>("pending_count").map_err(&read)? as u32,
            pax_today: totals.try_get::<i64, _>("pax_today").map_err(&read)? as u32,
            vip_pax: totals.try_get::<i64, _>("vip_pax").map_err(&read)? as u32,
            ..Default::default()
        };
        for row in &daily {
            let date: NaiveDate = row.try_get("date").map_err(&read)?;
            let bookings: i64 = row.try_get("bookings").map_err(&read)?;
            facts.daily_counts.insert(date, bookings as u32);
        }
        facts.recent = recent
            .iter()
            .map(row_to_reservation)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(facts)
    }
}
