//! PostgreSQL reservation ledger and reader.
//!
//! Every write runs in one transaction that locks the area row first, so
//! writes into the same area are serialized while other areas proceed. The
//! slot check, the row write, the history entry and the outbox events all
//! commit or roll back together.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder, Row};

use super::areas::lock_area;
use super::db_error;
use super::outbox::insert_entry;
use crate::domain::area::Area;
use crate::domain::foundation::{
    AreaId, DomainError, ErrorCode, ReservationId, StaffId, Timestamp,
};
use crate::domain::reservation::{
    check_slot, BookingSource, HistoryEntry, HistoryKind, MealSession, Rejection, Reservation,
    ReservationError, ReservationStatus, SlotBooking, SlotUsage,
};
use crate::ports::{
    LedgerRecord, OutboxEntry, ReservationFilter, ReservationLedger, ReservationReader,
};

pub(super) const RESERVATION_COLUMNS: &str = "id, customer_name, customer_contact, customer_email, \
     area_id, date, session, time, pax, special_request, status, source, reminder_sent, \
     created_by, last_modified_by, created_at, updated_at, version";

#[derive(Clone)]
pub struct PostgresReservationStore {
    pool: PgPool,
}

impl PostgresReservationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

pub(super) fn row_to_reservation(row: &PgRow) -> Result<Reservation, DomainError> {
    let read = db_error("read reservation");
    let session: String = row.try_get("session").map_err(&read)?;
    let status: String = row.try_get("status").map_err(&read)?;
    let source: String = row.try_get("source").map_err(&read)?;
    let pax: i32 = row.try_get("pax").map_err(&read)?;
    let created_by: Option<String> = row.try_get("created_by").map_err(&read)?;
    let last_modified_by: Option<String> = row.try_get("last_modified_by").map_err(&read)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(&read)?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at").map_err(&read)?;

    Ok(Reservation {
        id: ReservationId::from_uuid(row.try_get("id").map_err(&read)?),
        customer_name: row.try_get("customer_name").map_err(&read)?,
        customer_contact: row.try_get("customer_contact").map_err(&read)?,
        customer_email: row.try_get("customer_email").map_err(&read)?,
        area_id: AreaId::from_uuid(row.try_get("area_id").map_err(&read)?),
        date: row.try_get("date").map_err(&read)?,
        session: MealSession::parse(&session)?,
        time: row.try_get("time").map_err(&read)?,
        pax: pax as u32,
        special_request: row.try_get("special_request").map_err(&read)?,
        status: ReservationStatus::parse(&status)?,
        source: BookingSource::parse(&source)?,
        reminder_sent: row.try_get("reminder_sent").map_err(&read)?,
        created_by: created_by.map(StaffId::new).transpose()?,
        last_modified_by: last_modified_by.map(StaffId::new).transpose()?,
        created_at: Timestamp::from_datetime(created_at),
        updated_at: Timestamp::from_datetime(updated_at),
        version: row.try_get("version").map_err(&read)?,
    })
}

/// Re-checks the slot against committed bookings while the area is locked.
async fn admit(
    conn: &mut PgConnection,
    reservation: &Reservation,
    area: &Area,
) -> Result<(), ReservationError> {
    if !reservation.holds_area() {
        return Ok(());
    }
    let bookings = slot_rows(conn, &reservation.area_id, reservation.date, reservation.session).await?;
    let usage = SlotUsage::tally(bookings.iter(), Some(reservation.id));
    check_slot(area, &usage, reservation.pax).map_err(ReservationError::Conflict)
}

async fn slot_rows(
    conn: &mut PgConnection,
    area_id: &AreaId,
    date: NaiveDate,
    session: MealSession,
) -> Result<Vec<SlotBooking>, DomainError> {
    let rows = sqlx::query(
        r#"
        SELECT id, area_id, pax, status
        FROM reservations
        WHERE area_id = $1 AND date = $2 AND session = $3
        "#,
    )
    .bind(area_id.as_uuid())
    .bind(date)
    .bind(session.as_str())
    .fetch_all(&mut *conn)
    .await
    .map_err(db_error("read slot bookings"))?;

    rows.iter().map(row_to_slot_booking).collect()
}

fn row_to_slot_booking(row: &PgRow) -> Result<SlotBooking, DomainError> {
    let read = db_error("read slot booking");
    let status: String = row.try_get("status").map_err(&read)?;
    let pax: i32 = row.try_get("pax").map_err(&read)?;
    Ok(SlotBooking {
        reservation_id: ReservationId::from_uuid(row.try_get("id").map_err(&read)?),
        area_id: AreaId::from_uuid(row.try_get("area_id").map_err(&read)?),
        pax: pax as u32,
        status: ReservationStatus::parse(&status)?,
    })
}

async fn locked_area(conn: &mut PgConnection, area: &Area) -> Result<Area, ReservationError> {
    lock_area(conn, &area.id)
        .await?
        .ok_or_else(|| ReservationError::not_found("Area", area.id))
}

async fn append_history(
    conn: &mut PgConnection,
    reservation: &Reservation,
    kind: HistoryKind,
    actor: &str,
) -> Result<(), DomainError> {
    sqlx::query(
        r#"
        INSERT INTO reservation_history (reservation_id, sequence, kind, actor, snapshot, recorded_at)
        SELECT $1, COALESCE(MAX(sequence), 0) + 1, $2, $3, $4, $5
        FROM reservation_history
        WHERE reservation_id = $1
        "#,
    )
    .bind(reservation.id.as_uuid())
    .bind(kind.as_str())
    .bind(actor)
    .bind(Json(reservation))
    .bind(Timestamp::now().as_datetime())
    .execute(&mut *conn)
    .await
    .map_err(db_error("append reservation history"))?;

    Ok(())
}

async fn write_events(
    conn: &mut PgConnection,
    reservation: &Reservation,
    record: LedgerRecord,
) -> Result<(), DomainError> {
    let partition = reservation.id.to_string();
    for event in record.events {
        insert_entry(conn, &OutboxEntry::new(event, partition.clone())).await?;
    }
    Ok(())
}

#[async_trait]
impl ReservationLedger for PostgresReservationStore {
    async fn insert(
        &self,
        reservation: &Reservation,
        area: &Area,
        record: LedgerRecord,
    ) -> Result<(), ReservationError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("begin reservation insert"))?;

        let area = locked_area(&mut tx, area).await?;
        admit(&mut tx, reservation, &area).await?;

        let sql = format!(
            "INSERT INTO reservations ({}) VALUES \
             ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)",
            RESERVATION_COLUMNS
        );
        sqlx::query(&sql)
            .bind(reservation.id.as_uuid())
            .bind(&reservation.customer_name)
            .bind(&reservation.customer_contact)
            .bind(&reservation.customer_email)
            .bind(reservation.area_id.as_uuid())
            .bind(reservation.date)
            .bind(reservation.session.as_str())
            .bind(reservation.time)
            .bind(reservation.pax as i32)
            .bind(&reservation.special_request)
            .bind(reservation.status.as_str())
            .bind(reservation.source.as_str())
            .bind(reservation.reminder_sent)
            .bind(reservation.created_by.as_ref().map(StaffId::as_str))
            .bind(reservation.last_modified_by.as_ref().map(StaffId::as_str))
            .bind(reservation.created_at.as_datetime())
            .bind(reservation.updated_at.as_datetime())
            .bind(reservation.version)
            .execute(&mut *tx)
            .await
            .map_err(db_error("insert reservation"))?;

        append_history(&mut tx, reservation, record.kind, &record.actor).await?;
        write_events(&mut tx, reservation, record).await?;

        tx.commit()
            .await
            .map_err(db_error("commit reservation insert"))?;
        Ok(())
    }

    async fn update(
        &self,
        expected_version: i64,
        reservation: &Reservation,
        area: &Area,
        record: LedgerRecord,
    ) -> Result<Reservation, ReservationError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("begin reservation update"))?;

        let area = locked_area(&mut tx, area).await?;

        let stored: Option<i64> =
            sqlx::query_scalar("SELECT version FROM reservations WHERE id = $1 FOR UPDATE")
                .bind(reservation.id.as_uuid())
                .fetch_optional(&mut *tx)
                .await
                .map_err(db_error("lock reservation"))?;
        match stored {
            None => return Err(ReservationError::not_found("Reservation", reservation.id)),
            Some(version) if version != expected_version => {
                return Err(ReservationError::Conflict(Rejection::StaleVersion))
            }
            Some(_) => {}
        }

        admit(&mut tx, reservation, &area).await?;

        let sql = format!(
            r#"
            UPDATE reservations SET
                customer_name = $2,
                customer_contact = $3,
                customer_email = $4,
                area_id = $5,
                date = $6,
                session = $7,
                time = $8,
                pax = $9,
                special_request = $10,
                status = $11,
                last_modified_by = $12,
                updated_at = $13,
                version = $14
            WHERE id = $1
            RETURNING {}
            "#,
            RESERVATION_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(reservation.id.as_uuid())
            .bind(&reservation.customer_name)
            .bind(&reservation.customer_contact)
            .bind(&reservation.customer_email)
            .bind(reservation.area_id.as_uuid())
            .bind(reservation.date)
            .bind(reservation.session.as_str())
            .bind(reservation.time)
            .bind(reservation.pax as i32)
            .bind(&reservation.special_request)
            .bind(reservation.status.as_str())
            .bind(reservation.last_modified_by.as_ref().map(StaffId::as_str))
            .bind(reservation.updated_at.as_datetime())
            .bind(reservation.version)
            .fetch_one(&mut *tx)
            .await
            .map_err(db_error("update reservation"))?;
        // reminder_sent is not in the SET list; the snapshot must carry the stored flag
        let committed = row_to_reservation(&row)?;

        append_history(&mut tx, &committed, record.kind, &record.actor).await?;
        write_events(&mut tx, &committed, record).await?;

        tx.commit()
            .await
            .map_err(db_error("commit reservation update"))?;
        Ok(committed)
    }

    async fn find_by_id(&self, id: &ReservationId) -> Result<Option<Reservation>, DomainError> {
        let sql = format!("SELECT {} FROM reservations WHERE id = $1", RESERVATION_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("fetch reservation"))?;
        row.as_ref().map(row_to_reservation).transpose()
    }

    async fn history(&self, id: &ReservationId) -> Result<Vec<HistoryEntry>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT reservation_id, sequence, kind, actor, snapshot, recorded_at
            FROM reservation_history
            WHERE reservation_id = $1
            ORDER BY sequence
            "#,
        )
        .bind(id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("fetch reservation history"))?;

        rows.iter()
            .map(|row| -> Result<HistoryEntry, DomainError> {
                let read = db_error("read reservation history");
                let kind: String = row.try_get("kind").map_err(&read)?;
                let snapshot: Json<Reservation> = row.try_get("snapshot").map_err(&read)?;
                let recorded_at: DateTime<Utc> = row.try_get("recorded_at").map_err(&read)?;
                Ok(HistoryEntry {
                    reservation_id: ReservationId::from_uuid(
                        row.try_get("reservation_id").map_err(&read)?,
                    ),
                    sequence: row.try_get("sequence").map_err(&read)?,
                    kind: HistoryKind::parse(&kind).ok_or_else(|| {
                        DomainError::new(
                            ErrorCode::DatabaseError,
                            format!("Unknown history kind: {}", kind),
                        )
                    })?,
                    actor: row.try_get("actor").map_err(&read)?,
                    snapshot: snapshot.0,
                    recorded_at: Timestamp::from_datetime(recorded_at),
                })
            })
            .collect()
    }

    async fn mark_reminder_sent(&self, id: &ReservationId) -> Result<bool, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("begin reminder flag"))?;

        let sql = format!(
            "UPDATE reservations SET reminder_sent = TRUE \
             WHERE id = $1 AND reminder_sent = FALSE RETURNING {}",
            RESERVATION_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&mut *tx)
            .await
            .map_err(db_error("set reminder flag"))?;

        let Some(row) = row else {
            tx.rollback()
                .await
                .map_err(db_error("roll back reminder flag"))?;
            return Ok(false);
        };
        let snapshot = row_to_reservation(&row)?;
        append_history(&mut tx, &snapshot, HistoryKind::System, "system").await?;

        tx.commit().await.map_err(db_error("commit reminder flag"))?;
        Ok(true)
    }
}

#[async_trait]
impl ReservationReader for PostgresReservationStore {
    async fn slot_bookings(
        &self,
        date: NaiveDate,
        session: MealSession,
    ) -> Result<Vec<SlotBooking>, DomainError> {
        let rows = sqlx::query(
            "SELECT id, area_id, pax, status FROM reservations WHERE date = $1 AND session = $2",
        )
        .bind(date)
        .bind(session.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("read session bookings"))?;

        rows.iter().map(row_to_slot_booking).collect()
    }

    async fn list(&self, filter: &ReservationFilter) -> Result<Vec<Reservation>, DomainError> {
        let mut query: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            "SELECT {} FROM reservations WHERE TRUE",
            RESERVATION_COLUMNS
        ));
        if let Some(date) = filter.date {
            query.push(" AND date = ").push_bind(date);
        }
        if let Some(session) = filter.session {
            query.push(" AND session = ").push_bind(session.as_str());
        }
        if let Some(status) = filter.status {
            query.push(" AND status = ").push_bind(status.as_str());
        }
        if let Some(area_id) = filter.area_id {
            query.push(" AND area_id = ").push_bind(*area_id.as_uuid());
        }
        if let Some(term) = filter.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            let pattern = format!("%{}%", escape_like(term));
            query
                .push(" AND (customer_name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR customer_contact ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR customer_email ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        query.push(" ORDER BY date DESC, time DESC");

        let rows = query
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("list reservations"))?;
        rows.iter().map(row_to_reservation).collect()
    }

    async fn reminder_candidates(
        &self,
        dates: &[NaiveDate],
    ) -> Result<Vec<Reservation>, DomainError> {
        let sql = format!(
            "SELECT {} FROM reservations \
             WHERE status = 'confirmed' AND reminder_sent = FALSE AND date = ANY($1)",
            RESERVATION_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(dates.to_vec())
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("scan reminder candidates"))?;
        rows.iter().map(row_to_reservation).collect()
    }
}

fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("50%_off"), "50\\%\\_off");
        assert_eq!(escape_like("Santos"), "Santos");
    }
}
