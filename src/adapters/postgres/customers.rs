//! PostgreSQL implementation of CustomerDirectory.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};

use super::db_error;
use crate::domain::customer::{Customer, CustomerFilter};
use crate::domain::foundation::{CustomerId, DomainError, ErrorCode, Timestamp};
use crate::ports::CustomerDirectory;

const CUSTOMER_COLUMNS: &str = "id, name, phone, email, wechat_id, viber_number, \
     whatsapp_number, telegram_handle, no_show_count, visit_count, is_vip, notes, \
     last_visit, created_at";

const UNIQUE_VIOLATION: &str = "23505";

#[derive(Clone)]
pub struct PostgresCustomerDirectory {
    pool: PgPool,
}

impl PostgresCustomerDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_customer(row: &PgRow) -> Result<Customer, DomainError> {
    let read = db_error("read customer");
    let no_show_count: i32 = row.try_get("no_show_count").map_err(&read)?;
    let visit_count: i32 = row.try_get("visit_count").map_err(&read)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(&read)?;

    Ok(Customer {
        id: CustomerId::from_uuid(row.try_get("id").map_err(&read)?),
        name: row.try_get("name").map_err(&read)?,
        phone: row.try_get("phone").map_err(&read)?,
        email: row.try_get("email").map_err(&read)?,
        wechat_id: row.try_get("wechat_id").map_err(&read)?,
        viber_number: row.try_get("viber_number").map_err(&read)?,
        whatsapp_number: row.try_get("whatsapp_number").map_err(&read)?,
        telegram_handle: row.try_get("telegram_handle").map_err(&read)?,
        no_show_count: no_show_count as u32,
        visit_count: visit_count as u32,
        is_vip: row.try_get("is_vip").map_err(&read)?,
        notes: row.try_get("notes").map_err(&read)?,
        last_visit: row.try_get("last_visit").map_err(&read)?,
        created_at: Timestamp::from_datetime(created_at),
    })
}

#[async_trait]
impl CustomerDirectory for PostgresCustomerDirectory {
    async fn get(&self, id: &CustomerId) -> Result<Option<Customer>, DomainError> {
        let sql = format!("SELECT {} FROM customers WHERE id = $1", CUSTOMER_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("fetch customer"))?;
        row.as_ref().map(row_to_customer).transpose()
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<Customer>, DomainError> {
        let sql = format!("SELECT {} FROM customers WHERE phone = $1", CUSTOMER_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(phone)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("fetch customer by phone"))?;
        row.as_ref().map(row_to_customer).transpose()
    }

    async fn save(&self, customer: &Customer) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            INSERT INTO customers (
                id, name, phone, email, wechat_id, viber_number, whatsapp_number,
                telegram_handle, no_show_count, visit_count, is_vip, notes, last_visit, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                phone = EXCLUDED.phone,
                email = EXCLUDED.email,
                wechat_id = EXCLUDED.wechat_id,
                viber_number = EXCLUDED.viber_number,
                whatsapp_number = EXCLUDED.whatsapp_number,
                telegram_handle = EXCLUDED.telegram_handle,
                no_show_count = EXCLUDED.no_show_count,
                visit_count = EXCLUDED.visit_count,
                is_vip = EXCLUDED.is_vip,
                notes = EXCLUDED.notes,
                last_visit = EXCLUDED.last_visit
            "#,
        )
        .bind(customer.id.as_uuid())
        .bind(&customer.name)
        .bind(&customer.phone)
        .bind(&customer.email)
        .bind(&customer.wechat_id)
        .bind(&customer.viber_number)
        .bind(&customer.whatsapp_number)
        .bind(&customer.telegram_handle)
        .bind(customer.no_show_count as i32)
        .bind(customer.visit_count as i32)
        .bind(customer.is_vip)
        .bind(&customer.notes)
        .bind(customer.last_visit)
        .bind(customer.created_at.as_datetime())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(e)) if e.code().as_deref() == Some(UNIQUE_VIOLATION) => {
                Err(DomainError::new(
                    ErrorCode::ValidationFailed,
                    "phone already belongs to another customer",
                )
                .with_detail("field", "phone"))
            }
            Err(e) => Err(db_error("save customer")(e)),
        }
    }

    async fn list(&self, filter: &CustomerFilter) -> Result<Vec<Customer>, DomainError> {
        let mut query: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {} FROM customers WHERE TRUE", CUSTOMER_COLUMNS));
        if filter.vip_only {
            query.push(" AND is_vip");
        }
        if let Some(term) = filter.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            let pattern = format!("%{}%", term.replace('%', "\\%").replace('_', "\\_"));
            query
                .push(" AND (name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR phone LIKE ")
                .push_bind(pattern)
                .push(")");
        }
        query.push(" ORDER BY name");

        let rows = query
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("list customers"))?;
        rows.iter().map(row_to_customer).collect()
    }

    async fn delete(&self, id: &CustomerId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(db_error("delete customer"))?;
        Ok(result.rows_affected() > 0)
    }
}
