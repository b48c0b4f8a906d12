//! PostgreSQL implementation of AreaRegistry.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgConnection, PgPool, Row};

use super::db_error;
use crate::domain::area::{Amenities, Area, AreaKind};
use crate::domain::foundation::{AreaId, DomainError};
use crate::ports::AreaRegistry;

const AREA_COLUMNS: &str = "id, name, kind, capacity, min_pax, description, \
     has_ktv, has_restroom, has_tv, has_couch, is_active";

#[derive(Clone)]
pub struct PostgresAreaRegistry {
    pool: PgPool,
}

impl PostgresAreaRegistry {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Locks the area row for the rest of the transaction and returns its
/// current state.
pub(super) async fn lock_area(
    conn: &mut PgConnection,
    id: &AreaId,
) -> Result<Option<Area>, DomainError> {
    let sql = format!("SELECT {} FROM dining_areas WHERE id = $1 FOR UPDATE", AREA_COLUMNS);
    let row = sqlx::query(&sql)
        .bind(id.as_uuid())
        .fetch_optional(&mut *conn)
        .await
        .map_err(db_error("lock dining area"))?;
    row.as_ref().map(row_to_area).transpose()
}

fn row_to_area(row: &PgRow) -> Result<Area, DomainError> {
    let read = db_error("read dining area");
    let kind: String = row.try_get("kind").map_err(&read)?;
    let capacity: i32 = row.try_get("capacity").map_err(&read)?;
    let min_pax: i32 = row.try_get("min_pax").map_err(&read)?;

    Ok(Area {
        id: AreaId::from_uuid(row.try_get("id").map_err(&read)?),
        name: row.try_get("name").map_err(&read)?,
        kind: AreaKind::parse(&kind)?,
        capacity: capacity as u32,
        min_pax: min_pax as u32,
        description: row.try_get("description").map_err(&read)?,
        amenities: Amenities {
            has_ktv: row.try_get("has_ktv").map_err(&read)?,
            has_restroom: row.try_get("has_restroom").map_err(&read)?,
            has_tv: row.try_get("has_tv").map_err(&read)?,
            has_couch: row.try_get("has_couch").map_err(&read)?,
        },
        is_active: row.try_get("is_active").map_err(&read)?,
    })
}

#[async_trait]
impl AreaRegistry for PostgresAreaRegistry {
    async fn list_active(&self) -> Result<Vec<Area>, DomainError> {
        let sql = format!(
            "SELECT {} FROM dining_areas WHERE is_active ORDER BY name",
            AREA_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("list dining areas"))?;
        rows.iter().map(row_to_area).collect()
    }

    async fn list_active_exclusive(&self) -> Result<Vec<Area>, DomainError> {
        let sql = format!(
            "SELECT {} FROM dining_areas WHERE is_active AND kind = 'exclusive' ORDER BY name",
            AREA_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("list VIP rooms"))?;
        rows.iter().map(row_to_area).collect()
    }

    async fn get(&self, id: &AreaId) -> Result<Option<Area>, DomainError> {
        let sql = format!("SELECT {} FROM dining_areas WHERE id = $1", AREA_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("fetch dining area"))?;
        row.as_ref().map(row_to_area).transpose()
    }

    async fn save(&self, area: &Area) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO dining_areas (
                id, name, kind, capacity, min_pax, description,
                has_ktv, has_restroom, has_tv, has_couch, is_active
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                kind = EXCLUDED.kind,
                capacity = EXCLUDED.capacity,
                min_pax = EXCLUDED.min_pax,
                description = EXCLUDED.description,
                has_ktv = EXCLUDED.has_ktv,
                has_restroom = EXCLUDED.has_restroom,
                has_tv = EXCLUDED.has_tv,
                has_couch = EXCLUDED.has_couch,
                is_active = EXCLUDED.is_active
            "#,
        )
        .bind(area.id.as_uuid())
        .bind(&area.name)
        .bind(area.kind.as_str())
        .bind(area.capacity as i32)
        .bind(area.min_pax as i32)
        .bind(&area.description)
        .bind(area.amenities.has_ktv)
        .bind(area.amenities.has_restroom)
        .bind(area.amenities.has_tv)
        .bind(area.amenities.has_couch)
        .bind(area.is_active)
        .execute(&self.pool)
        .await
        .map_err(db_error("save dining area"))?;

        Ok(())
    }
}
