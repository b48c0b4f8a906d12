//! AreaRegistry port - the bookable dining areas.

use async_trait::async_trait;

use crate::domain::area::Area;
use crate::domain::foundation::{AreaId, DomainError};

#[async_trait]
pub trait AreaRegistry: Send + Sync {
    /// Active areas ordered by name.
    async fn list_active(&self) -> Result<Vec<Area>, DomainError>;

    /// Active exclusive rooms, as listed on the public VIP page.
    async fn list_active_exclusive(&self) -> Result<Vec<Area>, DomainError> {
        let mut areas = self.list_active().await?;
        areas.retain(Area::is_exclusive);
        Ok(areas)
    }

    /// Any area, active or not.
    async fn get(&self, id: &AreaId) -> Result<Option<Area>, DomainError>;

    /// Inserts or replaces an area definition.
    async fn save(&self, area: &Area) -> Result<(), DomainError>;
}
