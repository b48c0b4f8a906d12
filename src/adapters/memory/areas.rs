//! In-memory area registry.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::area::Area;
use crate::domain::foundation::{AreaId, DomainError};
use crate::ports::AreaRegistry;

#[derive(Debug, Default)]
pub struct InMemoryAreaRegistry {
    areas: RwLock<HashMap<AreaId, Area>>,
}

impl InMemoryAreaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_areas(areas: impl IntoIterator<Item = Area>) -> Self {
        Self {
            areas: RwLock::new(areas.into_iter().map(|a| (a.id, a)).collect()),
        }
    }
}

#[async_trait]
impl AreaRegistry for InMemoryAreaRegistry {
    async fn list_active(&self) -> Result<Vec<Area>, DomainError> {
        let mut active: Vec<Area> = self
            .areas
            .read()
            .await
            .values()
            .filter(|a| a.is_active)
            .cloned()
            .collect();
        active.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(active)
    }

    async fn get(&self, id: &AreaId) -> Result<Option<Area>, DomainError> {
        Ok(self.areas.read().await.get(id).cloned())
    }

    async fn save(&self, area: &Area) -> Result<(), DomainError> {
        self.areas.write().await.insert(area.id, area.clone());
        Ok(())
    }
}
