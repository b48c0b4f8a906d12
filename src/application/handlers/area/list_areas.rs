//! Public area listings.

use std::sync::Arc;

use crate::domain::area::Area;
use crate::domain::foundation::DomainError;
use crate::ports::AreaRegistry;

pub struct ListAreasHandler {
    areas: Arc<dyn AreaRegistry>,
}

impl ListAreasHandler {
    pub fn new(areas: Arc<dyn AreaRegistry>) -> Self {
        Self { areas }
    }

    /// Every bookable area, by name.
    pub async fn list_active(&self) -> Result<Vec<Area>, DomainError> {
        self.areas.list_active().await
    }

    /// Private rooms only.
    pub async fn list_vip(&self) -> Result<Vec<Area>, DomainError> {
        self.areas.list_active_exclusive().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryAreaRegistry;
    use crate::domain::area::AreaKind;

    #[tokio::test]
    async fn vip_listing_leaves_out_shared_and_inactive_areas() {
        let mut closed = Area::new("VIP Room 2", AreaKind::Exclusive, 12).unwrap();
        closed.is_active = false;
        let registry = InMemoryAreaRegistry::with_areas([
            Area::new("Main Dining Hall", AreaKind::Shared, 250).unwrap(),
            Area::new("VIP Room 1", AreaKind::Exclusive, 20).unwrap(),
            closed,
        ]);
        let handler = ListAreasHandler::new(Arc::new(registry));

        let all: Vec<_> = handler.list_active().await.unwrap().into_iter().map(|a| a.name).collect();
        assert_eq!(all, vec!["Main Dining Hall", "VIP Room 1"]);

        let vip: Vec<_> = handler.list_vip().await.unwrap().into_iter().map(|a| a.name).collect();
        assert_eq!(vip, vec!["VIP Room 1"]);
    }
}
