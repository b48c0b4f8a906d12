//! Dashboard projection computed over the in-memory stores.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashSet;
use std::sync::Arc;

use super::{InMemoryAreaRegistry, InMemoryReservationStore};
use crate::domain::dashboard::DashboardFacts;
use crate::domain::foundation::DomainError;
use crate::ports::{AreaRegistry, DashboardReader};

pub struct InMemoryDashboardReader {
    areas: Arc<InMemoryAreaRegistry>,
    reservations: Arc<InMemoryReservationStore>,
}

impl InMemoryDashboardReader {
    pub fn new(areas: Arc<InMemoryAreaRegistry>, reservations: Arc<InMemoryReservationStore>) -> Self {
        Self { areas, reservations }
    }
}

#[async_trait]
impl DashboardReader for InMemoryDashboardReader {
    async fn facts(&self, today: NaiveDate) -> Result<DashboardFacts, DomainError> {
        let exclusive: HashSet<_> = self
            .areas
            .list_active_exclusive()
            .await?
            .into_iter()
            .map(|a| a.id)
            .collect();
        let reservations = self.reservations.all().await;
        Ok(DashboardFacts::tally(today, &reservations, &exclusive))
    }
}
