//! GetDashboardHandler - staff dashboard for the current business day.

use std::sync::Arc;

use crate::domain::dashboard::DashboardStats;
use crate::domain::foundation::{BusinessClock, DomainError, Timestamp};
use crate::ports::DashboardReader;

pub struct GetDashboardHandler {
    reader: Arc<dyn DashboardReader>,
    clock: BusinessClock,
    spend_per_pax: u64,
    currency_symbol: String,
}

impl GetDashboardHandler {
    pub fn new(
        reader: Arc<dyn DashboardReader>,
        clock: BusinessClock,
        spend_per_pax: u64,
        currency_symbol: impl Into<String>,
    ) -> Self {
        Self {
            reader,
            clock,
            spend_per_pax,
            currency_symbol: currency_symbol.into(),
        }
    }

    pub async fn handle(&self, now: Timestamp) -> Result<DashboardStats, DomainError> {
        let today = self.clock.local_date(&now);
        let facts = self.reader.facts(today).await?;
        Ok(DashboardStats::from_facts(
            facts,
            today,
            self.spend_per_pax,
            &self.currency_symbol,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{
        InMemoryAreaRegistry, InMemoryDashboardReader, InMemoryOutbox, InMemoryReservationStore,
    };
    use crate::domain::area::{Area, AreaKind};
    use crate::domain::reservation::fixtures::draft_for;
    use crate::domain::reservation::{HistoryKind, Reservation, ReservationStatus};
    use crate::ports::{LedgerRecord, ReservationLedger};
    use chrono::{TimeZone, Utc};

    #[tokio::test]
    async fn today_follows_the_business_offset() {
        let hall = Area::new("Main Dining Hall", AreaKind::Shared, 250).unwrap();
        let vip = Area::new("VIP Room 1", AreaKind::Exclusive, 20).unwrap();
        let areas = Arc::new(InMemoryAreaRegistry::with_areas([hall.clone(), vip.clone()]));
        let store = Arc::new(InMemoryReservationStore::new(Arc::new(InMemoryOutbox::new())));

        for (area, pax, status) in [
            (&hall, 12, ReservationStatus::Confirmed),
            (&vip, 15, ReservationStatus::Seated),
            (&hall, 3, ReservationStatus::Pending),
        ] {
            let mut r = Reservation::create(draft_for(area, pax), area, None).unwrap();
            r.status = status;
            store
                .insert(&r, area, LedgerRecord::new(HistoryKind::Created, "public", Vec::new()))
                .await
                .unwrap();
        }

        let handler = GetDashboardHandler::new(
            Arc::new(InMemoryDashboardReader::new(areas, store)),
            BusinessClock::from_offset_minutes(480).unwrap(),
            1500,
            "₱",
        );

        // 17:30 UTC on Feb 28 is already Mar 01 in Manila.
        let now = Timestamp::from_datetime(Utc.with_ymd_and_hms(2025, 2, 28, 17, 30, 0).unwrap());
        let stats = handler.handle(now).await.unwrap();

        assert_eq!(stats.today_count, 3);
        assert_eq!(stats.pending_count, 1);
        assert_eq!(stats.pax_today, 27);
        assert_eq!(stats.vip_pax, 15);
        assert_eq!(stats.revenue_display, "₱40,500");
        assert_eq!(stats.chart.last().map(|d| d.label.as_str()), Some("Mar 01"));
        assert_eq!(stats.recent_bookings.len(), 3);
    }
}
