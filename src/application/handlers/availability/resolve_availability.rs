//! ResolveAvailabilityHandler - per-area availability for one date and session.
//!
//! Advisory only: the result can be stale by the time a booking is written.
//! The ledger re-checks under the area lock.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::domain::foundation::{AreaId, DomainError};
use crate::domain::reservation::{AreaAvailability, MealSession, SlotBooking, SlotUsage};
use crate::ports::{AreaRegistry, ReservationReader};

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ResolveAvailabilityQuery {
    pub date: NaiveDate,
    pub session: MealSession,
}

pub struct ResolveAvailabilityHandler {
    areas: Arc<dyn AreaRegistry>,
    reader: Arc<dyn ReservationReader>,
}

impl ResolveAvailabilityHandler {
    pub fn new(areas: Arc<dyn AreaRegistry>, reader: Arc<dyn ReservationReader>) -> Self {
        Self { areas, reader }
    }

    pub async fn handle(
        &self,
        query: ResolveAvailabilityQuery,
    ) -> Result<Vec<AreaAvailability>, DomainError> {
        let areas = self.areas.list_active().await?;
        let bookings = self.reader.slot_bookings(query.date, query.session).await?;

        let mut by_area: HashMap<AreaId, Vec<SlotBooking>> = HashMap::new();
        for booking in bookings {
            by_area.entry(booking.area_id).or_default().push(booking);
        }

        Ok(areas
            .into_iter()
            .map(|area| {
                let usage = by_area
                    .get(&area.id)
                    .map(|b| SlotUsage::tally(b.iter(), None))
                    .unwrap_or_default();
                AreaAvailability::from_usage(area, &usage)
            })
            .collect())
    }
}
