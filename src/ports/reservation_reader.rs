//! ReservationReader port - queries over stored reservations.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::domain::foundation::{AreaId, DomainError};
use crate::domain::reservation::{MealSession, Reservation, ReservationStatus, SlotBooking};

/// Staff list filters. All present criteria must match.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReservationFilter {
    pub date: Option<NaiveDate>,
    pub session: Option<MealSession>,
    pub status: Option<ReservationStatus>,
    pub area_id: Option<AreaId>,
    /// Case-insensitive match on guest name, contact or email
    pub search: Option<String>,
}

impl ReservationFilter {
    pub fn matches(&self, reservation: &Reservation) -> bool {
        if self.date.is_some_and(|d| d != reservation.date) {
            return false;
        }
        if self.session.is_some_and(|s| s != reservation.session) {
            return false;
        }
        if self.status.is_some_and(|s| s != reservation.status) {
            return false;
        }
        if self.area_id.is_some_and(|a| a != reservation.area_id) {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => {
                let term = term.to_lowercase();
                reservation.customer_name.to_lowercase().contains(&term)
                    || reservation.customer_contact.to_lowercase().contains(&term)
                    || reservation
                        .customer_email
                        .as_deref()
                        .is_some_and(|e| e.to_lowercase().contains(&term))
            }
            _ => true,
        }
    }
}

#[async_trait]
pub trait ReservationReader: Send + Sync {
    /// Bookings in every area for one date and session, any status.
    async fn slot_bookings(
        &self,
        date: NaiveDate,
        session: MealSession,
    ) -> Result<Vec<SlotBooking>, DomainError>;

    /// Newest booking date first, then latest time.
    async fn list(&self, filter: &ReservationFilter) -> Result<Vec<Reservation>, DomainError>;

    /// Confirmed bookings on the given dates whose reminder is still unsent.
    async fn reminder_candidates(
        &self,
        dates: &[NaiveDate],
    ) -> Result<Vec<Reservation>, DomainError>;
}
