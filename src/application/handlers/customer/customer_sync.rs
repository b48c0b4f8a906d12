//! CustomerSyncHandler - keeps the customer directory in step with bookings.
//!
//! Runs after the reservation commit, fed by the outbox. Every created or
//! updated booking upserts the customer matched by phone. A booking that
//! becomes Completed counts a visit; one that becomes NoShow counts a
//! no-show.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::customer::Customer;
use crate::domain::foundation::{DomainError, ErrorCode, EventEnvelope};
use crate::domain::reservation::{
    ChangeSet, Reservation, ReservationCreated, ReservationUpdated, RESERVATION_CREATED,
    RESERVATION_UPDATED,
};
use crate::ports::{CustomerDirectory, EventHandler};

pub struct CustomerSyncHandler {
    customers: Arc<dyn CustomerDirectory>,
}

impl CustomerSyncHandler {
    pub fn new(customers: Arc<dyn CustomerDirectory>) -> Self {
        Self { customers }
    }

    async fn sync(
        &self,
        reservation: &Reservation,
        changes: Option<&ChangeSet>,
    ) -> Result<(), DomainError> {
        let phone = reservation.customer_contact.trim();
        let mut customer = match self.customers.find_by_phone(phone).await? {
            Some(mut existing) => {
                existing.touch_from_booking(reservation);
                existing
            }
            None => {
                tracing::debug!(phone = %phone, "new customer from booking");
                Customer::from_booking(reservation)
            }
        };

        if let Some(changes) = changes {
            if changes.became_completed {
                customer.record_visit();
                tracing::info!(
                    customer_id = %customer.id,
                    visits = customer.visit_count,
                    is_vip = customer.is_vip,
                    "visit recorded"
                );
            }
            if changes.became_no_show {
                customer.record_no_show();
                tracing::info!(
                    customer_id = %customer.id,
                    no_shows = customer.no_show_count,
                    "no-show recorded"
                );
            }
        }

        self.customers.save(&customer).await
    }
}

fn payload_error(e: serde_json::Error) -> DomainError {
    DomainError::new(ErrorCode::ValidationFailed, format!("Bad reservation event: {}", e))
}

#[async_trait]
impl EventHandler for CustomerSyncHandler {
    async fn handle(&self, event: EventEnvelope) -> Result<(), DomainError> {
        match event.event_type.as_str() {
            RESERVATION_CREATED => {
                let created: ReservationCreated = event.payload_as().map_err(payload_error)?;
                self.sync(&created.reservation, None).await
            }
            RESERVATION_UPDATED => {
                let updated: ReservationUpdated = event.payload_as().map_err(payload_error)?;
                self.sync(&updated.reservation, Some(&updated.changes)).await
            }
            _ => Ok(()),
        }
    }

    fn name(&self) -> &'static str {
        "customer_sync"
    }
}
