//! ListReservationsHandler - the staff reservation list.

use std::sync::Arc;

use crate::domain::foundation::DomainError;
use crate::domain::reservation::Reservation;
use crate::ports::{ReservationFilter, ReservationReader};

pub struct ListReservationsHandler {
    reader: Arc<dyn ReservationReader>,
}

impl ListReservationsHandler {
    pub fn new(reader: Arc<dyn ReservationReader>) -> Self {
        Self { reader }
    }

    pub async fn handle(&self, filter: ReservationFilter) -> Result<Vec<Reservation>, DomainError> {
        self.reader.list(&filter).await
    }
}
