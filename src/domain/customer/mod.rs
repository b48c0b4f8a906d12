//! Customer domain module.
//!
//! The customer directory is derived from bookings. Customers are matched
//! by phone number, created the first time a phone books, and carry the
//! visit and no-show counters that drive VIP status.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{CustomerId, Timestamp, ValidationError};
use crate::domain::reservation::Reservation;

/// Completed visits needed before a customer is flagged VIP.
pub const VIP_VISIT_THRESHOLD: u32 = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    /// Natural key.
    pub phone: String,
    pub email: Option<String>,
    pub wechat_id: Option<String>,
    pub viber_number: Option<String>,
    pub whatsapp_number: Option<String>,
    pub telegram_handle: Option<String>,
    pub no_show_count: u32,
    pub visit_count: u32,
    pub is_vip: bool,
    pub notes: String,
    pub last_visit: Option<NaiveDate>,
    pub created_at: Timestamp,
}

/// Staff edit of the directory entry. Counters are not editable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub wechat_id: Option<String>,
    pub viber_number: Option<String>,
    pub whatsapp_number: Option<String>,
    pub telegram_handle: Option<String>,
    pub notes: Option<String>,
    /// Staff may grant VIP by hand. Revoking is allowed too.
    pub is_vip: Option<bool>,
}

impl Customer {
    /// First sighting of a phone number in a booking.
    pub fn from_booking(reservation: &Reservation) -> Self {
        Self {
            id: CustomerId::new(),
            name: reservation.customer_name.clone(),
            phone: reservation.customer_contact.clone(),
            email: reservation.customer_email.clone(),
            wechat_id: None,
            viber_number: None,
            whatsapp_number: None,
            telegram_handle: None,
            no_show_count: 0,
            visit_count: 0,
            is_vip: false,
            notes: String::new(),
            last_visit: Some(reservation.date),
            created_at: Timestamp::now(),
        }
    }

    /// Refreshes an existing entry from a later booking.
    ///
    /// The stored name always wins; the email is only filled when missing.
    pub fn touch_from_booking(&mut self, reservation: &Reservation) {
        self.last_visit = Some(reservation.date);
        if self.email.is_none() {
            self.email = reservation.customer_email.clone();
        }
    }

    /// Counts a completed visit. VIP is never taken away here.
    pub fn record_visit(&mut self) {
        self.visit_count = self.visit_count.saturating_add(1);
        if self.visit_count >= VIP_VISIT_THRESHOLD {
            self.is_vip = true;
        }
    }

    pub fn record_no_show(&mut self) {
        self.no_show_count = self.no_show_count.saturating_add(1);
    }

    pub fn apply(&mut self, patch: CustomerPatch) -> Result<(), ValidationError> {
        if let Some(name) = patch.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(ValidationError::empty_field("name"));
            }
            self.name = name;
        }
        if let Some(email) = patch.email {
            self.email = non_blank(email);
        }
        if let Some(wechat) = patch.wechat_id {
            self.wechat_id = non_blank(wechat);
        }
        if let Some(viber) = patch.viber_number {
            self.viber_number = non_blank(viber);
        }
        if let Some(whatsapp) = patch.whatsapp_number {
            self.whatsapp_number = non_blank(whatsapp);
        }
        if let Some(telegram) = patch.telegram_handle {
            self.telegram_handle = non_blank(telegram);
        }
        if let Some(notes) = patch.notes {
            self.notes = notes;
        }
        if let Some(is_vip) = patch.is_vip {
            self.is_vip = is_vip;
        }
        Ok(())
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Directory search filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerFilter {
    /// Case-insensitive match on name or phone.
    pub search: Option<String>,
    #[serde(default)]
    pub vip_only: bool,
}

impl CustomerFilter {
    pub fn matches(&self, customer: &Customer) -> bool {
        if self.vip_only && !customer.is_vip {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => {
                let term = term.to_lowercase();
                customer.name.to_lowercase().contains(&term) || customer.phone.contains(&term)
            }
            _ => true,
        }
    }
}
