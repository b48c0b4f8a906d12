//! Reservation aggregate.
//!
//! # Invariants
//!
//! - `customer_name` and `customer_contact` are non-empty
//! - `area.min_pax <= pax <= area.capacity`
//! - status changes follow [`ReservationStatus::can_change_to`]
//! - `version` grows by one on every accepted change
//!
//! Slot occupancy is not checked here; it depends on other bookings and
//! belongs to the ledger's guarded write.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::{
    BookingSource, MealSession, Rejection, ReservationError, ReservationStatus, Slot, SlotBooking,
};
use crate::domain::area::Area;
use crate::domain::foundation::{AreaId, ReservationId, StaffId, Timestamp, ValidationError};

const MAX_NAME_LENGTH: usize = 100;
const MAX_REQUEST_LENGTH: usize = 1000;

/// A booking of one area for one date and session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: ReservationId,
    pub customer_name: String,
    /// Phone number or messaging handle.
    pub customer_contact: String,
    pub customer_email: Option<String>,
    pub area_id: AreaId,
    pub date: NaiveDate,
    pub session: MealSession,
    pub time: NaiveTime,
    pub pax: u32,
    pub special_request: String,
    pub status: ReservationStatus,
    pub source: BookingSource,
    pub reminder_sent: bool,
    pub created_by: Option<StaffId>,
    pub last_modified_by: Option<StaffId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub version: i64,
}

/// Input for a new booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationDraft {
    pub customer_name: String,
    pub customer_contact: String,
    pub customer_email: Option<String>,
    pub area_id: AreaId,
    pub date: NaiveDate,
    pub session: MealSession,
    pub time: NaiveTime,
    pub pax: u32,
    #[serde(default)]
    pub special_request: String,
    #[serde(default)]
    pub source: BookingSource,
    /// Honoured only for staff-entered bookings.
    #[serde(default)]
    pub status: Option<ReservationStatus>,
}

/// Partial staff edit. `None` leaves a field as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationPatch {
    pub customer_name: Option<String>,
    pub customer_contact: Option<String>,
    /// An empty string clears the address.
    pub customer_email: Option<String>,
    pub area_id: Option<AreaId>,
    pub date: Option<NaiveDate>,
    pub session: Option<MealSession>,
    pub time: Option<NaiveTime>,
    pub pax: Option<u32>,
    pub special_request: Option<String>,
    pub status: Option<ReservationStatus>,
}

impl ReservationPatch {
    pub fn status(status: ReservationStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

/// What an accepted update changed. Drives the downstream effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSet {
    pub previous_status: ReservationStatus,
    pub status_changed: bool,
    pub became_completed: bool,
    pub became_no_show: bool,
    /// Area, date or time differ from before.
    pub details_changed: bool,
}

impl ChangeSet {
    pub fn between(before: &Reservation, after: &Reservation) -> Self {
        let status_changed = before.status != after.status;
        Self {
            previous_status: before.status,
            status_changed,
            became_completed: status_changed && after.status == ReservationStatus::Completed,
            became_no_show: status_changed && after.status == ReservationStatus::NoShow,
            details_changed: before.area_id != after.area_id
                || before.date != after.date
                || before.time != after.time,
        }
    }
}

impl Reservation {
    /// Builds a new booking against its target area.
    ///
    /// Public bookings always start as Pending.
    pub fn create(
        draft: ReservationDraft,
        area: &Area,
        created_by: Option<StaffId>,
    ) -> Result<Self, ReservationError> {
        if draft.area_id != area.id {
            return Err(ValidationError::invalid_format("area_id", "does not match area").into());
        }
        let status = match (&created_by, draft.status) {
            (Some(_), Some(status)) => status,
            _ => ReservationStatus::Pending,
        };
        let now = Timestamp::now();
        let reservation = Self {
            id: ReservationId::new(),
            customer_name: draft.customer_name.trim().to_string(),
            customer_contact: draft.customer_contact.trim().to_string(),
            customer_email: normalize_email(draft.customer_email),
            area_id: draft.area_id,
            date: draft.date,
            session: draft.session,
            time: draft.time,
            pax: draft.pax,
            special_request: draft.special_request.trim().to_string(),
            status,
            source: draft.source,
            reminder_sent: false,
            created_by: created_by.clone(),
            last_modified_by: created_by,
            created_at: now,
            updated_at: now,
            version: 1,
        };
        reservation.validate_fields()?;
        reservation.validate_against(area, true)?;
        Ok(reservation)
    }

    /// Produces the edited record and what changed.
    ///
    /// `area` is the area of the *resulting* booking. Authorization of the
    /// status change is the caller's responsibility.
    pub fn apply(
        &self,
        patch: ReservationPatch,
        area: &Area,
        actor: StaffId,
    ) -> Result<(Reservation, ChangeSet), ReservationError> {
        let mut next = self.clone();
        if let Some(name) = patch.customer_name {
            next.customer_name = name.trim().to_string();
        }
        if let Some(contact) = patch.customer_contact {
            next.customer_contact = contact.trim().to_string();
        }
        if let Some(email) = patch.customer_email {
            next.customer_email = normalize_email(Some(email));
        }
        if let Some(area_id) = patch.area_id {
            next.area_id = area_id;
        }
        if let Some(date) = patch.date {
            next.date = date;
        }
        if let Some(session) = patch.session {
            next.session = session;
        }
        if let Some(time) = patch.time {
            next.time = time;
        }
        if let Some(pax) = patch.pax {
            next.pax = pax;
        }
        if let Some(request) = patch.special_request {
            next.special_request = request.trim().to_string();
        }
        if let Some(status) = patch.status {
            if !self.status.can_change_to(&status) {
                return Err(ValidationError::invalid_transition(self.status, status).into());
            }
            next.status = status;
        }
        if next.area_id != area.id {
            return Err(ValidationError::invalid_format("area_id", "does not match area").into());
        }

        next.validate_fields()?;
        next.validate_against(area, next.area_id != self.area_id)?;

        next.last_modified_by = Some(actor);
        next.updated_at = Timestamp::now();
        next.version = self.version + 1;

        let changes = ChangeSet::between(self, &next);
        Ok((next, changes))
    }

    /// Whether this booking must be admitted into its slot before it is written.
    pub fn holds_area(&self) -> bool {
        self.status.occupies_area()
    }

    pub fn slot(&self) -> Slot {
        Slot {
            area_id: self.area_id,
            date: self.date,
            session: self.session,
        }
    }

    pub fn as_slot_booking(&self) -> SlotBooking {
        SlotBooking {
            reservation_id: self.id,
            area_id: self.area_id,
            pax: self.pax,
            status: self.status,
        }
    }

    fn validate_fields(&self) -> Result<(), ValidationError> {
        if self.customer_name.is_empty() {
            return Err(ValidationError::empty_field("customer_name"));
        }
        if self.customer_name.chars().count() > MAX_NAME_LENGTH {
            return Err(ValidationError::invalid_format(
                "customer_name",
                format!("at most {} characters", MAX_NAME_LENGTH),
            ));
        }
        if self.customer_contact.is_empty() {
            return Err(ValidationError::empty_field("customer_contact"));
        }
        if self.special_request.chars().count() > MAX_REQUEST_LENGTH {
            return Err(ValidationError::invalid_format(
                "special_request",
                format!("at most {} characters", MAX_REQUEST_LENGTH),
            ));
        }
        if self.pax == 0 {
            return Err(ValidationError::out_of_range("pax", 1, i64::from(u32::MAX), 0));
        }
        Ok(())
    }

    fn validate_against(&self, area: &Area, entering_area: bool) -> Result<(), Rejection> {
        if entering_area && !area.is_active {
            return Err(Rejection::AreaInactive {
                area: area.name.clone(),
            });
        }
        if self.pax > area.capacity {
            return Err(Rejection::OverAreaCapacity {
                capacity: area.capacity,
            });
        }
        if self.pax < area.min_pax {
            return Err(Rejection::BelowMinimum {
                area: area.name.clone(),
                min_pax: area.min_pax,
            });
        }
        Ok(())
    }
}

impl From<Rejection> for ReservationError {
    fn from(rejection: Rejection) -> Self {
        ReservationError::Validation(rejection)
    }
}

fn normalize_email(email: Option<String>) -> Option<String> {
    email
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty())
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use crate::domain::area::AreaKind;

    fn vip() -> Area {
        Area::new("VIP Room 1", AreaKind::Exclusive, 12)
            .unwrap()
            .with_min_pax(4)
    }

    #[test]
    fn public_booking_is_pending_even_if_status_requested() {
        let area = vip();
        let mut draft = draft_for(&area, 6);
        draft.status = Some(ReservationStatus::Confirmed);

        let reservation = Reservation::create(draft, &area, None).unwrap();

        assert_eq!(reservation.status, ReservationStatus::Pending);
        assert!(reservation.created_by.is_none());
        assert_eq!(reservation.version, 1);
    }

    #[test]
    fn staff_booking_may_start_in_any_status() {
        let area = vip();
        let mut draft = draft_for(&area, 6);
        draft.status = Some(ReservationStatus::Seated);

        let reservation = Reservation::create(draft, &area, Some(staff())).unwrap();

        assert_eq!(reservation.status, ReservationStatus::Seated);
        assert_eq!(reservation.created_by, Some(staff()));
    }

    #[test]
    fn rejects_party_over_room_capacity() {
        let area = vip();
        let err = Reservation::create(draft_for(&area, 13), &area, None).unwrap_err();
        assert_eq!(err.to_string(), "Guests exceed capacity (12) for this room.");
    }

    #[test]
    fn rejects_party_below_room_minimum() {
        let area = vip();
        let err = Reservation::create(draft_for(&area, 2), &area, None).unwrap_err();
        assert_eq!(
            err,
            ReservationError::Validation(Rejection::BelowMinimum {
                area: "VIP Room 1".into(),
                min_pax: 4
            })
        );
    }

    #[test]
    fn rejects_inactive_area() {
        let area = vip().deactivated();
        let err = Reservation::create(draft_for(&area, 6), &area, None).unwrap_err();
        assert!(matches!(
            err,
            ReservationError::Validation(Rejection::AreaInactive { .. })
        ));
    }

    #[test]
    fn rejects_blank_contact() {
        let area = vip();
        let mut draft = draft_for(&area, 6);
        draft.customer_contact = "   ".into();
        assert_eq!(
            Reservation::create(draft, &area, None).unwrap_err(),
            ValidationError::empty_field("customer_contact").into()
        );
    }

    #[test]
    fn blank_email_is_dropped() {
        let area = vip();
        let mut draft = draft_for(&area, 6);
        draft.customer_email = Some("  ".into());
        assert!(Reservation::create(draft, &area, None)
            .unwrap()
            .customer_email
            .is_none());
    }

    #[test]
    fn time_edit_flags_details_but_not_status() {
        let area = vip();
        let original = Reservation::create(draft_for(&area, 6), &area, None).unwrap();
        let patch = ReservationPatch {
            time: Some(NaiveTime::from_hms_opt(20, 30, 0).unwrap()),
            ..Default::default()
        };

        let (updated, changes) = original.apply(patch, &area, staff()).unwrap();

        assert!(changes.details_changed);
        assert!(!changes.status_changed);
        assert_eq!(updated.version, 2);
        assert_eq!(updated.last_modified_by, Some(staff()));
        assert!(!updated.reminder_sent);
    }

    #[test]
    fn special_request_edit_is_not_a_detail_change() {
        let area = vip();
        let original = Reservation::create(draft_for(&area, 6), &area, None).unwrap();
        let patch = ReservationPatch {
            special_request: Some("Birthday cake".into()),
            ..Default::default()
        };
        let (_, changes) = original.apply(patch, &area, staff()).unwrap();
        assert!(!changes.details_changed);
    }

    #[test]
    fn completion_sets_both_status_flags() {
        let area = vip();
        let mut original = Reservation::create(draft_for(&area, 6), &area, None).unwrap();
        original.status = ReservationStatus::Seated;

        let (_, changes) = original
            .apply(ReservationPatch::status(ReservationStatus::Completed), &area, staff())
            .unwrap();

        assert!(changes.status_changed);
        assert!(changes.became_completed);
        assert_eq!(changes.previous_status, ReservationStatus::Seated);
    }

    #[test]
    fn skipping_states_is_rejected() {
        let area = vip();
        let original = Reservation::create(draft_for(&area, 6), &area, None).unwrap();
        let err = original
            .apply(ReservationPatch::status(ReservationStatus::Completed), &area, staff())
            .unwrap_err();
        assert_eq!(err.code(), crate::domain::foundation::ErrorCode::InvalidStateTransition);
    }

    #[test]
    fn reopening_a_cancelled_booking_is_a_valid_change() {
        let area = vip();
        let mut original = Reservation::create(draft_for(&area, 6), &area, None).unwrap();
        original.status = ReservationStatus::Cancelled;

        let (updated, changes) = original
            .apply(ReservationPatch::status(ReservationStatus::Confirmed), &area, staff())
            .unwrap();

        assert_eq!(updated.status, ReservationStatus::Confirmed);
        assert!(changes.status_changed);
        assert!(updated.holds_area());
    }

    #[test]
    fn cancelled_booking_releases_its_slot() {
        let area = vip();
        let original = Reservation::create(draft_for(&area, 6), &area, None).unwrap();
        let (updated, _) = original
            .apply(ReservationPatch::status(ReservationStatus::Cancelled), &area, staff())
            .unwrap();
        assert!(!updated.holds_area());
    }

    #[test]
    fn moving_to_a_deactivated_area_is_rejected() {
        let area = vip();
        let other = Area::new("VIP Room 2", AreaKind::Exclusive, 12)
            .unwrap()
            .deactivated();
        let original = Reservation::create(draft_for(&area, 6), &area, None).unwrap();
        let patch = ReservationPatch {
            area_id: Some(other.id),
            ..Default::default()
        };
        assert!(original.apply(patch, &other, staff()).is_err());
    }
}
