//! Slot occupancy rules shared by the availability view and the write guard.
//!
//! A slot is one (area, date, session). Both the advisory read and the
//! locked re-check call [`check_slot`] so they can never disagree.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{MealSession, Rejection, ReservationStatus};
use crate::domain::area::{Area, AreaKind};
use crate::domain::foundation::{AreaId, ReservationId};

/// Key of a bookable slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Slot {
    pub area_id: AreaId,
    pub date: NaiveDate,
    pub session: MealSession,
}

/// The part of a reservation that matters for occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotBooking {
    pub reservation_id: ReservationId,
    pub area_id: AreaId,
    pub pax: u32,
    pub status: ReservationStatus,
}

/// Aggregate use of one area in one slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotUsage {
    pub active_bookings: u32,
    pub booked_pax: u32,
}

impl SlotUsage {
    /// Counts bookings that hold the area, skipping `exclude` so that an
    /// edited booking never collides with itself.
    pub fn tally<'a, I>(bookings: I, exclude: Option<ReservationId>) -> Self
    where
        I: IntoIterator<Item = &'a SlotBooking>,
    {
        bookings
            .into_iter()
            .filter(|b| b.status.occupies_area())
            .filter(|b| Some(b.reservation_id) != exclude)
            .fold(SlotUsage::default(), |acc, b| SlotUsage {
                active_bookings: acc.active_bookings + 1,
                booked_pax: acc.booked_pax.saturating_add(b.pax),
            })
    }

    pub fn remaining(&self, area: &Area) -> u32 {
        area.capacity.saturating_sub(self.booked_pax)
    }
}

/// Decides whether a party of `pax` fits into `area` given the current usage.
pub fn check_slot(area: &Area, usage: &SlotUsage, pax: u32) -> Result<(), Rejection> {
    if pax > area.capacity {
        return Err(Rejection::OverAreaCapacity {
            capacity: area.capacity,
        });
    }
    match area.kind {
        AreaKind::Exclusive if usage.active_bookings > 0 => Err(Rejection::AreaTaken {
            area: area.name.clone(),
        }),
        AreaKind::Shared if usage.booked_pax.saturating_add(pax) > area.capacity => {
            Err(Rejection::CapacityExceeded {
                area: area.name.clone(),
                remaining: usage.remaining(area),
            })
        }
        _ => Ok(()),
    }
}

/// Availability of one area for a slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaAvailability {
    pub area: Area,
    pub is_available: bool,
    /// Always 0 for exclusive areas.
    pub remaining_capacity: u32,
    pub booked_pax: u32,
}

impl AreaAvailability {
    pub fn from_usage(area: Area, usage: &SlotUsage) -> Self {
        let (is_available, remaining_capacity) = match area.kind {
            AreaKind::Exclusive => (usage.active_bookings == 0, 0),
            AreaKind::Shared => (usage.booked_pax < area.capacity, usage.remaining(&area)),
        };
        Self {
            area,
            is_available,
            remaining_capacity,
            booked_pax: usage.booked_pax,
        }
    }
}
