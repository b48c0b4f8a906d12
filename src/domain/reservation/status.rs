//! Reservation lifecycle status and the small enums that travel with a booking.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{StateMachine, ValidationError};

/// Lifecycle status of a reservation.
///
/// ```text
/// Pending -> Confirmed -> Seated -> Completed
///    |           |          |
///    +-----------+--> Cancelled
///                +----------+--> NoShow
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    #[default]
    Pending,
    Confirmed,
    Seated,
    Completed,
    NoShow,
    Cancelled,
}

impl ReservationStatus {
    pub const ALL: [ReservationStatus; 6] = [
        ReservationStatus::Pending,
        ReservationStatus::Confirmed,
        ReservationStatus::Seated,
        ReservationStatus::Completed,
        ReservationStatus::NoShow,
        ReservationStatus::Cancelled,
    ];

    /// Whether a booking in this status holds its area.
    ///
    /// Cancelled and no-show bookings release their seats.
    pub fn occupies_area(&self) -> bool {
        !matches!(self, ReservationStatus::Cancelled | ReservationStatus::NoShow)
    }

    /// Terminal states that only elevated staff may leave.
    pub fn is_finalized(&self) -> bool {
        matches!(self, ReservationStatus::Completed | ReservationStatus::Cancelled)
    }

    /// Whether `target` re-opens a booking that ordinary flow has closed.
    pub fn is_reopen_to(&self, target: &ReservationStatus) -> bool {
        self.is_terminal() && !target.is_terminal()
    }

    /// Status change that a staff edit may request: a graph edge or a re-open.
    pub fn can_change_to(&self, target: &ReservationStatus) -> bool {
        self == target || self.can_transition_to(target) || self.is_reopen_to(target)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::Seated => "seated",
            ReservationStatus::Completed => "completed",
            ReservationStatus::NoShow => "no_show",
            ReservationStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                ValidationError::invalid_format("status", format!("unknown status '{}'", s))
            })
    }

    /// Human label used in customer messages, e.g. "Confirmed".
    pub fn label(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "Pending",
            ReservationStatus::Confirmed => "Confirmed",
            ReservationStatus::Seated => "Seated",
            ReservationStatus::Completed => "Completed",
            ReservationStatus::NoShow => "No Show",
            ReservationStatus::Cancelled => "Cancelled",
        }
    }
}

impl StateMachine for ReservationStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use ReservationStatus::*;
        match self {
            Pending => vec![Confirmed, Cancelled],
            Confirmed => vec![Seated, Cancelled, NoShow],
            Seated => vec![Completed, NoShow],
            Completed | NoShow | Cancelled => vec![],
        }
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Coarse service window a booking belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealSession {
    /// 11:00 AM to 2:30 PM.
    Lunch,
    /// 5:00 PM to 10:00 PM.
    Dinner,
}

impl MealSession {
    pub fn as_str(&self) -> &'static str {
        match self {
            MealSession::Lunch => "lunch",
            MealSession::Dinner => "dinner",
        }
    }

    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s.to_ascii_lowercase().as_str() {
            "lunch" => Ok(MealSession::Lunch),
            "dinner" => Ok(MealSession::Dinner),
            other => Err(ValidationError::invalid_format(
                "session",
                format!("unknown session '{}'", other),
            )),
        }
    }
}

impl fmt::Display for MealSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Channel a booking arrived through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BookingSource {
    #[default]
    Web,
    WalkIn,
    Phone,
    Social,
}

impl BookingSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingSource::Web => "web",
            BookingSource::WalkIn => "walk_in",
            BookingSource::Phone => "phone",
            BookingSource::Social => "social",
        }
    }

    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s {
            "web" => Ok(BookingSource::Web),
            "walk_in" => Ok(BookingSource::WalkIn),
            "phone" => Ok(BookingSource::Phone),
            "social" => Ok(BookingSource::Social),
            other => Err(ValidationError::invalid_format(
                "source",
                format!("unknown source '{}'", other),
            )),
        }
    }
}
