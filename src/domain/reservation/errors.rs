//! Reservation-specific error types.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, StaffRole, ValidationError};

/// Why a booking cannot take its slot, or why its input is unusable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("{area} is already booked for this session.")]
    AreaTaken { area: String },

    #[error("Only {remaining} seats left in {area}.")]
    CapacityExceeded { area: String, remaining: u32 },

    #[error("Guests exceed capacity ({capacity}) for this room.")]
    OverAreaCapacity { capacity: u32 },

    #[error("{area} requires at least {min_pax} guests.")]
    BelowMinimum { area: String, min_pax: u32 },

    #[error("{area} is not accepting bookings.")]
    AreaInactive { area: String },

    #[error("Booking was changed by someone else. Reload and try again.")]
    StaleVersion,

    #[error("{0}")]
    Field(#[from] ValidationError),
}

impl Rejection {
    /// Remaining seats for capacity rejections.
    pub fn remaining_seats(&self) -> Option<u32> {
        match self {
            Rejection::CapacityExceeded { remaining, .. } => Some(*remaining),
            _ => None,
        }
    }

    /// Stable machine-readable reason.
    pub fn reason(&self) -> &'static str {
        match self {
            Rejection::AreaTaken { .. } => "area_taken",
            Rejection::CapacityExceeded { .. } => "capacity_exceeded",
            Rejection::OverAreaCapacity { .. } => "over_area_capacity",
            Rejection::BelowMinimum { .. } => "below_minimum",
            Rejection::AreaInactive { .. } => "area_inactive",
            Rejection::StaleVersion => "stale_version",
            Rejection::Field(ValidationError::InvalidTransition { .. }) => "invalid_transition",
            Rejection::Field(_) => "invalid_field",
        }
    }
}

/// Errors surfaced by the booking write and read paths.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReservationError {
    /// Input or invariant failure, detected before the area lock.
    #[error("{0}")]
    Validation(Rejection),

    /// The slot was taken while this request held no lock, or the record moved on.
    #[error("{0}")]
    Conflict(Rejection),

    #[error("{message}")]
    PermissionDenied { required: StaffRole, message: String },

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    #[error("Authentication required")]
    Unauthenticated,

    #[error("{0}")]
    Infrastructure(String),
}

impl ReservationError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        ReservationError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn permission(required: StaffRole, message: impl Into<String>) -> Self {
        ReservationError::PermissionDenied {
            required,
            message: message.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            ReservationError::Validation(Rejection::Field(ValidationError::InvalidTransition {
                ..
            })) => ErrorCode::InvalidStateTransition,
            ReservationError::Validation(_) => ErrorCode::ValidationFailed,
            ReservationError::Conflict(Rejection::StaleVersion) => ErrorCode::ConcurrentModification,
            ReservationError::Conflict(_) => ErrorCode::SlotTaken,
            ReservationError::PermissionDenied { .. } => ErrorCode::Forbidden,
            ReservationError::NotFound { entity: "Area", .. } => ErrorCode::AreaNotFound,
            ReservationError::NotFound { entity: "Customer", .. } => ErrorCode::CustomerNotFound,
            ReservationError::NotFound { .. } => ErrorCode::ReservationNotFound,
            ReservationError::Unauthenticated => ErrorCode::Unauthorized,
            ReservationError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }
}

impl From<ValidationError> for ReservationError {
    fn from(err: ValidationError) -> Self {
        ReservationError::Validation(Rejection::Field(err))
    }
}

impl From<DomainError> for ReservationError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ValidationFailed | ErrorCode::InvalidStateTransition => {
                ReservationError::Validation(Rejection::Field(ValidationError::invalid_format(
                    err.details.get("field").cloned().unwrap_or_default(),
                    err.message,
                )))
            }
            ErrorCode::ConcurrentModification => ReservationError::Conflict(Rejection::StaleVersion),
            ErrorCode::AreaNotFound => ReservationError::NotFound {
                entity: "Area",
                id: err.details.get("id").cloned().unwrap_or_default(),
            },
            ErrorCode::ReservationNotFound => ReservationError::NotFound {
                entity: "Reservation",
                id: err.details.get("id").cloned().unwrap_or_default(),
            },
            ErrorCode::CustomerNotFound => ReservationError::NotFound {
                entity: "Customer",
                id: err.details.get("id").cloned().unwrap_or_default(),
            },
            _ => ReservationError::Infrastructure(err.to_string()),
        }
    }
}
