//! Foundation module - shared domain primitives.
//!
//! Identifiers, time, errors, events and auth types that every
//! reservation module speaks in.

mod auth;
mod command;
mod errors;
mod events;
mod ids;
mod state_machine;
mod timestamp;

pub use crate::domain_event;

pub use auth::{AuthError, AuthenticatedUser, StaffRole};
pub use command::CommandMetadata;
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use events::{DomainEvent, EventEnvelope, EventId, EventMetadata};
pub use ids::{AreaId, CustomerId, JobId, ReservationId, StaffId};
pub use state_machine::StateMachine;
pub use timestamp::{BusinessClock, Timestamp};
