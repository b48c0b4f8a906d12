//! Availability query handler.

mod resolve_availability;

pub use resolve_availability::{ResolveAvailabilityHandler, ResolveAvailabilityQuery};
