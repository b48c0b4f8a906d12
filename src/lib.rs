//! Golden Bay Reservations
//!
//! Dining-area bookings for a restaurant with private VIP rooms and a shared
//! main hall: availability, a guarded booking ledger with a status
//! lifecycle, role checks for staff edits, a customer directory derived
//! from bookings, and queued email/SMS notifications.

pub mod adapters;
pub mod application;
pub mod bootstrap;
pub mod config;
pub mod domain;
pub mod ports;
