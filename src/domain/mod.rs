//! Domain layer - pure business logic with no infrastructure dependencies.

pub mod area;
pub mod customer;
pub mod dashboard;
pub mod foundation;
pub mod notification;
pub mod reservation;
