//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations, plus the
//! post-commit event handlers fed by the outbox.

pub mod area;
pub mod availability;
pub mod customer;
pub mod dashboard;
pub mod notification;
pub mod reservation;

pub use area::ListAreasHandler;
pub use availability::{ResolveAvailabilityHandler, ResolveAvailabilityQuery};
pub use customer::{
    CustomerSyncHandler, DeleteCustomerHandler, GetCustomerHandler, ListCustomersHandler,
    UpdateCustomerCommand, UpdateCustomerHandler,
};
pub use dashboard::GetDashboardHandler;
pub use notification::{
    DispatchOutcome, NotificationDispatcher, NotificationPlanner, ScheduleRemindersHandler,
};
pub use reservation::{
    CreateReservationCommand, CreateReservationHandler, CreateReservationResult,
    GetReservationHandler, GetReservationHistoryHandler, ListReservationsHandler,
    UpdateReservationCommand, UpdateReservationHandler, UpdateReservationResult,
};
