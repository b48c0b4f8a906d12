//! Background workers.
//!
//! - `NotificationWorker` - Delivers due notification jobs
//! - `ReminderScheduler` - Periodic reminder scan
//!
//! Both stop when the shared `watch` shutdown flag flips to `true`.

mod notification_worker;
mod reminder_scheduler;

pub use notification_worker::NotificationWorker;
pub use reminder_scheduler::ReminderScheduler;
