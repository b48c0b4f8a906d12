//! Notification handlers: planning jobs from events, delivering due jobs
//! and the reminder scan.

mod notification_dispatcher;
mod notification_planner;
mod schedule_reminders;

pub use notification_dispatcher::{DispatchOutcome, NotificationDispatcher};
pub use notification_planner::NotificationPlanner;
pub use schedule_reminders::ScheduleRemindersHandler;
