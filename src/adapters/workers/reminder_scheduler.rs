//! ReminderScheduler - runs the reminder scan on a fixed interval.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time;

use crate::application::handlers::ScheduleRemindersHandler;
use crate::domain::foundation::Timestamp;

pub struct ReminderScheduler {
    handler: Arc<ScheduleRemindersHandler>,
    scan_interval: Duration,
}

impl ReminderScheduler {
    pub fn new(handler: Arc<ScheduleRemindersHandler>, scan_interval: Duration) -> Self {
        Self {
            handler,
            scan_interval,
        }
    }

    /// Scans until `shutdown` flips to `true`.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut interval = time::interval(self.scan_interval);
        interval.set_missed_tick_behavior(time::MissedTickBehavior::Skip);
        tracing::info!(
            scan_secs = self.scan_interval.as_secs(),
            "reminder scheduler started"
        );

        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        tracing::info!("reminder scheduler stopped");
                        return;
                    }
                }
                _ = interval.tick() => {
                    match self.handler.handle(Timestamp::now()).await {
                        Ok(0) => {}
                        Ok(queued) => tracing::info!(queued, "reminders queued"),
                        Err(e) => tracing::error!(error = %e, "reminder scan failed"),
                    }
                }
            }
        }
    }
}
