//! NotificationPlanner - turns committed reservation events into jobs.
//!
//! Planning happens after commit, so a slow or broken gateway never
//! touches the booking write. The jobs themselves are durable; delivery is
//! the dispatcher's concern.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ErrorCode, EventEnvelope, ReservationId, Timestamp};
use crate::domain::notification::{plan_for_created, plan_for_update, PlannedJob};
use crate::domain::reservation::{
    ReservationCreated, ReservationUpdated, RESERVATION_CREATED, RESERVATION_UPDATED,
};
use crate::ports::{EventHandler, TaskQueue};

pub struct NotificationPlanner {
    queue: Arc<dyn TaskQueue>,
}

impl NotificationPlanner {
    pub fn new(queue: Arc<dyn TaskQueue>) -> Self {
        Self { queue }
    }

    fn plan(
        &self,
        event: &EventEnvelope,
    ) -> Result<Option<(ReservationId, Vec<PlannedJob>)>, DomainError> {
        let bad_payload = |e: serde_json::Error| {
            DomainError::new(ErrorCode::ValidationFailed, format!("Bad reservation event: {}", e))
        };
        match event.event_type.as_str() {
            RESERVATION_CREATED => {
                let created: ReservationCreated = event.payload_as().map_err(bad_payload)?;
                Ok(Some((created.reservation_id, plan_for_created(&created.reservation))))
            }
            RESERVATION_UPDATED => {
                let updated: ReservationUpdated = event.payload_as().map_err(bad_payload)?;
                Ok(Some((
                    updated.reservation_id,
                    plan_for_update(&updated.reservation, &updated.changes),
                )))
            }
            _ => Ok(None),
        }
    }
}

#[async_trait]
impl EventHandler for NotificationPlanner {
    async fn handle(&self, event: EventEnvelope) -> Result<(), DomainError> {
        let Some((reservation_id, planned)) = self.plan(&event)? else {
            return Ok(());
        };

        let now = Timestamp::now();
        for planned in planned {
            let job = planned.into_job(reservation_id, now);
            tracing::info!(
                job_id = %job.id,
                reservation_id = %reservation_id,
                kind = job.kind.as_str(),
                delay_minutes = planned.delay.map_or(0, |d| d.num_minutes()),
                "notification job planned"
            );
            match planned.delay {
                Some(delay) => self.queue.enqueue_delayed(job, delay).await?,
                None => self.queue.enqueue(job).await?,
            }
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "notification_planner"
    }
}
