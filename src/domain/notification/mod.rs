//! Notification domain module.
//!
//! Lifecycle events become notification jobs. A job names a reservation
//! and a message kind; the dispatcher re-reads the booking when the job
//! comes due and turns it into zero to two channel deliveries.

mod templates;

pub use templates::{EmailMessage, MessageContext, MessageTemplates};

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{JobId, ReservationId, Timestamp, ValidationError};
use crate::domain::reservation::{ChangeSet, Reservation, ReservationStatus};

/// Minutes between completion and the feedback request.
pub const FEEDBACK_DELAY_MINUTES: i64 = 120;

/// Target lead time for reminders, with the accepted tolerance either side.
pub const REMINDER_LEAD_MINUTES: i64 = 240;
pub const REMINDER_TOLERANCE_MINUTES: i64 = 15;

pub fn feedback_delay() -> Duration {
    Duration::minutes(FEEDBACK_DELAY_MINUTES)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    NewBooking,
    StatusChanged,
    Modified,
    Reminder,
    PostVisitFeedback,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::NewBooking => "new_booking",
            NotificationKind::StatusChanged => "status_changed",
            NotificationKind::Modified => "modified",
            NotificationKind::Reminder => "reminder",
            NotificationKind::PostVisitFeedback => "post_visit_feedback",
        }
    }

    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s {
            "new_booking" => Ok(NotificationKind::NewBooking),
            "status_changed" => Ok(NotificationKind::StatusChanged),
            "modified" => Ok(NotificationKind::Modified),
            "reminder" => Ok(NotificationKind::Reminder),
            "post_visit_feedback" => Ok(NotificationKind::PostVisitFeedback),
            other => Err(ValidationError::invalid_format(
                "notification_kind",
                format!("unknown kind '{}'", other),
            )),
        }
    }

    /// New bookings are also announced to the staff.
    pub fn notifies_staff(&self) -> bool {
        matches!(self, NotificationKind::NewBooking)
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Email,
    Sms,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Email => write!(f, "email"),
            Channel::Sms => write!(f, "sms"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Done,
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Done => "done",
            JobStatus::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s {
            "pending" => Ok(JobStatus::Pending),
            "done" => Ok(JobStatus::Done),
            "failed" => Ok(JobStatus::Failed),
            other => Err(ValidationError::invalid_format(
                "job_status",
                format!("unknown job status '{}'", other),
            )),
        }
    }
}

/// A queued message for one reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationJob {
    pub id: JobId,
    pub reservation_id: ReservationId,
    pub kind: NotificationKind,
    /// Reservation status when the job was planned.
    pub trigger_status: ReservationStatus,
    pub due_at: Timestamp,
    pub status: JobStatus,
    pub attempts: u32,
    pub last_error: Option<String>,
    pub created_at: Timestamp,
}

impl NotificationJob {
    pub fn new(
        reservation_id: ReservationId,
        kind: NotificationKind,
        trigger_status: ReservationStatus,
        due_at: Timestamp,
    ) -> Self {
        Self {
            id: JobId::new(),
            reservation_id,
            kind,
            trigger_status,
            due_at,
            status: JobStatus::Pending,
            attempts: 0,
            last_error: None,
            created_at: Timestamp::now(),
        }
    }

    pub fn is_due(&self, now: &Timestamp) -> bool {
        self.status == JobStatus::Pending && !now.is_before(&self.due_at)
    }
}

/// A job the planner wants, before it gets an id and due time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedJob {
    pub kind: NotificationKind,
    pub trigger_status: ReservationStatus,
    /// `None` means send as soon as possible.
    pub delay: Option<Duration>,
}

impl PlannedJob {
    /// The job due at `now`. A `delay` is added by the queue on enqueue.
    pub fn into_job(self, reservation_id: ReservationId, now: Timestamp) -> NotificationJob {
        NotificationJob::new(reservation_id, self.kind, self.trigger_status, now)
    }
}

/// Jobs for a freshly accepted booking.
pub fn plan_for_created(reservation: &Reservation) -> Vec<PlannedJob> {
    vec![PlannedJob {
        kind: NotificationKind::NewBooking,
        trigger_status: reservation.status,
        delay: None,
    }]
}

/// Jobs for an accepted edit. At most one job, first match wins:
///
/// 1. became Completed: feedback request after [`feedback_delay`]
/// 2. became Confirmed or Cancelled: status message
/// 3. area, date or time changed on a live booking: modification message
pub fn plan_for_update(reservation: &Reservation, changes: &ChangeSet) -> Vec<PlannedJob> {
    let status = reservation.status;
    let planned = |kind, delay| {
        vec![PlannedJob {
            kind,
            trigger_status: status,
            delay,
        }]
    };

    if changes.became_completed {
        planned(NotificationKind::PostVisitFeedback, Some(feedback_delay()))
    } else if changes.status_changed
        && matches!(status, ReservationStatus::Confirmed | ReservationStatus::Cancelled)
    {
        planned(NotificationKind::StatusChanged, None)
    } else if changes.details_changed && status != ReservationStatus::Cancelled {
        planned(NotificationKind::Modified, None)
    } else {
        Vec::new()
    }
}

/// Returns the address when it looks deliverable.
pub fn email_recipient(email: Option<&str>) -> Option<&str> {
    let email = email?.trim();
    let (local, domain) = email.split_once('@')?;
    let plausible = !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.contains(char::is_whitespace);
    plausible.then_some(email)
}

/// Returns the contact when it holds a phone number of at least 10 digits.
///
/// Messaging handles without digits yield `None`.
pub fn sms_recipient(contact: &str) -> Option<&str> {
    let digits = contact.chars().filter(|c| c.is_ascii_digit()).count();
    (digits >= 10).then_some(contact.trim())
}

/// Whether a booking is in the reminder scan: confirmed, not yet reminded,
/// and dated today or tomorrow.
pub fn is_reminder_candidate(reservation: &Reservation, today: NaiveDate) -> bool {
    reservation.status == ReservationStatus::Confirmed
        && !reservation.reminder_sent
        && (reservation.date == today || today.succ_opt() == Some(reservation.date))
}

/// Whether the time left until arrival falls in the reminder window.
pub fn in_reminder_window(lead: Duration) -> bool {
    let earliest = Duration::minutes(REMINDER_LEAD_MINUTES - REMINDER_TOLERANCE_MINUTES);
    let latest = Duration::minutes(REMINDER_LEAD_MINUTES + REMINDER_TOLERANCE_MINUTES);
    lead >= earliest && lead <= latest
}
