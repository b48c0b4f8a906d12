//! NotificationDispatcher - delivers one due job over email and SMS.
//!
//! The booking is re-read at fire time. Delayed kinds check that the
//! booking is still in the status they were planned for, so a feedback
//! request for a re-opened booking goes nowhere.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::notification::{
    email_recipient, sms_recipient, MessageContext, MessageTemplates, NotificationJob,
    NotificationKind,
};
use crate::domain::reservation::{Reservation, ReservationStatus};
use crate::ports::{AreaRegistry, EmailTransport, ReservationLedger, SmsTransport};

/// What happened to a job that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Number of messages handed to a gateway.
    Delivered { sent: u32 },
    /// Nothing to send, with the reason.
    Skipped(&'static str),
}

pub struct NotificationDispatcher {
    ledger: Arc<dyn ReservationLedger>,
    areas: Arc<dyn AreaRegistry>,
    email: Arc<dyn EmailTransport>,
    sms: Arc<dyn SmsTransport>,
    templates: MessageTemplates,
    staff_email: Option<String>,
    staff_phones: Vec<String>,
}

impl NotificationDispatcher {
    pub fn new(
        ledger: Arc<dyn ReservationLedger>,
        areas: Arc<dyn AreaRegistry>,
        email: Arc<dyn EmailTransport>,
        sms: Arc<dyn SmsTransport>,
        templates: MessageTemplates,
    ) -> Self {
        Self {
            ledger,
            areas,
            email,
            sms,
            templates,
            staff_email: None,
            staff_phones: Vec::new(),
        }
    }

    /// Recipients told about every new booking.
    pub fn with_staff(mut self, email: Option<String>, phones: Vec<String>) -> Self {
        self.staff_email = email;
        self.staff_phones = phones;
        self
    }

    pub async fn dispatch(&self, job: &NotificationJob) -> Result<DispatchOutcome, DomainError> {
        let Some(reservation) = self.ledger.find_by_id(&job.reservation_id).await? else {
            return Ok(DispatchOutcome::Skipped("reservation no longer exists"));
        };
        if let Some(reason) = stale_reason(job.kind, &reservation) {
            tracing::info!(
                job_id = %job.id,
                reservation_id = %reservation.id,
                status = reservation.status.as_str(),
                reason,
                "notification skipped"
            );
            return Ok(DispatchOutcome::Skipped(reason));
        }

        let area_name = match self.areas.get(&reservation.area_id).await? {
            Some(area) => area.name,
            None => self.templates.brand_name.clone(),
        };
        let ctx = MessageContext::new(&reservation, area_name, job.trigger_status);

        let mut tally = Tally::default();

        if let Some(to) = email_recipient(reservation.customer_email.as_deref()) {
            if let Some(message) = self.templates.customer_email(job.kind, &ctx) {
                tally.record("email", to, self.email.send_email(to, &message).await);
            }
        }
        if let Some(to) = sms_recipient(&reservation.customer_contact) {
            if let Some(body) = self.templates.customer_sms(job.kind, &ctx) {
                tally.record("sms", to, self.sms.send_sms(to, &body).await);
            }
        }

        if job.kind.notifies_staff() {
            let body = self.templates.staff_sms(&ctx);
            for phone in &self.staff_phones {
                tally.record("staff sms", phone, self.sms.send_sms(phone, &body).await);
            }
            if let Some(to) = &self.staff_email {
                let message = self.templates.staff_email(&ctx);
                tally.record("staff email", to, self.email.send_email(to, &message).await);
            }
        }

        if !tally.failures.is_empty() {
            return Err(DomainError::new(
                ErrorCode::TransportError,
                tally.failures.join("; "),
            ));
        }

        tracing::info!(
            job_id = %job.id,
            reservation_id = %reservation.id,
            kind = job.kind.as_str(),
            sent = tally.sent,
            "notification delivered"
        );
        Ok(if tally.sent == 0 {
            DispatchOutcome::Skipped("no reachable recipient")
        } else {
            DispatchOutcome::Delivered { sent: tally.sent }
        })
    }
}

#[derive(Default)]
struct Tally {
    sent: u32,
    failures: Vec<String>,
}

impl Tally {
    fn record(&mut self, channel: &str, to: &str, result: Result<(), DomainError>) {
        match result {
            Ok(()) => self.sent += 1,
            Err(e) => {
                tracing::warn!(channel, to, error = %e.message, "send failed");
                self.failures.push(format!("{} to {}: {}", channel, to, e.message));
            }
        }
    }
}

/// Why a job planned earlier no longer applies to the booking.
fn stale_reason(kind: NotificationKind, reservation: &Reservation) -> Option<&'static str> {
    match kind {
        NotificationKind::PostVisitFeedback
            if reservation.status != ReservationStatus::Completed =>
        {
            Some("booking is no longer completed")
        }
        NotificationKind::Reminder if reservation.status != ReservationStatus::Confirmed => {
            Some("booking is no longer confirmed")
        }
        _ => None,
    }
}
