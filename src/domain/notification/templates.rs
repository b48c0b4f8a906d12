//! Message templates for customer and staff notifications.
//!
//! Templates are hard-coded per kind. Dates render like "March 01, 2025"
//! in email and "Mar 01" in SMS; times render like "07:00 PM".

use chrono::{NaiveDate, NaiveTime};

use super::NotificationKind;
use crate::domain::reservation::{Reservation, ReservationStatus};

/// Everything a template may mention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageContext {
    pub reservation_ref: String,
    pub customer_name: String,
    pub customer_contact: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub pax: u32,
    pub area_name: String,
    pub special_request: String,
    pub status: ReservationStatus,
}

impl MessageContext {
    pub fn new(reservation: &Reservation, area_name: impl Into<String>, status: ReservationStatus) -> Self {
        Self {
            reservation_ref: reservation.id.to_string(),
            customer_name: reservation.customer_name.clone(),
            customer_contact: reservation.customer_contact.clone(),
            date: reservation.date,
            time: reservation.time,
            pax: reservation.pax,
            area_name: area_name.into(),
            special_request: reservation.special_request.clone(),
            status,
        }
    }

    fn long_date(&self) -> String {
        self.date.format("%B %d, %Y").to_string()
    }

    fn short_date(&self) -> String {
        self.date.format("%b %d").to_string()
    }

    fn clock(&self) -> String {
        self.time.format("%I:%M %p").to_string()
    }

    fn request_or_none(&self) -> &str {
        if self.special_request.trim().is_empty() {
            "None"
        } else {
            &self.special_request
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub subject: String,
    pub html: String,
    pub plain: String,
}

/// Renders messages with the restaurant's brand details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageTemplates {
    pub brand_name: String,
    pub hotline: String,
    /// Sign-off appended to SMS bodies, also the registered sender name.
    pub sms_signature: String,
}

impl Default for MessageTemplates {
    fn default() -> Self {
        Self {
            brand_name: "Golden Bay".to_string(),
            hotline: "(02) 8804-0332".to_string(),
            sms_signature: "GOLDENBAY".to_string(),
        }
    }
}

impl MessageTemplates {
    /// Customer email for a job, or `None` when the kind has nothing to say
    /// for this status.
    pub fn customer_email(&self, kind: NotificationKind, ctx: &MessageContext) -> Option<EmailMessage> {
        let brand = &self.brand_name;
        let (subject, headline, body) = match kind {
            NotificationKind::NewBooking => (
                format!("Reservation Received - {}", brand),
                "We received your reservation".to_string(),
                format!(
                    "Thank you, {}. Your request is pending. We will message you once it is confirmed.",
                    ctx.customer_name
                ),
            ),
            NotificationKind::StatusChanged => match ctx.status {
                ReservationStatus::Confirmed => (
                    format!("Reservation Confirmed - {}", brand),
                    "Your table is confirmed".to_string(),
                    format!("Great news, {}! We look forward to serving you.", ctx.customer_name),
                ),
                ReservationStatus::Cancelled => (
                    format!("Reservation Cancelled - {}", brand),
                    "Your reservation was cancelled".to_string(),
                    format!(
                        "Hi {}, your reservation request has been cancelled. Please call {} to reschedule.",
                        ctx.customer_name, self.hotline
                    ),
                ),
                _ => return None,
            },
            NotificationKind::Modified => (
                format!("Reservation Updated - {}", brand),
                "Your reservation was updated".to_string(),
                format!("Hi {}, here are your updated booking details.", ctx.customer_name),
            ),
            NotificationKind::Reminder => (
                format!("Table Reminder - {}", brand),
                "See you soon".to_string(),
                format!(
                    "Hi {}, this is a reminder of your table today. Call {} for any changes.",
                    ctx.customer_name, self.hotline
                ),
            ),
            NotificationKind::PostVisitFeedback => (
                format!("Thank You for Dining with Us - {}", brand),
                "How was your visit?".to_string(),
                format!(
                    "Hi {}, thank you for dining at {}. We would love to hear about your experience.",
                    ctx.customer_name, brand
                ),
            ),
        };

        let details = [
            ("Date", ctx.long_date()),
            ("Time", ctx.clock()),
            ("Guests", ctx.pax.to_string()),
            ("Area", ctx.area_name.clone()),
            ("Reference", ctx.reservation_ref.clone()),
        ];
        Some(self.email(subject, &headline, &body, &details))
    }

    /// Customer SMS for a job, or `None` when the kind has nothing to say.
    pub fn customer_sms(&self, kind: NotificationKind, ctx: &MessageContext) -> Option<String> {
        let sig = &self.sms_signature;
        let text = match kind {
            NotificationKind::NewBooking => format!(
                "Hi {}, we received your {} reservation for {} pax on {} at {}. We will text you once it is confirmed. - {}",
                ctx.customer_name,
                self.brand_name,
                ctx.pax,
                ctx.short_date(),
                ctx.clock(),
                sig
            ),
            NotificationKind::StatusChanged => match ctx.status {
                ReservationStatus::Confirmed => format!(
                    "Great news, {}! Your table for {} on {} at {} is CONFIRMED. See you soon! - {}",
                    ctx.customer_name,
                    ctx.pax,
                    ctx.short_date(),
                    ctx.clock(),
                    sig
                ),
                ReservationStatus::Cancelled => format!(
                    "Hi {}, your reservation request has been cancelled. Please call {} to reschedule. - {}",
                    ctx.customer_name, self.hotline, sig
                ),
                _ => return None,
            },
            NotificationKind::Modified => format!(
                "Hi {}, your {} reservation has been UPDATED. You are now booked for {} pax on {} at {} in the {}. - {}",
                ctx.customer_name,
                self.brand_name,
                ctx.pax,
                ctx.short_date(),
                ctx.clock(),
                ctx.area_name,
                sig
            ),
            NotificationKind::Reminder => format!(
                "{} Reminder: Hi {}, we look forward to seeing you today at {}! Please reply to this SMS or call {} for any changes.",
                self.brand_name,
                ctx.customer_name,
                ctx.clock(),
                self.hotline
            ),
            NotificationKind::PostVisitFeedback => format!(
                "Hi {}, thank you for dining at {}! We would love your feedback. Reply to this SMS or call {}. - {}",
                ctx.customer_name, self.brand_name, self.hotline, sig
            ),
        };
        Some(text)
    }

    /// SMS sent to each staff phone when a booking arrives.
    pub fn staff_sms(&self, ctx: &MessageContext) -> String {
        format!(
            "NEW BOOKING: {} ({}) - {} pax, {} {} ({}), {}. Request: {}",
            ctx.customer_name,
            ctx.customer_contact,
            ctx.pax,
            ctx.short_date(),
            ctx.clock(),
            ctx.status.label(),
            ctx.area_name,
            ctx.request_or_none()
        )
    }

    /// Email sent to the staff inbox when a booking arrives.
    pub fn staff_email(&self, ctx: &MessageContext) -> EmailMessage {
        let subject = format!(
            "New Reservation - {} ({} pax) - {}",
            ctx.customer_name, ctx.pax, self.brand_name
        );
        let details = [
            ("Guest", ctx.customer_name.clone()),
            ("Contact", ctx.customer_contact.clone()),
            ("Date", ctx.long_date()),
            ("Time", ctx.clock()),
            ("Guests", ctx.pax.to_string()),
            ("Area", ctx.area_name.clone()),
            ("Status", ctx.status.label().to_string()),
            ("Special request", ctx.request_or_none().to_string()),
            ("Reference", ctx.reservation_ref.clone()),
        ];
        self.email(subject, "New reservation", "A new booking needs attention.", &details)
    }

    fn email(
        &self,
        subject: String,
        headline: &str,
        body: &str,
        details: &[(&str, String)],
    ) -> EmailMessage {
        let rows: String = details
            .iter()
            .map(|(label, value)| {
                format!(
                    "<tr><td><strong>{}</strong></td><td>{}</td></tr>",
                    escape_html(label),
                    escape_html(value)
                )
            })
            .collect();
        let html = format!(
            "<html><body><h2>{}</h2><p>{}</p><table>{}</table><p>{}</p></body></html>",
            escape_html(headline),
            escape_html(body),
            rows,
            escape_html(&self.brand_name)
        );

        let mut plain = format!("{}\n\n{}\n\n", headline, body);
        for (label, value) in details {
            plain.push_str(&format!("{}: {}\n", label, value));
        }
        plain.push_str(&format!("\n{}\n", self.brand_name));

        EmailMessage {
            subject,
            html,
            plain,
        }
    }
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
