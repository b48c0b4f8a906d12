//! Shared wiring for the integration tests: the full application graph over
//! in-memory storage with recording gateways.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};

use goldenbay_reservations::adapters::auth::MockSessionValidator;
use goldenbay_reservations::adapters::notify::{RecordingEmailTransport, RecordingSmsTransport};
use goldenbay_reservations::bootstrap::{Application, Ports, Transports};
use goldenbay_reservations::config::AppConfig;
use goldenbay_reservations::domain::area::{Area, AreaKind};
use goldenbay_reservations::domain::foundation::{AuthenticatedUser, StaffId, StaffRole, Timestamp};
use goldenbay_reservations::domain::reservation::{BookingSource, MealSession, ReservationDraft};

pub const STAFF_PHONES: &str = "0917 000 0001, 0917 000 0002";
pub const STAFF_EMAIL: &str = "frontdesk@goldenbay.com.ph";

pub struct Harness {
    pub app: Application,
    pub ports: Ports,
    pub email: Arc<RecordingEmailTransport>,
    pub sms: Arc<RecordingSmsTransport>,
    pub hall: Area,
    pub vip_room: Area,
    pub manila_room: Area,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_validator(MockSessionValidator::new())
    }

    pub fn with_validator(validator: MockSessionValidator) -> Self {
        let hall = Area::new("Main Dining Hall", AreaKind::Shared, 250).unwrap();
        let vip_room = Area::new("VIP Room 1", AreaKind::Exclusive, 20).unwrap();
        let manila_room = Area::new("MANILA VIP Room", AreaKind::Exclusive, 60).unwrap();
        let ports = Ports::in_memory([hall.clone(), vip_room.clone(), manila_room.clone()]);

        let email = Arc::new(RecordingEmailTransport::new());
        let sms = Arc::new(RecordingSmsTransport::new());
        let transports = Transports {
            email: email.clone(),
            sms: sms.clone(),
        };

        let mut config = AppConfig::default();
        config.sms.staff_phones = Some(STAFF_PHONES.to_string());
        config.email.staff_email = Some(STAFF_EMAIL.to_string());

        let app = Application::build(ports.clone(), transports, Arc::new(validator), &config).unwrap();

        Self {
            app,
            ports,
            email,
            sms,
            hall,
            vip_room,
            manila_room,
        }
    }

    /// Publishes every pending event, then sends every job due at `now`.
    ///
    /// Jobs planned while draining are stamped with the wall clock, so `now`
    /// is never allowed to lag behind it.
    pub async fn settle(&self, now: Timestamp) {
        while self.app.outbox_publisher.process_batch().await.unwrap() > 0 {}
        let now = now.max(Timestamp::now());
        while self.app.notification_worker.process_due(now).await.unwrap() > 0 {}
    }

    pub fn sent_count(&self) -> usize {
        self.email.sent().len() + self.sms.sent().len()
    }
}

pub fn staff(id: &str, role: StaffRole) -> AuthenticatedUser {
    AuthenticatedUser::new(
        StaffId::new(id).unwrap(),
        format!("{}@goldenbay.test", id),
        None,
        role,
    )
}

pub fn dinner_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2031, 3, 14).unwrap()
}

pub fn draft(area: &Area, pax: u32) -> ReservationDraft {
    ReservationDraft {
        customer_name: "Maria Santos".to_string(),
        customer_contact: "0917 123 4567".to_string(),
        customer_email: Some("maria@example.com".to_string()),
        area_id: area.id,
        date: dinner_date(),
        session: MealSession::Dinner,
        time: NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
        pax,
        special_request: String::new(),
        source: BookingSource::Web,
        status: None,
    }
}
