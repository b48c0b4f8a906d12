//! Wiring: ports, handlers, event subscriptions and background workers.
//!
//! `main` builds this over PostgreSQL; the integration tests build the same
//! graph over the in-memory adapters.

use std::sync::Arc;

use sqlx::PgPool;

use crate::adapters::events::{IdempotentHandler, InProcessEventBus, OutboxPublisher, OutboxPublisherConfig};
use crate::adapters::http::customers::CustomerHandlers;
use crate::adapters::http::middleware::AuthState;
use crate::adapters::http::reservations::ReservationHandlers;
use crate::adapters::http::AppState;
use crate::adapters::memory::{
    InMemoryAreaRegistry, InMemoryCustomerDirectory, InMemoryDashboardReader, InMemoryOutbox,
    InMemoryProcessedEventStore, InMemoryReservationStore, InMemoryTaskQueue,
};
use crate::adapters::postgres::{
    PostgresAreaRegistry, PostgresCustomerDirectory, PostgresDashboardReader,
    PostgresOutboxWriter, PostgresProcessedEventStore, PostgresReservationStore,
    PostgresTaskQueue,
};
use crate::adapters::workers::{NotificationWorker, ReminderScheduler};
use crate::application::handlers::{
    CreateReservationHandler, CustomerSyncHandler, DeleteCustomerHandler, GetCustomerHandler,
    GetDashboardHandler, GetReservationHandler, GetReservationHistoryHandler, ListAreasHandler,
    ListCustomersHandler, ListReservationsHandler, NotificationDispatcher, NotificationPlanner,
    ResolveAvailabilityHandler, ScheduleRemindersHandler, UpdateCustomerHandler,
    UpdateReservationHandler,
};
use crate::config::{AppConfig, ValidationError};
use crate::domain::area::Area;
use crate::domain::reservation::{RESERVATION_CREATED, RESERVATION_UPDATED};
use crate::ports::{
    AreaRegistry, CustomerDirectory, DashboardReader, EmailTransport, EventSubscriber,
    OutboxWriter, ProcessedEventStore, ReservationLedger, ReservationReader, SmsTransport,
    TaskQueue,
};

/// Storage ports, all backed by the same store.
#[derive(Clone)]
pub struct Ports {
    pub areas: Arc<dyn AreaRegistry>,
    pub ledger: Arc<dyn ReservationLedger>,
    pub reader: Arc<dyn ReservationReader>,
    pub customers: Arc<dyn CustomerDirectory>,
    pub dashboard: Arc<dyn DashboardReader>,
    pub outbox: Arc<dyn OutboxWriter>,
    pub processed_events: Arc<dyn ProcessedEventStore>,
    pub tasks: Arc<dyn TaskQueue>,
}

impl Ports {
    pub fn postgres(pool: PgPool) -> Self {
        let reservations = Arc::new(PostgresReservationStore::new(pool.clone()));
        Self {
            areas: Arc::new(PostgresAreaRegistry::new(pool.clone())),
            ledger: reservations.clone(),
            reader: reservations,
            customers: Arc::new(PostgresCustomerDirectory::new(pool.clone())),
            dashboard: Arc::new(PostgresDashboardReader::new(pool.clone())),
            outbox: Arc::new(PostgresOutboxWriter::new(pool.clone())),
            processed_events: Arc::new(PostgresProcessedEventStore::new(pool.clone())),
            tasks: Arc::new(PostgresTaskQueue::new(pool)),
        }
    }

    /// Process-local storage seeded with `areas`.
    pub fn in_memory(areas: impl IntoIterator<Item = Area>) -> Self {
        let registry = Arc::new(InMemoryAreaRegistry::with_areas(areas));
        let outbox = Arc::new(InMemoryOutbox::new());
        let reservations = Arc::new(InMemoryReservationStore::new(outbox.clone()));
        Self {
            areas: registry.clone(),
            ledger: reservations.clone(),
            reader: reservations.clone(),
            customers: Arc::new(InMemoryCustomerDirectory::new()),
            dashboard: Arc::new(InMemoryDashboardReader::new(registry, reservations)),
            outbox,
            processed_events: Arc::new(InMemoryProcessedEventStore::new()),
            tasks: Arc::new(InMemoryTaskQueue::new()),
        }
    }
}

/// Outbound message gateways.
#[derive(Clone)]
pub struct Transports {
    pub email: Arc<dyn EmailTransport>,
    pub sms: Arc<dyn SmsTransport>,
}

/// The wired application: HTTP state plus the background services.
pub struct Application {
    pub state: AppState,
    pub bus: Arc<InProcessEventBus>,
    pub outbox_publisher: Arc<OutboxPublisher>,
    pub notification_worker: Arc<NotificationWorker>,
    pub reminder_scheduler: Arc<ReminderScheduler>,
    pub reminders: Arc<ScheduleRemindersHandler>,
}

impl Application {
    pub fn build(
        ports: Ports,
        transports: Transports,
        validator: AuthState,
        config: &AppConfig,
    ) -> Result<Self, ValidationError> {
        let clock = config.business.clock()?;
        let templates = config.business.templates(&config.sms.sender_name);

        // Post-commit consumers, each at most once per event
        let bus = Arc::new(InProcessEventBus::new());
        let event_types = [RESERVATION_CREATED, RESERVATION_UPDATED];
        bus.subscribe_all(
            &event_types,
            Arc::new(IdempotentHandler::new(
                CustomerSyncHandler::new(ports.customers.clone()),
                ports.processed_events.clone(),
            )),
        );
        bus.subscribe_all(
            &event_types,
            Arc::new(IdempotentHandler::new(
                NotificationPlanner::new(ports.tasks.clone()),
                ports.processed_events.clone(),
            )),
        );

        let outbox_publisher = Arc::new(OutboxPublisher::with_config(
            ports.outbox.clone(),
            bus.clone(),
            OutboxPublisherConfig::from(&config.workers),
        ));

        let dispatcher = NotificationDispatcher::new(
            ports.ledger.clone(),
            ports.areas.clone(),
            transports.email,
            transports.sms,
            templates,
        )
        .with_staff(config.email.staff_email.clone(), config.sms.staff_phone_list());
        let notification_worker = Arc::new(NotificationWorker::new(
            ports.tasks.clone(),
            Arc::new(dispatcher),
            config.workers.job_poll_interval(),
            config.workers.job_batch_size,
        ));

        let reminders = Arc::new(ScheduleRemindersHandler::new(
            ports.reader.clone(),
            ports.ledger.clone(),
            ports.tasks.clone(),
            clock,
        ));
        let reminder_scheduler = Arc::new(ReminderScheduler::new(
            reminders.clone(),
            config.workers.reminder_scan_interval(),
        ));

        let reservations = ReservationHandlers {
            create: Arc::new(CreateReservationHandler::new(
                ports.areas.clone(),
                ports.ledger.clone(),
                ports.reader.clone(),
            )),
            update: Arc::new(UpdateReservationHandler::new(
                ports.areas.clone(),
                ports.ledger.clone(),
            )),
            get: Arc::new(GetReservationHandler::new(ports.ledger.clone())),
            history: Arc::new(GetReservationHistoryHandler::new(ports.ledger.clone())),
            list: Arc::new(ListReservationsHandler::new(ports.reader.clone())),
            availability: Arc::new(ResolveAvailabilityHandler::new(
                ports.areas.clone(),
                ports.reader.clone(),
            )),
            dashboard: Arc::new(GetDashboardHandler::new(
                ports.dashboard.clone(),
                clock,
                config.business.spend_per_pax,
                config.business.currency_symbol.clone(),
            )),
        };
        let customers = CustomerHandlers {
            list: Arc::new(ListCustomersHandler::new(ports.customers.clone())),
            get: Arc::new(GetCustomerHandler::new(ports.customers.clone())),
            update: Arc::new(UpdateCustomerHandler::new(ports.customers.clone())),
            delete: Arc::new(DeleteCustomerHandler::new(ports.customers.clone())),
        };

        Ok(Self {
            state: AppState {
                reservations,
                areas: Arc::new(ListAreasHandler::new(ports.areas)),
                customers,
                validator,
            },
            bus,
            outbox_publisher,
            notification_worker,
            reminder_scheduler,
            reminders,
        })
    }
}
