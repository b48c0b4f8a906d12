//! Golden Bay reservations server.
//!
//! Loads configuration from `GOLDENBAY__*` variables (and `.env`), runs the
//! migrations, then serves the API alongside the outbox publisher, the
//! notification worker and the reminder scheduler.

use std::sync::Arc;

use futures::future::join_all;
use sqlx::postgres::PgPoolOptions;
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use goldenbay_reservations::adapters::auth::JwtSessionValidator;
use goldenbay_reservations::adapters::http::api_router;
use goldenbay_reservations::adapters::notify::{email_transport, sms_transport};
use goldenbay_reservations::adapters::postgres::run_migrations;
use goldenbay_reservations::bootstrap::{Application, Ports, Transports};
use goldenbay_reservations::config::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;
    init_tracing(&config);

    tracing::info!(
        environment = ?config.server.environment,
        addr = %config.server.socket_addr(),
        "starting golden bay reservations"
    );

    let pool = PgPoolOptions::new()
        .min_connections(config.database.min_connections)
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .connect(&config.database.url)
        .await?;
    if config.database.run_migrations {
        run_migrations(&pool).await?;
        tracing::info!("migrations applied");
    }

    let transports = Transports {
        email: email_transport(&config.email),
        sms: sms_transport(&config.sms),
    };
    let validator = Arc::new(JwtSessionValidator::new(&config.auth));
    let app = Application::build(Ports::postgres(pool.clone()), transports, validator, &config)?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut workers = Vec::new();
    {
        let publisher = app.outbox_publisher.clone();
        let rx = shutdown_rx.clone();
        workers.push(tokio::spawn(async move { publisher.run(rx).await }));
    }
    {
        let worker = app.notification_worker.clone();
        let rx = shutdown_rx.clone();
        workers.push(tokio::spawn(async move { worker.run(rx).await }));
    }
    {
        let scheduler = app.reminder_scheduler.clone();
        let rx = shutdown_rx.clone();
        workers.push(tokio::spawn(async move { scheduler.run(rx).await }));
    }

    let router = api_router(app.state, &config.server);
    let listener = tokio::net::TcpListener::bind(config.server.socket_addr()).await?;
    tracing::info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for ctrl-c");
            }
            tracing::info!("shutdown requested");
        })
        .await?;

    let _ = shutdown_tx.send(true);
    for joined in join_all(workers).await {
        if let Err(e) = joined {
            tracing::error!(error = %e, "worker task panicked");
        }
    }
    pool.close().await;
    tracing::info!("stopped");
    Ok(())
}

/// JSON logs in production, human-readable otherwise. `RUST_LOG` wins over
/// the configured level.
fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));
    let json = config
        .is_production()
        .then(|| tracing_subscriber::fmt::layer().json());
    let pretty = (!config.is_production()).then(tracing_subscriber::fmt::layer);

    tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(pretty)
        .init();
}
