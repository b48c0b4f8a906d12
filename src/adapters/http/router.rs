//! Top-level router: API modules, auth and the tower-http stack.

use std::sync::Arc;

use axum::{middleware, routing::get, Json, Router};
use http::HeaderValue;
use serde_json::{json, Value};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::application::handlers::ListAreasHandler;
use crate::config::ServerConfig;

use super::areas::area_routes;
use super::customers::{customer_routes, CustomerHandlers};
use super::middleware::{auth_middleware, AuthState};
use super::reservations::{reservation_routes, ReservationHandlers};

/// Everything the HTTP surface needs.
#[derive(Clone)]
pub struct AppState {
    pub reservations: ReservationHandlers,
    pub areas: Arc<ListAreasHandler>,
    pub customers: CustomerHandlers,
    pub validator: AuthState,
}

/// GET /health
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Builds the full application router.
pub fn api_router(state: AppState, server: &ServerConfig) -> Router {
    let api = Router::new()
        .nest("/api/reservations", reservation_routes(state.reservations))
        .nest("/api/areas", area_routes(state.areas))
        .nest("/api/customers", customer_routes(state.customers))
        .layer(middleware::from_fn_with_state(state.validator, auth_middleware));

    Router::new()
        .route("/health", get(health))
        .merge(api)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(server.request_timeout()))
        .layer(cors_layer(server))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    if origins.is_empty() {
        if server.is_production() {
            tracing::warn!("no CORS origins configured; allowing any origin");
        }
        return CorsLayer::permissive();
    }
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}
