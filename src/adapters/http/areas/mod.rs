//! HTTP adapter for the public area listings.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use crate::adapters::http::error::storage_error;
use crate::application::handlers::ListAreasHandler;

/// GET /api/areas
pub async fn list_areas(State(handler): State<Arc<ListAreasHandler>>) -> Response {
    match handler.list_active().await {
        Ok(areas) => (StatusCode::OK, Json(areas)).into_response(),
        Err(e) => storage_error(e),
    }
}

/// GET /api/areas/vip
pub async fn list_vip_areas(State(handler): State<Arc<ListAreasHandler>>) -> Response {
    match handler.list_vip().await {
        Ok(areas) => (StatusCode::OK, Json(areas)).into_response(),
        Err(e) => storage_error(e),
    }
}

/// Mounted under `/api/areas`.
pub fn area_routes(handler: Arc<ListAreasHandler>) -> Router {
    Router::new()
        .route("/", get(list_areas))
        .route("/vip", get(list_vip_areas))
        .with_state(handler)
}
