//! HTTP handlers for reservation endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::{error_response, storage_error, ErrorResponse};
use crate::adapters::http::middleware::{OptionalAuth, RequireAuth};
use crate::application::handlers::{
    CreateReservationCommand, CreateReservationHandler, GetDashboardHandler,
    GetReservationHandler, GetReservationHistoryHandler, ListReservationsHandler,
    ResolveAvailabilityHandler, ResolveAvailabilityQuery, UpdateReservationCommand,
    UpdateReservationHandler,
};
use crate::domain::foundation::{CommandMetadata, ReservationId, Timestamp};
use crate::domain::reservation::ReservationDraft;
use crate::ports::ReservationFilter;

use super::dto::{CreatedReservationResponse, UpdateReservationRequest, UpdatedReservationResponse};

#[derive(Clone)]
pub struct ReservationHandlers {
    pub create: Arc<CreateReservationHandler>,
    pub update: Arc<UpdateReservationHandler>,
    pub get: Arc<GetReservationHandler>,
    pub history: Arc<GetReservationHistoryHandler>,
    pub list: Arc<ListReservationsHandler>,
    pub availability: Arc<ResolveAvailabilityHandler>,
    pub dashboard: Arc<GetDashboardHandler>,
}

/// Request id set by the request-id layer, reused as correlation id.
fn correlation_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn parse_id(raw: &str) -> Result<ReservationId, Response> {
    raw.parse::<ReservationId>().map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request("Invalid reservation ID")),
        )
            .into_response()
    })
}

/// GET /api/reservations/availability?date=&session=
pub async fn get_availability(
    State(handlers): State<ReservationHandlers>,
    Query(query): Query<ResolveAvailabilityQuery>,
) -> Response {
    match handlers.availability.handle(query).await {
        Ok(areas) => (StatusCode::OK, Json(areas)).into_response(),
        Err(e) => storage_error(e),
    }
}

/// POST /api/reservations - public booking, or a staff booking with a token
pub async fn create_reservation(
    State(handlers): State<ReservationHandlers>,
    OptionalAuth(user): OptionalAuth,
    headers: HeaderMap,
    Json(draft): Json<ReservationDraft>,
) -> Response {
    let mut metadata = match user {
        Some(user) => CommandMetadata::staff(user.id),
        None => CommandMetadata::public(),
    }
    .with_source("api");
    if let Some(id) = correlation_id(&headers) {
        metadata = metadata.with_correlation_id(id);
    }

    match handlers
        .create
        .handle(CreateReservationCommand { draft }, metadata)
        .await
    {
        Ok(result) => {
            let response = CreatedReservationResponse {
                message: format!("Reservation received for {}.", result.area.name),
                area_name: result.area.name,
                reservation: result.reservation,
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// GET /api/reservations - staff list with filters
pub async fn list_reservations(
    State(handlers): State<ReservationHandlers>,
    RequireAuth(_user): RequireAuth,
    Query(filter): Query<ReservationFilter>,
) -> Response {
    match handlers.list.handle(filter).await {
        Ok(list) => (StatusCode::OK, Json(list)).into_response(),
        Err(e) => storage_error(e),
    }
}

/// GET /api/reservations/:id
pub async fn get_reservation(
    State(handlers): State<ReservationHandlers>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<String>,
) -> Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    match handlers.get.handle(id).await {
        Ok(reservation) => (StatusCode::OK, Json(reservation)).into_response(),
        Err(e) => error_response(e),
    }
}

/// PATCH /api/reservations/:id
pub async fn update_reservation(
    State(handlers): State<ReservationHandlers>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(req): Json<UpdateReservationRequest>,
) -> Response {
    let reservation_id = match parse_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let mut metadata = CommandMetadata::staff(user.id.clone()).with_source("api");
    if let Some(id) = correlation_id(&headers) {
        metadata = metadata.with_correlation_id(id);
    }
    let cmd = UpdateReservationCommand {
        reservation_id,
        patch: req.patch,
        expected_version: req.expected_version,
    };

    match handlers.update.handle(cmd, &user, metadata).await {
        Ok(result) => {
            let response = UpdatedReservationResponse {
                reservation: result.reservation,
                changes: result.changes,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// GET /api/reservations/:id/history
pub async fn get_history(
    State(handlers): State<ReservationHandlers>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<String>,
) -> Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    match handlers.history.handle(id).await {
        Ok(entries) => (StatusCode::OK, Json(entries)).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /api/reservations/dashboard
pub async fn get_dashboard(
    State(handlers): State<ReservationHandlers>,
    RequireAuth(_user): RequireAuth,
) -> Response {
    match handlers.dashboard.handle(Timestamp::now()).await {
        Ok(stats) => (StatusCode::OK, Json(stats)).into_response(),
        Err(e) => storage_error(e),
    }
}
