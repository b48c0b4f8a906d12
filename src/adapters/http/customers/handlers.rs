//! HTTP handlers for the customer directory. Staff only.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::{error_response, storage_error, ErrorResponse};
use crate::adapters::http::middleware::RequireAuth;
use crate::application::handlers::{
    DeleteCustomerHandler, GetCustomerHandler, ListCustomersHandler, UpdateCustomerCommand,
    UpdateCustomerHandler,
};
use crate::domain::customer::{CustomerFilter, CustomerPatch};
use crate::domain::foundation::CustomerId;

#[derive(Clone)]
pub struct CustomerHandlers {
    pub list: Arc<ListCustomersHandler>,
    pub get: Arc<GetCustomerHandler>,
    pub update: Arc<UpdateCustomerHandler>,
    pub delete: Arc<DeleteCustomerHandler>,
}

fn parse_id(raw: &str) -> Result<CustomerId, Response> {
    raw.parse::<CustomerId>().map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request("Invalid customer ID")),
        )
            .into_response()
    })
}

/// GET /api/customers?search=&vip_only=
pub async fn list_customers(
    State(handlers): State<CustomerHandlers>,
    RequireAuth(_user): RequireAuth,
    Query(filter): Query<CustomerFilter>,
) -> Response {
    match handlers.list.handle(filter).await {
        Ok(customers) => (StatusCode::OK, Json(customers)).into_response(),
        Err(e) => storage_error(e),
    }
}

/// GET /api/customers/:id
pub async fn get_customer(
    State(handlers): State<CustomerHandlers>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<String>,
) -> Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    match handlers.get.handle(id).await {
        Ok(customer) => (StatusCode::OK, Json(customer)).into_response(),
        Err(e) => error_response(e),
    }
}

/// PATCH /api/customers/:id
pub async fn update_customer(
    State(handlers): State<CustomerHandlers>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
    Json(patch): Json<CustomerPatch>,
) -> Response {
    let customer_id = match parse_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let cmd = UpdateCustomerCommand { customer_id, patch };
    match handlers.update.handle(cmd, &user).await {
        Ok(customer) => (StatusCode::OK, Json(customer)).into_response(),
        Err(e) => error_response(e),
    }
}

/// DELETE /api/customers/:id - Admin only
pub async fn delete_customer(
    State(handlers): State<CustomerHandlers>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
) -> Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    match handlers.delete.handle(id, &user).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}
