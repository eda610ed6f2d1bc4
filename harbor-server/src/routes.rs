//! HTTP handlers for Harbor server.

use actix_web::error::BlockingError;
use actix_web::{HttpResponse, Responder, delete, get, post, put, web};
use harbor_core::{
    CreatedShip, HarborError, HealthResponse, NewShip, Ship, ShipService, ShipStatus,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, OpenApi, ToSchema};

use crate::openapi::ApiDoc;

#[derive(Clone)]
/// Shared application state for handlers.
pub struct AppState {
    /// Ship operations over the configured record store.
    pub ships: ShipService,
}

/// Error response payload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message.
    pub message: String,
}

/// Query parameters for listing ships.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ShipListQuery {
    /// Only return ships with this status (`SEA` or `PORT`).
    pub status: Option<String>,
}

/// Query parameters for a status transition.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ShipStatusQuery {
    /// Port to dock at; required when moving a ship into `PORT`.
    pub port_id: Option<i64>,
}

/// Map a service error to its HTTP response.
pub(crate) fn error_response(err: &HarborError) -> HttpResponse {
    let body = ErrorResponse {
        message: err.to_string(),
    };
    match err {
        HarborError::InvalidArgument(_) => HttpResponse::BadRequest().json(body),
        HarborError::NotFound(_) => HttpResponse::NotFound().json(body),
        HarborError::CapacityExceeded { .. } => HttpResponse::UnprocessableEntity().json(body),
        HarborError::Internal(_) => {
            log::error!("{err}");
            HttpResponse::InternalServerError().json(body)
        }
    }
}

fn respond<T>(
    result: Result<harbor_core::Result<T>, BlockingError>,
    ok: impl FnOnce(T) -> HttpResponse,
) -> HttpResponse {
    match result {
        Ok(Ok(value)) => ok(value),
        Ok(Err(err)) => error_response(&err),
        Err(err) => blocking_failure(&err),
    }
}

fn blocking_failure(err: &dyn std::fmt::Display) -> HttpResponse {
    error_response(&HarborError::Internal(format!("store task failed: {err}")))
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    ),
    tag = "system"
)]
#[get("/health")]
/// Report liveness.
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse { started: true })
}

#[utoipa::path(
    get,
    path = "/api/ships",
    params(ShipListQuery),
    responses(
        (status = 200, description = "Ships", body = [Ship]),
        (status = 400, description = "Unknown status", body = ErrorResponse)
    ),
    tag = "ships"
)]
#[get("/api/ships")]
/// List ships, optionally filtered by status.
pub async fn list_ships(
    state: web::Data<AppState>,
    query: web::Query<ShipListQuery>,
) -> impl Responder {
    let service = state.ships.clone();
    let status = query.into_inner().status;
    let result = web::block(move || service.read_all_ships(status.as_deref())).await;
    respond(result, |ships| HttpResponse::Ok().json(ships))
}

#[utoipa::path(
    post,
    path = "/api/ships",
    request_body = NewShip,
    responses(
        (status = 200, description = "Ship created", body = CreatedShip),
        (status = 400, description = "Missing name or port", body = ErrorResponse),
        (status = 404, description = "Port not found", body = ErrorResponse),
        (status = 422, description = "Port at capacity", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse)
    ),
    tag = "ships"
)]
#[post("/api/ships")]
/// Create a ship docked at the requested port.
pub async fn create_ship(
    state: web::Data<AppState>,
    payload: Option<web::Json<NewShip>>,
) -> impl Responder {
    let service = state.ships.clone();
    let candidate = payload.map(web::Json::into_inner);
    let result = web::block(move || service.create_ship(candidate)).await;
    respond(result, |created: CreatedShip| {
        HttpResponse::Ok().json(created)
    })
}

#[utoipa::path(
    delete,
    path = "/api/ships/{id}",
    params(
        ("id" = i64, Path, description = "Ship identifier")
    ),
    responses(
        (status = 200, description = "Ship deleted"),
        (status = 404, description = "Ship not found", body = ErrorResponse)
    ),
    tag = "ships"
)]
#[delete("/api/ships/{id}")]
/// Delete a ship.
pub async fn delete_ship(state: web::Data<AppState>, path: web::Path<i64>) -> impl Responder {
    let service = state.ships.clone();
    let id = path.into_inner();
    let result = web::block(move || service.delete_ship(id)).await;
    respond(result, |()| HttpResponse::Ok().finish())
}

#[utoipa::path(
    get,
    path = "/api/ships/{id}/status",
    params(
        ("id" = i64, Path, description = "Ship identifier")
    ),
    responses(
        (status = 200, description = "Current status", body = ShipStatus),
        (status = 404, description = "Ship not found", body = ErrorResponse)
    ),
    tag = "ships"
)]
#[get("/api/ships/{id}/status")]
/// Read a ship's status.
pub async fn ship_status(state: web::Data<AppState>, path: web::Path<i64>) -> impl Responder {
    let service = state.ships.clone();
    let id = path.into_inner();
    let result = web::block(move || service.read_ship_status(id)).await;
    respond(result, |status| HttpResponse::Ok().json(status))
}

#[utoipa::path(
    put,
    path = "/api/ships/{id}/status",
    params(
        ("id" = i64, Path, description = "Ship identifier"),
        ShipStatusQuery
    ),
    request_body = ShipStatus,
    responses(
        (status = 200, description = "Status after the transition", body = ShipStatus),
        (status = 400, description = "Unknown status or missing port", body = ErrorResponse),
        (status = 404, description = "Ship or port not found", body = ErrorResponse),
        (status = 422, description = "Port at capacity", body = ErrorResponse)
    ),
    tag = "ships"
)]
#[put("/api/ships/{id}/status")]
/// Send a ship to sea or dock it at a port.
pub async fn update_ship_status(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    query: web::Query<ShipStatusQuery>,
    payload: Option<web::Json<ShipStatus>>,
) -> impl Responder {
    let service = state.ships.clone();
    let id = path.into_inner();
    let port_id = query.into_inner().port_id;
    let desired = payload.map(web::Json::into_inner).unwrap_or_default();
    let result = web::block(move || service.update_ship_status(id, port_id, desired)).await;
    respond(result, |status| HttpResponse::Ok().json(status))
}

#[utoipa::path(
    get,
    path = "/api/openapi.json",
    responses(
        (status = 200, description = "OpenAPI document", body = serde_json::Value)
    ),
    tag = "system"
)]
#[get("/api/openapi.json")]
/// Serve the OpenAPI document.
pub async fn openapi_json() -> impl Responder {
    HttpResponse::Ok().json(ApiDoc::openapi())
}

/// Register every Harbor route.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health)
        .service(list_ships)
        .service(create_ship)
        .service(delete_ship)
        .service(ship_status)
        .service(update_ship_status)
        .service(openapi_json);
}
