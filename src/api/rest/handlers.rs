//! # REST Handlers
//!
//! One async function per endpoint. Handlers translate DTOs, call the
//! services in [`FreightServices`] and map errors through [`ApiError`].

use super::dto::{
    BidListQuery, BidResponse, BookingResponse, CreateBidRequest, CreateBookingRequest,
    CreateLoadRequest, HealthResponse, LoadListQuery, LoadResponse, RankedBidResponse,
    RegisterTransporterRequest, TransporterResponse, TruckAvailabilityDto, truck_pool_from_dtos,
};
use super::error::{ApiError, ApiResult, parse_id};
use crate::application::services::FreightServices;
use crate::config::PaginationConfig;
use crate::domain::value_objects::{BidId, BookingId, LoadId, ShipperId, TransporterId};
use crate::infrastructure::persistence::{BidFilter, LoadFilter, Page, PageRequest};
use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use std::sync::Arc;

/// Shared state for every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Wired services.
    pub services: FreightServices,
    /// Page size limits.
    pub pagination: PaginationConfig,
}

impl AppState {
    /// Creates the state.
    #[must_use]
    pub fn new(services: FreightServices, pagination: PaginationConfig) -> Self {
        Self {
            services,
            pagination,
        }
    }
}

type SharedState = State<Arc<AppState>>;

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::validation(rejection.body_text())
    }
}

fn page_request(query: &LoadListQuery, limits: PaginationConfig) -> ApiResult<PageRequest> {
    let size = query.size.unwrap_or(limits.default_page_size);
    if size == 0 || size > limits.max_page_size {
        return Err(ApiError::validation(format!(
            "page size must be between 1 and {}, got {size}",
            limits.max_page_size
        )));
    }
    Ok(PageRequest::new(query.page.unwrap_or(0), size))
}

// ============================================================================
// Service
// ============================================================================

/// `GET /`
pub async fn index() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "health": "/api/v1/health",
        "api": "/api/v1",
    }))
}

/// `GET /api/v1/health`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============================================================================
// Loads
// ============================================================================

/// `POST /api/v1/loads`
pub async fn create_load(
    State(state): SharedState,
    payload: Result<Json<CreateLoadRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<LoadResponse>)> {
    let Json(request) = payload?;
    let load = state.services.loads.create(request.into_command()?).await?;
    Ok((StatusCode::CREATED, Json(load.into())))
}

/// `GET /api/v1/loads`
pub async fn list_loads(
    State(state): SharedState,
    query: Result<Query<LoadListQuery>, QueryRejection>,
) -> ApiResult<Json<Page<LoadResponse>>> {
    let Query(query) = query?;
    let page = page_request(&query, state.pagination)?;
    let filter = LoadFilter {
        shipper_id: query.shipper_id.map(ShipperId::new),
        status: query.status,
    };
    let loads = state.services.loads.list(&filter, page).await?;
    Ok(Json(loads.map(LoadResponse::from)))
}

/// `GET /api/v1/loads/{id}`
pub async fn get_load(
    State(state): SharedState,
    Path(id): Path<String>,
) -> ApiResult<Json<LoadResponse>> {
    let id: LoadId = parse_id("load", &id)?;
    let load = state.services.loads.get(id).await?;
    Ok(Json(load.into()))
}

/// `PATCH /api/v1/loads/{id}/cancel`
pub async fn cancel_load(
    State(state): SharedState,
    Path(id): Path<String>,
) -> ApiResult<Json<LoadResponse>> {
    let id: LoadId = parse_id("load", &id)?;
    let load = state.services.loads.cancel(id).await?;
    Ok(Json(load.into()))
}

/// `GET /api/v1/loads/{id}/best-bids`
pub async fn best_bids(
    State(state): SharedState,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<RankedBidResponse>>> {
    let id: LoadId = parse_id("load", &id)?;
    let ranked = state.services.ranking.rank_bids(id).await?;
    Ok(Json(ranked.into_iter().map(Into::into).collect()))
}

// ============================================================================
// Transporters
// ============================================================================

/// `POST /api/v1/transporters`
pub async fn register_transporter(
    State(state): SharedState,
    payload: Result<Json<RegisterTransporterRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<TransporterResponse>)> {
    let Json(request) = payload?;
    let transporter = state
        .services
        .transporters
        .register(request.into_command()?)
        .await?;
    Ok((StatusCode::CREATED, Json(transporter.into())))
}

/// `GET /api/v1/transporters`
pub async fn list_transporters(
    State(state): SharedState,
) -> ApiResult<Json<Vec<TransporterResponse>>> {
    let transporters = state.services.transporters.list().await?;
    Ok(Json(transporters.into_iter().map(Into::into).collect()))
}

/// `GET /api/v1/transporters/{id}`
pub async fn get_transporter(
    State(state): SharedState,
    Path(id): Path<String>,
) -> ApiResult<Json<TransporterResponse>> {
    let id: TransporterId = parse_id("transporter", &id)?;
    let transporter = state.services.transporters.get(id).await?;
    Ok(Json(transporter.into()))
}

/// `PUT /api/v1/transporters/{id}/trucks`
///
/// Replaces the whole truck pool with the posted list.
pub async fn replace_trucks(
    State(state): SharedState,
    Path(id): Path<String>,
    payload: Result<Json<Vec<TruckAvailabilityDto>>, JsonRejection>,
) -> ApiResult<Json<TransporterResponse>> {
    let id: TransporterId = parse_id("transporter", &id)?;
    let Json(entries) = payload?;
    let pool = truck_pool_from_dtos(entries)?;
    let transporter = state.services.ledger.replace_all(id, pool).await?;
    Ok(Json(transporter.into()))
}

// ============================================================================
// Bids
// ============================================================================

/// `POST /api/v1/bids`
pub async fn create_bid(
    State(state): SharedState,
    payload: Result<Json<CreateBidRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<BidResponse>)> {
    let Json(request) = payload?;
    let bid = state.services.bids.submit_bid(request.into_command()?).await?;
    Ok((StatusCode::CREATED, Json(bid.into())))
}

/// `GET /api/v1/bids`
pub async fn list_bids(
    State(state): SharedState,
    query: Result<Query<BidListQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<BidResponse>>> {
    let Query(query) = query?;
    let filter = BidFilter {
        load_id: query.load_id,
        transporter_id: query.transporter_id,
        status: query.status,
    };
    let bids = state.services.bids.list(&filter).await?;
    Ok(Json(bids.into_iter().map(Into::into).collect()))
}

/// `GET /api/v1/bids/{id}`
pub async fn get_bid(
    State(state): SharedState,
    Path(id): Path<String>,
) -> ApiResult<Json<BidResponse>> {
    let id: BidId = parse_id("bid", &id)?;
    let bid = state.services.bids.get(id).await?;
    Ok(Json(bid.into()))
}

/// `PATCH /api/v1/bids/{id}/reject`
pub async fn reject_bid(
    State(state): SharedState,
    Path(id): Path<String>,
) -> ApiResult<Json<BidResponse>> {
    let id: BidId = parse_id("bid", &id)?;
    let bid = state.services.bids.reject_bid(id).await?;
    Ok(Json(bid.into()))
}

// ============================================================================
// Bookings
// ============================================================================

/// `POST /api/v1/bookings`
pub async fn create_booking(
    State(state): SharedState,
    payload: Result<Json<CreateBookingRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<BookingResponse>)> {
    let Json(request) = payload?;
    let booking = state.services.bookings.accept_bid(request.bid_id).await?;
    Ok((StatusCode::CREATED, Json(booking.into())))
}

/// `GET /api/v1/bookings/{id}`
pub async fn get_booking(
    State(state): SharedState,
    Path(id): Path<String>,
) -> ApiResult<Json<BookingResponse>> {
    let id: BookingId = parse_id("booking", &id)?;
    let booking = state.services.bookings.get(id).await?;
    Ok(Json(booking.into()))
}

/// `PATCH /api/v1/bookings/{id}/cancel`
pub async fn cancel_booking(
    State(state): SharedState,
    Path(id): Path<String>,
) -> ApiResult<Json<BookingResponse>> {
    let id: BookingId = parse_id("booking", &id)?;
    let booking = state.services.bookings.cancel_booking(id).await?;
    Ok(Json(booking.into()))
}

/// `GET /api/v1/bookings/load/{load_id}`
pub async fn bookings_for_load(
    State(state): SharedState,
    Path(load_id): Path<String>,
) -> ApiResult<Json<Vec<BookingResponse>>> {
    let load_id: LoadId = parse_id("load", &load_id)?;
    let bookings = state.services.bookings.for_load(load_id).await?;
    Ok(Json(bookings.into_iter().map(Into::into).collect()))
}

/// `GET /api/v1/bookings/transporter/{transporter_id}`
pub async fn bookings_for_transporter(
    State(state): SharedState,
    Path(transporter_id): Path<String>,
) -> ApiResult<Json<Vec<BookingResponse>>> {
    let transporter_id: TransporterId = parse_id("transporter", &transporter_id)?;
    let bookings = state
        .services
        .bookings
        .for_transporter(transporter_id)
        .await?;
    Ok(Json(bookings.into_iter().map(Into::into).collect()))
}
