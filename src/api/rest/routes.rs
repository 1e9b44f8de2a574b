//! # REST Routes
//!
//! Router wiring for the REST API.

use super::handlers::{
    AppState, best_bids, bookings_for_load, bookings_for_transporter, cancel_booking, cancel_load,
    create_bid, create_booking, create_load, get_bid, get_booking, get_load, get_transporter,
    health, index, list_bids, list_loads, list_transporters, register_transporter, reject_bid,
    replace_trucks,
};
use axum::Router;
use axum::routing::{get, patch, post, put};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Builds the full router with tracing and CORS layers.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .nest("/api/v1", api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health))
        .route("/loads", post(create_load).get(list_loads))
        .route("/loads/{id}", get(get_load))
        .route("/loads/{id}/cancel", patch(cancel_load))
        .route("/loads/{id}/best-bids", get(best_bids))
        .route(
            "/transporters",
            post(register_transporter).get(list_transporters),
        )
        .route("/transporters/{id}", get(get_transporter))
        .route("/transporters/{id}/trucks", put(replace_trucks))
        .route("/bids", post(create_bid).get(list_bids))
        .route("/bids/{id}", get(get_bid))
        .route("/bids/{id}/reject", patch(reject_bid))
        .route("/bookings", post(create_booking))
        .route("/bookings/{id}", get(get_booking))
        .route("/bookings/{id}/cancel", patch(cancel_booking))
        .route("/bookings/load/{load_id}", get(bookings_for_load))
        .route(
            "/bookings/transporter/{transporter_id}",
            get(bookings_for_transporter),
        )
}
