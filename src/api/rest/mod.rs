//! # REST API
//!
//! JSON over HTTP using axum.
//!
//! # Endpoints
//!
//! All under `/api/v1` except the index.
//!
//! ## Loads
//! - `POST /loads` - Post a load
//! - `GET /loads` - List loads (`shipperId`, `status`, `page`, `size`)
//! - `GET /loads/{id}` - Get a load
//! - `PATCH /loads/{id}/cancel` - Cancel a load
//! - `GET /loads/{id}/best-bids` - Ranked bids on a load
//!
//! ## Transporters
//! - `POST /transporters` - Register a transporter
//! - `GET /transporters` - List transporters
//! - `GET /transporters/{id}` - Get a transporter
//! - `PUT /transporters/{id}/trucks` - Replace the truck pool
//!
//! ## Bids
//! - `POST /bids` - Submit a bid
//! - `GET /bids` - List bids (`loadId`, `transporterId`, `status`)
//! - `GET /bids/{id}` - Get a bid
//! - `PATCH /bids/{id}/reject` - Reject a bid
//!
//! ## Bookings
//! - `POST /bookings` - Accept a bid
//! - `GET /bookings/{id}` - Get a booking
//! - `PATCH /bookings/{id}/cancel` - Cancel a booking
//! - `GET /bookings/load/{loadId}` - Bookings on a load
//! - `GET /bookings/transporter/{transporterId}` - Bookings of a transporter
//!
//! ## Service
//! - `GET /` - Index
//! - `GET /health` - Health check
//!
//! # Usage
//!
//! ```no_run
//! use freight_exchange::api::rest::{AppState, create_router};
//! use freight_exchange::application::services::FreightServices;
//! use freight_exchange::config::PaginationConfig;
//! use std::sync::Arc;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let state = Arc::new(AppState::new(
//!     FreightServices::in_memory(),
//!     PaginationConfig::default(),
//! ));
//! let router = create_router(state);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, router).await?;
//! # Ok(())
//! # }
//! ```

pub mod dto;
pub mod error;
pub mod handlers;
pub mod routes;

pub use error::{ApiError, ApiResult, ErrorResponse};
pub use handlers::AppState;
pub use routes::create_router;
