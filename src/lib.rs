//! # Freight Exchange
//!
//! Core of a freight brokering platform. Shippers post loads that need a
//! number of trucks of one type; transporters bid with a rate and a truck
//! count drawn from their truck pool; accepting a bid books trucks against
//! both the load and the transporter's pool.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ api::rest        axum handlers, DTOs         │
//! ├──────────────────────────────────────────────┤
//! │ application      lifecycles, ranking,        │
//! │                  unit of work                │
//! ├──────────────────────────────────────────────┤
//! │ domain           entities, value objects     │
//! ├──────────────────────────────────────────────┤
//! │ infrastructure   repository ports,           │
//! │                  in-memory store             │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! Every mutating operation runs inside an
//! [`application::unit_of_work::UnitOfWork`]. Its staged writes reach the
//! store in one atomic, version-checked commit or not at all, so truck
//! pools and remaining-truck counters never drift apart.
//!
//! # Example
//!
//! ```
//! use freight_exchange::application::services::{CreateLoad, FreightServices};
//! use freight_exchange::domain::value_objects::{LoadStatus, WeightUnit};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let services = FreightServices::in_memory();
//! let load = services
//!     .loads
//!     .create(CreateLoad {
//!         shipper_id: "shipper-1".to_string(),
//!         loading_city: "Pune".to_string(),
//!         unloading_city: "Delhi".to_string(),
//!         product_type: "Steel".to_string(),
//!         truck_type: "large".to_string(),
//!         no_of_trucks: 4,
//!         weight: 18.0,
//!         weight_unit: WeightUnit::Ton,
//!         comment: None,
//!         loading_date: None,
//!     })
//!     .await?;
//! assert_eq!(load.status(), LoadStatus::Posted);
//! assert_eq!(load.remaining_trucks(), 4);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod telemetry;
