//! # Domain Entities
//!
//! Aggregate roots and dependent records of the freight exchange.
//!
//! ## Aggregates
//!
//! - [`Load`]: shipment request with its remaining-truck counter
//! - [`Transporter`]: carrier with a [`TruckPool`]
//!
//! ## Dependent Records
//!
//! - [`Bid`]: offer on a load
//! - [`Booking`]: confirmed allocation from an accepted bid
//!
//! Records reference each other by id only.

pub mod bid;
pub mod booking;
pub mod load;
pub mod transporter;

pub use bid::Bid;
pub use booking::Booking;
pub use load::{Load, LoadBuilder};
pub use transporter::{Transporter, TruckAvailability, TruckPool};
