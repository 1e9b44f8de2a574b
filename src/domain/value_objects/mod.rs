//! # Value Objects
//!
//! Immutable types with validation and domain semantics.
//!
//! ## Identity Types
//!
//! - [`LoadId`], [`TransporterId`], [`BidId`], [`BookingId`]: UUID-based identifiers
//! - [`ShipperId`]: opaque caller-supplied identifier
//!
//! ## Measures
//!
//! - [`Rate`]: positive decimal rate
//! - [`Rating`]: transporter rating on a 0–5 scale
//! - [`Weight`] / [`WeightUnit`]: shipment weight
//! - [`TruckType`]: case-insensitive truck category
//!
//! ## Lifecycle Enums
//!
//! - [`LoadStatus`], [`BidStatus`], [`BookingStatus`]

pub mod ids;
pub mod rate;
pub mod rating;
pub mod status;
pub mod timestamp;
pub mod truck_type;
pub mod weight;

pub use ids::{BidId, BookingId, LoadId, ShipperId, TransporterId};
pub use rate::Rate;
pub use rating::Rating;
pub use status::{BidStatus, BookingStatus, LoadStatus};
pub use timestamp::Timestamp;
pub use truck_type::TruckType;
pub use weight::{Weight, WeightUnit};
