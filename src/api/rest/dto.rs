//! # REST DTOs
//!
//! Request and response bodies. JSON field names are camelCase and status
//! enums are SCREAMING_SNAKE_CASE.

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::services::{
    CreateLoad, RankedBid, RegisterTransporter, SubmitBid, truck_pool_from_pairs,
};
use crate::domain::entities::{Bid, Booking, Load, Transporter, TruckPool};
use crate::domain::value_objects::{
    BidId, BidStatus, BookingId, BookingStatus, LoadId, LoadStatus, Rate, TransporterId,
    WeightUnit,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

fn truck_count(field: &str, value: i64, min: i64) -> ApplicationResult<u32> {
    if value < min {
        return Err(ApplicationError::validation(format!(
            "{field} must be at least {min}, got {value}"
        )));
    }
    u32::try_from(value)
        .map_err(|_| ApplicationError::validation(format!("{field} is too large: {value}")))
}

// ============================================================================
// Loads
// ============================================================================

/// Body of `POST /loads`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLoadRequest {
    /// Shipper posting the load.
    pub shipper_id: String,
    /// Origin city.
    pub loading_city: String,
    /// Destination city.
    pub unloading_city: String,
    /// Product being shipped.
    pub product_type: String,
    /// Required truck type.
    pub truck_type: String,
    /// Trucks requested.
    pub no_of_trucks: i64,
    /// Shipment weight.
    pub weight: f64,
    /// Weight unit, `KG` or `TON`.
    pub weight_unit: WeightUnit,
    /// Optional free text.
    #[serde(default)]
    pub comment: Option<String>,
    /// Planned loading date, RFC 3339.
    #[serde(default)]
    pub loading_date: Option<DateTime<Utc>>,
}

impl CreateLoadRequest {
    /// Converts into the service command.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if `noOfTrucks` is below 1.
    pub fn into_command(self) -> ApplicationResult<CreateLoad> {
        Ok(CreateLoad {
            no_of_trucks: truck_count("noOfTrucks", self.no_of_trucks, 1)?,
            shipper_id: self.shipper_id,
            loading_city: self.loading_city,
            unloading_city: self.unloading_city,
            product_type: self.product_type,
            truck_type: self.truck_type,
            weight: self.weight,
            weight_unit: self.weight_unit,
            comment: self.comment,
            loading_date: self.loading_date.map(Into::into),
        })
    }
}

/// Query string of `GET /loads`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadListQuery {
    /// Only this shipper's loads.
    pub shipper_id: Option<String>,
    /// Only loads in this status.
    pub status: Option<LoadStatus>,
    /// Zero-based page index.
    pub page: Option<u32>,
    /// Page size.
    pub size: Option<u32>,
}

/// A load as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadResponse {
    /// Load ID.
    pub load_id: LoadId,
    /// Shipper ID.
    pub shipper_id: String,
    /// Origin city.
    pub loading_city: String,
    /// Destination city.
    pub unloading_city: String,
    /// Product type.
    pub product_type: String,
    /// Truck type, upper case.
    pub truck_type: String,
    /// Trucks requested.
    pub no_of_trucks: u32,
    /// Trucks still needed.
    pub remaining_trucks: u32,
    /// Weight value.
    pub weight: f64,
    /// Weight unit.
    pub weight_unit: WeightUnit,
    /// Free text.
    pub comment: Option<String>,
    /// Planned loading date.
    pub loading_date: DateTime<Utc>,
    /// When the load was posted.
    pub date_posted: DateTime<Utc>,
    /// Current status.
    pub status: LoadStatus,
    /// Optimistic locking version.
    pub version: u64,
}

impl From<Load> for LoadResponse {
    fn from(load: Load) -> Self {
        Self {
            load_id: load.id(),
            shipper_id: load.shipper_id().to_string(),
            loading_city: load.loading_city().to_string(),
            unloading_city: load.unloading_city().to_string(),
            product_type: load.product_type().to_string(),
            truck_type: load.truck_type().to_string(),
            no_of_trucks: load.no_of_trucks(),
            remaining_trucks: load.remaining_trucks(),
            weight: load.weight().value(),
            weight_unit: load.weight().unit(),
            comment: load.comment().map(str::to_string),
            loading_date: load.loading_date().into(),
            date_posted: load.posted_at().into(),
            status: load.status(),
            version: load.version(),
        }
    }
}

// ============================================================================
// Transporters
// ============================================================================

/// One truck pool entry on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TruckAvailabilityDto {
    /// Truck type.
    pub truck_type: String,
    /// Unreserved trucks.
    pub count: i64,
}

/// Validates a wire pool into a domain pool.
///
/// # Errors
///
/// Returns `Validation` for negative counts, blank or duplicate types.
pub fn truck_pool_from_dtos(entries: Vec<TruckAvailabilityDto>) -> ApplicationResult<TruckPool> {
    truck_pool_from_pairs(pairs_from_dtos(entries)?)
}

fn pairs_from_dtos(entries: Vec<TruckAvailabilityDto>) -> ApplicationResult<Vec<(String, u32)>> {
    entries
        .into_iter()
        .map(|e| Ok((e.truck_type, truck_count("count", e.count, 0)?)))
        .collect()
}

/// Body of `POST /transporters`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterTransporterRequest {
    /// Company name.
    pub company_name: String,
    /// Rating from 0.0 to 5.0.
    pub rating: f64,
    /// Initial truck pool.
    #[serde(default)]
    pub available_trucks: Vec<TruckAvailabilityDto>,
}

impl RegisterTransporterRequest {
    /// Converts into the service command.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for a negative truck count.
    pub fn into_command(self) -> ApplicationResult<RegisterTransporter> {
        Ok(RegisterTransporter {
            company_name: self.company_name,
            rating: self.rating,
            trucks: pairs_from_dtos(self.available_trucks)?,
        })
    }
}

/// A transporter as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransporterResponse {
    /// Transporter ID.
    pub transporter_id: TransporterId,
    /// Company name.
    pub company_name: String,
    /// Rating.
    pub rating: f64,
    /// Truck pool.
    pub available_trucks: Vec<TruckAvailabilityDto>,
    /// Optimistic locking version.
    pub version: u64,
}

impl From<Transporter> for TransporterResponse {
    fn from(transporter: Transporter) -> Self {
        Self {
            transporter_id: transporter.id(),
            company_name: transporter.company_name().to_string(),
            rating: transporter.rating().get(),
            available_trucks: transporter
                .truck_pool()
                .entries()
                .iter()
                .map(|e| TruckAvailabilityDto {
                    truck_type: e.truck_type().to_string(),
                    count: i64::from(e.count()),
                })
                .collect(),
            version: transporter.version(),
        }
    }
}

// ============================================================================
// Bids
// ============================================================================

/// Body of `POST /bids`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBidRequest {
    /// Load being bid on.
    pub load_id: LoadId,
    /// Bidding transporter.
    pub transporter_id: TransporterId,
    /// Offered rate, positive.
    pub proposed_rate: f64,
    /// Trucks offered, at least 1.
    pub trucks_offered: i64,
}

impl CreateBidRequest {
    /// Converts into the service command.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for a non-positive rate or truck count.
    pub fn into_command(self) -> ApplicationResult<SubmitBid> {
        Ok(SubmitBid {
            load_id: self.load_id,
            transporter_id: self.transporter_id,
            proposed_rate: Rate::from_f64(self.proposed_rate)?,
            trucks_offered: truck_count("trucksOffered", self.trucks_offered, 1)?,
        })
    }
}

/// Query string of `GET /bids`.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BidListQuery {
    /// Only bids on this load.
    pub load_id: Option<LoadId>,
    /// Only bids from this transporter.
    pub transporter_id: Option<TransporterId>,
    /// Only bids in this status.
    pub status: Option<BidStatus>,
}

/// A bid as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BidResponse {
    /// Bid ID.
    pub bid_id: BidId,
    /// Load ID.
    pub load_id: LoadId,
    /// Transporter ID.
    pub transporter_id: TransporterId,
    /// Offered rate.
    pub proposed_rate: f64,
    /// Trucks offered.
    pub trucks_offered: u32,
    /// Current status.
    pub status: BidStatus,
    /// Submission time.
    pub submitted_at: DateTime<Utc>,
}

impl From<Bid> for BidResponse {
    fn from(bid: Bid) -> Self {
        Self {
            bid_id: bid.id(),
            load_id: bid.load_id(),
            transporter_id: bid.transporter_id(),
            proposed_rate: bid.proposed_rate().to_f64(),
            trucks_offered: bid.trucks_offered(),
            status: bid.status(),
            submitted_at: bid.submitted_at().into(),
        }
    }
}

/// One entry of `GET /loads/{id}/best-bids`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedBidResponse {
    /// Rank, 1 is best.
    pub rank: usize,
    /// Weighted score.
    pub score: f64,
    /// Bid ID.
    pub bid_id: BidId,
    /// Transporter ID.
    pub transporter_id: TransporterId,
    /// Transporter company name.
    pub company_name: String,
    /// Transporter rating.
    pub rating: f64,
    /// Offered rate.
    pub proposed_rate: f64,
    /// Trucks offered.
    pub trucks_offered: u32,
    /// Bid status.
    pub status: BidStatus,
    /// Submission time.
    pub submitted_at: DateTime<Utc>,
}

impl From<RankedBid> for RankedBidResponse {
    fn from(ranked: RankedBid) -> Self {
        Self {
            rank: ranked.rank,
            score: ranked.score,
            bid_id: ranked.bid.id(),
            transporter_id: ranked.bid.transporter_id(),
            company_name: ranked.company_name,
            rating: ranked.rating.get(),
            proposed_rate: ranked.bid.proposed_rate().to_f64(),
            trucks_offered: ranked.bid.trucks_offered(),
            status: ranked.bid.status(),
            submitted_at: ranked.bid.submitted_at().into(),
        }
    }
}

// ============================================================================
// Bookings
// ============================================================================

/// Body of `POST /bookings`.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    /// Bid to accept.
    pub bid_id: BidId,
}

/// A booking as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    /// Booking ID.
    pub booking_id: BookingId,
    /// Load ID.
    pub load_id: LoadId,
    /// Accepted bid.
    pub bid_id: Option<BidId>,
    /// Transporter ID.
    pub transporter_id: TransporterId,
    /// Trucks allocated.
    pub allocated_trucks: u32,
    /// Agreed rate.
    pub final_rate: f64,
    /// Current status.
    pub status: BookingStatus,
    /// Confirmation time.
    pub booked_at: DateTime<Utc>,
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        Self {
            booking_id: booking.id(),
            load_id: booking.load_id(),
            bid_id: booking.bid_id(),
            transporter_id: booking.transporter_id(),
            allocated_trucks: booking.allocated_trucks(),
            final_rate: booking.final_rate().to_f64(),
            status: booking.status(),
            booked_at: booking.booked_at().into(),
        }
    }
}

// ============================================================================
// Service
// ============================================================================

/// Health check response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service name.
    pub service: String,
    /// Service version.
    pub version: String,
}
