//! # Booking Entity
//!
//! A confirmed allocation of trucks to a load, created when a bid is
//! accepted. Cancelled bookings are kept as an audit trail.

use crate::domain::entities::bid::Bid;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{
    BidId, BookingId, BookingStatus, LoadId, Rate, Timestamp, TransporterId,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Confirmed allocation of a transporter's trucks to a load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    id: BookingId,
    load_id: LoadId,
    bid_id: Option<BidId>,
    transporter_id: TransporterId,
    final_rate: Rate,
    allocated_trucks: u32,
    status: BookingStatus,
    version: u64,
    booked_at: Timestamp,
    updated_at: Timestamp,
}

impl Booking {
    /// Confirms a booking for an accepted bid.
    ///
    /// The final rate is the bid's proposed rate as-is and the allocation is
    /// the bid's full truck count.
    #[must_use]
    pub fn confirm(bid: &Bid) -> Self {
        let now = Timestamp::now();
        Self {
            id: BookingId::new_v4(),
            load_id: bid.load_id(),
            bid_id: Some(bid.id()),
            transporter_id: bid.transporter_id(),
            final_rate: bid.proposed_rate(),
            allocated_trucks: bid.trucks_offered(),
            status: BookingStatus::Confirmed,
            version: 1,
            booked_at: now,
            updated_at: now,
        }
    }

    /// Returns the booking ID.
    #[inline]
    #[must_use]
    pub fn id(&self) -> BookingId {
        self.id
    }

    /// Returns the booked load.
    #[inline]
    #[must_use]
    pub fn load_id(&self) -> LoadId {
        self.load_id
    }

    /// Returns the accepted bid, if the reference survives.
    #[inline]
    #[must_use]
    pub fn bid_id(&self) -> Option<BidId> {
        self.bid_id
    }

    /// Returns the transporter supplying the trucks.
    #[inline]
    #[must_use]
    pub fn transporter_id(&self) -> TransporterId {
        self.transporter_id
    }

    /// Returns the agreed rate.
    #[inline]
    #[must_use]
    pub fn final_rate(&self) -> Rate {
        self.final_rate
    }

    /// Returns the number of trucks allocated.
    #[inline]
    #[must_use]
    pub fn allocated_trucks(&self) -> u32 {
        self.allocated_trucks
    }

    /// Returns the current status.
    #[inline]
    #[must_use]
    pub fn status(&self) -> BookingStatus {
        self.status
    }

    /// Returns true while the booking holds trucks.
    #[inline]
    #[must_use]
    pub fn is_confirmed(&self) -> bool {
        self.status == BookingStatus::Confirmed
    }

    /// Returns the version for optimistic locking.
    #[inline]
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Returns when the booking was confirmed.
    #[inline]
    #[must_use]
    pub fn booked_at(&self) -> Timestamp {
        self.booked_at
    }

    /// Returns when the booking was last modified.
    #[inline]
    #[must_use]
    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// Cancels the booking.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStateTransition` if already cancelled.
    pub fn cancel(&mut self) -> DomainResult<()> {
        if !self.status.can_transition_to(BookingStatus::Cancelled) {
            return Err(DomainError::invalid_transition(
                "booking",
                self.status,
                BookingStatus::Cancelled,
            ));
        }
        self.status = BookingStatus::Cancelled;
        self.updated_at = Timestamp::now();
        self.version = self.version.saturating_add(1);
        Ok(())
    }
}

impl fmt::Display for Booking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Booking({} load={} trucks={} [{}])",
            self.id, self.load_id, self.allocated_trucks, self.status
        )
    }
}
