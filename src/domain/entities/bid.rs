//! # Bid Entity
//!
//! A transporter's offer to carry part or all of a load.
//!
//! Bids reference their load and transporter by id only. A bid starts
//! `Pending` and ends `Accepted` or `Rejected`; neither terminal state is
//! ever left.

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{BidId, BidStatus, LoadId, Rate, Timestamp, TransporterId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A transporter's offer on a load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bid {
    id: BidId,
    load_id: LoadId,
    transporter_id: TransporterId,
    proposed_rate: Rate,
    trucks_offered: u32,
    status: BidStatus,
    version: u64,
    submitted_at: Timestamp,
    updated_at: Timestamp,
}

impl Bid {
    /// Creates a pending bid.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ValidationError` if no trucks are offered.
    pub fn new(
        load_id: LoadId,
        transporter_id: TransporterId,
        proposed_rate: Rate,
        trucks_offered: u32,
    ) -> DomainResult<Self> {
        if trucks_offered == 0 {
            return Err(DomainError::validation(
                "trucks offered must be at least 1",
            ));
        }
        let now = Timestamp::now();
        Ok(Self {
            id: BidId::new_v4(),
            load_id,
            transporter_id,
            proposed_rate,
            trucks_offered,
            status: BidStatus::Pending,
            version: 1,
            submitted_at: now,
            updated_at: now,
        })
    }

    /// Returns the bid ID.
    #[inline]
    #[must_use]
    pub fn id(&self) -> BidId {
        self.id
    }

    /// Returns the load this bid is on.
    #[inline]
    #[must_use]
    pub fn load_id(&self) -> LoadId {
        self.load_id
    }

    /// Returns the bidding transporter.
    #[inline]
    #[must_use]
    pub fn transporter_id(&self) -> TransporterId {
        self.transporter_id
    }

    /// Returns the proposed rate.
    #[inline]
    #[must_use]
    pub fn proposed_rate(&self) -> Rate {
        self.proposed_rate
    }

    /// Returns the number of trucks offered.
    #[inline]
    #[must_use]
    pub fn trucks_offered(&self) -> u32 {
        self.trucks_offered
    }

    /// Returns the current status.
    #[inline]
    #[must_use]
    pub fn status(&self) -> BidStatus {
        self.status
    }

    /// Returns the version for optimistic locking.
    #[inline]
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Returns when the bid was submitted.
    #[inline]
    #[must_use]
    pub fn submitted_at(&self) -> Timestamp {
        self.submitted_at
    }

    /// Returns when the bid was last modified.
    #[inline]
    #[must_use]
    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// Marks the bid accepted.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStateTransition` unless the bid is pending.
    pub fn accept(&mut self) -> DomainResult<()> {
        self.transition_to(BidStatus::Accepted)
    }

    /// Marks the bid rejected.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStateTransition` unless the bid is pending.
    pub fn reject(&mut self) -> DomainResult<()> {
        self.transition_to(BidStatus::Rejected)
    }

    fn transition_to(&mut self, target: BidStatus) -> DomainResult<()> {
        if !self.status.can_transition_to(target) {
            return Err(DomainError::invalid_transition("bid", self.status, target));
        }
        self.status = target;
        self.updated_at = Timestamp::now();
        self.version = self.version.saturating_add(1);
        Ok(())
    }
}

impl fmt::Display for Bid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Bid({} load={} trucks={} rate={} [{}])",
            self.id, self.load_id, self.trucks_offered, self.proposed_rate, self.status
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn create_test_bid() -> Bid {
        Bid::new(
            LoadId::new_v4(),
            TransporterId::new_v4(),
            Rate::new(Decimal::from(100)).unwrap(),
            5,
        )
        .unwrap()
    }

    #[test]
    fn new_bid_is_pending() {
        let bid = create_test_bid();
        assert_eq!(bid.status(), BidStatus::Pending);
        assert_eq!(bid.trucks_offered(), 5);
        assert_eq!(bid.version(), 1);
    }

    #[test]
    fn zero_trucks_rejected() {
        let result = Bid::new(
            LoadId::new_v4(),
            TransporterId::new_v4(),
            Rate::new(Decimal::ONE).unwrap(),
            0,
        );
        assert!(matches!(result, Err(DomainError::ValidationError(_))));
    }

    #[test]
    fn accept_then_reject_fails() {
        let mut bid = create_test_bid();
        bid.accept().unwrap();
        assert_eq!(bid.status(), BidStatus::Accepted);
        assert_eq!(bid.version(), 2);

        let err = bid.reject().unwrap_err();
        assert!(err.is_invalid_transition());
        assert_eq!(bid.status(), BidStatus::Accepted);
    }

    #[test]
    fn rejected_bid_cannot_be_accepted() {
        let mut bid = create_test_bid();
        bid.reject().unwrap();
        assert!(bid.accept().is_err());
        assert!(bid.reject().is_err());
    }
}
