//! # Application Services
//!
//! The lifecycles that own every mutation of loads, truck pools, bids and
//! bookings, plus bid ranking.
//!
//! - [`LoadLifecycle`]: load status and remaining-truck counter
//! - [`CapacityLedger`]: transporter truck pools
//! - [`BidLifecycle`]: bid submission and rejection
//! - [`BookingLifecycle`]: bid acceptance and booking cancellation
//! - [`BidRanking`]: scoring bids on a load
//! - [`TransporterDirectory`]: transporter registration and lookup

pub mod bid_lifecycle;
pub mod bid_ranking;
pub mod booking_lifecycle;
pub mod capacity_ledger;
pub mod load_lifecycle;
pub mod transporter_directory;

pub use bid_lifecycle::{BidLifecycle, SubmitBid};
pub use bid_ranking::{BidCandidate, BidRanking, RankedBid, RankingStrategy, WeightedScoreStrategy};
pub use booking_lifecycle::BookingLifecycle;
pub use capacity_ledger::CapacityLedger;
pub use load_lifecycle::{CreateLoad, LoadLifecycle};
pub use transporter_directory::{RegisterTransporter, TransporterDirectory, truck_pool_from_pairs};

use crate::infrastructure::persistence::{FreightStore, InMemoryFreightStore};
use std::sync::Arc;

/// Every service wired to one store.
#[derive(Debug, Clone)]
pub struct FreightServices {
    /// Load lifecycle.
    pub loads: LoadLifecycle,
    /// Transporter registration and lookup.
    pub transporters: TransporterDirectory,
    /// Truck pool ledger.
    pub ledger: CapacityLedger,
    /// Bid lifecycle.
    pub bids: BidLifecycle,
    /// Booking lifecycle.
    pub bookings: BookingLifecycle,
    /// Bid ranking.
    pub ranking: BidRanking,
}

impl FreightServices {
    /// Wires the services to a store and a ranking strategy.
    #[must_use]
    pub fn new(store: Arc<dyn FreightStore>, strategy: Arc<dyn RankingStrategy>) -> Self {
        let loads = LoadLifecycle::new(Arc::clone(&store));
        let ledger = CapacityLedger::new(Arc::clone(&store));
        Self {
            transporters: TransporterDirectory::new(Arc::clone(&store)),
            bids: BidLifecycle::new(Arc::clone(&store), loads.clone(), ledger.clone()),
            bookings: BookingLifecycle::new(Arc::clone(&store), loads.clone(), ledger.clone()),
            ranking: BidRanking::new(store, strategy),
            loads,
            ledger,
        }
    }

    /// Services over a fresh in-memory store with default ranking weights.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryFreightStore::new()),
            Arc::new(WeightedScoreStrategy::default()),
        )
    }
}
