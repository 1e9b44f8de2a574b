//! # Bid Lifecycle
//!
//! Submitting and rejecting bids.
//!
//! Submission checks the transporter's pool and the load's remaining trucks
//! but reserves nothing: capacity is only taken when a bid is accepted, so
//! the pool read here is advisory.

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::services::capacity_ledger::CapacityLedger;
use crate::application::services::load_lifecycle::LoadLifecycle;
use crate::application::unit_of_work::UnitOfWork;
use crate::domain::entities::Bid;
use crate::domain::value_objects::{BidId, BidStatus, LoadId, Rate, TransporterId};
use crate::infrastructure::persistence::{BidFilter, FreightStore};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Input for submitting a bid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubmitBid {
    /// Load being bid on.
    pub load_id: LoadId,
    /// Bidding transporter.
    pub transporter_id: TransporterId,
    /// Offered rate.
    pub proposed_rate: Rate,
    /// Trucks offered, at least 1.
    pub trucks_offered: u32,
}

/// Validates and records bids.
#[derive(Debug, Clone)]
pub struct BidLifecycle {
    store: Arc<dyn FreightStore>,
    loads: LoadLifecycle,
    ledger: CapacityLedger,
}

impl BidLifecycle {
    /// Creates the lifecycle.
    #[must_use]
    pub fn new(store: Arc<dyn FreightStore>, loads: LoadLifecycle, ledger: CapacityLedger) -> Self {
        Self {
            store,
            loads,
            ledger,
        }
    }

    /// Submits a bid on a load.
    ///
    /// The first bid on a posted load opens it for bidding.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the load or transporter does not exist
    /// - `InvalidTransition` if the load is not posted or open for bids
    /// - `InsufficientCapacity` if the transporter lacks the trucks or the
    ///   offer exceeds the load's remaining trucks
    /// - `Validation` if no trucks are offered
    /// - `Conflict` if the load changed before the bid was committed
    #[instrument(skip(self, request), fields(load_id = %request.load_id, transporter_id = %request.transporter_id))]
    pub async fn submit_bid(&self, request: SubmitBid) -> ApplicationResult<Bid> {
        let mut uow = UnitOfWork::begin(Arc::clone(&self.store));

        // A cancel or booking that lands before commit must fail this bid.
        let load = uow.guarded_load(request.load_id).await?;
        let status = load.status();
        let truck_type = load.truck_type().clone();
        let remaining = load.remaining_trucks();
        if !status.accepts_bids() {
            warn!(%status, "bid on closed load refused");
            return Err(ApplicationError::invalid_transition(format!(
                "Load is not accepting bids (status: {status})"
            )));
        }

        let available = self
            .ledger
            .available(&mut uow, request.transporter_id, &truck_type)
            .await?;
        if available < request.trucks_offered {
            warn!(available, offered = request.trucks_offered, "bid exceeds transporter pool");
            return Err(ApplicationError::insufficient_capacity(format!(
                "Transporter has only {available} {truck_type} trucks available, {} offered",
                request.trucks_offered
            )));
        }
        if request.trucks_offered > remaining {
            warn!(remaining, offered = request.trucks_offered, "bid exceeds remaining trucks");
            return Err(ApplicationError::insufficient_capacity(format!(
                "Load needs only {remaining} more trucks, {} offered",
                request.trucks_offered
            )));
        }

        let bid = Bid::new(
            request.load_id,
            request.transporter_id,
            request.proposed_rate,
            request.trucks_offered,
        )?;
        uow.add_bid(bid.clone());
        self.loads
            .mark_open_for_bidding(&mut uow, request.load_id)
            .await?;
        uow.commit().await?;

        info!(bid_id = %bid.id(), trucks = bid.trucks_offered(), rate = %bid.proposed_rate(), "bid submitted");
        Ok(bid)
    }

    /// Rejects a pending bid.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the bid does not exist
    /// - `InvalidTransition` if the bid is not pending
    #[instrument(skip(self))]
    pub async fn reject_bid(&self, id: BidId) -> ApplicationResult<Bid> {
        let mut uow = UnitOfWork::begin(Arc::clone(&self.store));
        let bid = uow.bid(id).await?;
        if bid.status() != BidStatus::Pending {
            warn!(status = %bid.status(), "reject of non-pending bid refused");
            return Err(ApplicationError::invalid_transition(format!(
                "Only pending bids can be rejected (status: {})",
                bid.status()
            )));
        }
        bid.reject()?;
        let rejected = bid.clone();
        uow.commit().await?;

        info!(bid_id = %id, "bid rejected");
        Ok(rejected)
    }

    /// Gets a bid by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the bid does not exist.
    pub async fn get(&self, id: BidId) -> ApplicationResult<Bid> {
        debug!(bid_id = %id, "fetching bid");
        self.store
            .get_bid(&id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Bid", id))
    }

    /// Lists bids matching the filter in submission order.
    ///
    /// # Errors
    ///
    /// Returns `Unexpected` on a storage failure.
    pub async fn list(&self, filter: &BidFilter) -> ApplicationResult<Vec<Bid>> {
        debug!(?filter, "listing bids");
        Ok(self.store.find_bids(filter).await?)
    }
}
