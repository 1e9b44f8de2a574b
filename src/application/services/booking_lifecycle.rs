//! # Booking Lifecycle
//!
//! Turns an accepted bid into a booking and undoes bookings on cancel.
//!
//! Each operation runs in one [`UnitOfWork`]. The truck reservation taken
//! while accepting a bid is staged in that unit, so any later failure drops
//! it together with everything else and the transporter's pool is untouched.

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::services::capacity_ledger::CapacityLedger;
use crate::application::services::load_lifecycle::LoadLifecycle;
use crate::application::unit_of_work::UnitOfWork;
use crate::domain::entities::Booking;
use crate::domain::value_objects::{BidId, BidStatus, BookingId, LoadId, TransporterId};
use crate::infrastructure::persistence::FreightStore;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Confirms and cancels bookings.
#[derive(Debug, Clone)]
pub struct BookingLifecycle {
    store: Arc<dyn FreightStore>,
    loads: LoadLifecycle,
    ledger: CapacityLedger,
}

impl BookingLifecycle {
    /// Creates the lifecycle.
    #[must_use]
    pub fn new(store: Arc<dyn FreightStore>, loads: LoadLifecycle, ledger: CapacityLedger) -> Self {
        Self {
            store,
            loads,
            ledger,
        }
    }

    /// Accepts a pending bid and confirms a booking for it.
    ///
    /// Reserves the bid's trucks from the transporter's pool, subtracts them
    /// from the load and marks the bid accepted, all in one commit. The
    /// booking's final rate is the bid's proposed rate unchanged.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the bid, its load or its transporter does not exist
    /// - `InvalidTransition` if the bid is not pending, the load is cancelled
    ///   or fully booked, or the bid asks for more trucks than remain
    /// - `InsufficientCapacity` if the transporter's pool is short
    /// - `Conflict` if the load or transporter changed concurrently
    #[instrument(skip(self))]
    pub async fn accept_bid(&self, bid_id: BidId) -> ApplicationResult<Booking> {
        let mut uow = UnitOfWork::begin(Arc::clone(&self.store));

        let bid = uow.bid(bid_id).await?.clone();
        if bid.status() != BidStatus::Pending {
            warn!(status = %bid.status(), "accept of non-pending bid refused");
            return Err(ApplicationError::invalid_transition(format!(
                "Only pending bids can be accepted (status: {})",
                bid.status()
            )));
        }

        let load = uow.load(bid.load_id()).await?;
        let status = load.status();
        let remaining = load.remaining_trucks();
        let truck_type = load.truck_type().clone();
        if !status.accepts_bookings() {
            warn!(load_id = %bid.load_id(), %status, "booking on cancelled load refused");
            return Err(ApplicationError::invalid_transition(format!(
                "Cannot book a load with status {status}"
            )));
        }
        if remaining == 0 {
            warn!(load_id = %bid.load_id(), "booking on fully booked load refused");
            return Err(ApplicationError::invalid_transition(
                "Load is already fully booked",
            ));
        }

        self.ledger
            .reserve(
                &mut uow,
                bid.transporter_id(),
                &truck_type,
                bid.trucks_offered(),
            )
            .await?;

        if bid.trucks_offered() > remaining {
            warn!(remaining, offered = bid.trucks_offered(), "booking exceeds remaining trucks");
            return Err(ApplicationError::invalid_transition(
                "Cannot book more trucks than remaining trucks needed",
            ));
        }

        let booking = Booking::confirm(&bid);
        uow.add_booking(booking.clone());
        self.loads
            .apply_allocation(&mut uow, bid.load_id(), bid.trucks_offered())
            .await?;
        uow.bid(bid_id).await?.accept()?;
        uow.commit().await?;

        info!(
            booking_id = %booking.id(),
            load_id = %booking.load_id(),
            trucks = booking.allocated_trucks(),
            rate = %booking.final_rate(),
            "booking confirmed"
        );
        Ok(booking)
    }

    /// Cancels a confirmed booking and returns its trucks.
    ///
    /// The load regains the allocated trucks (reopening if it was booked) and
    /// the transporter's pool regains them under the load's truck type.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the booking, its load or its transporter does not exist
    /// - `InvalidTransition` if the booking is already cancelled
    /// - `Conflict` if the load or transporter changed concurrently
    #[instrument(skip(self))]
    pub async fn cancel_booking(&self, id: BookingId) -> ApplicationResult<Booking> {
        let mut uow = UnitOfWork::begin(Arc::clone(&self.store));

        let booking = uow.booking(id).await?;
        if !booking.is_confirmed() {
            warn!(booking_id = %id, "booking already cancelled");
            return Err(ApplicationError::invalid_transition(
                "Booking already cancelled",
            ));
        }
        booking.cancel()?;
        let cancelled = booking.clone();

        let trucks = cancelled.allocated_trucks();
        let truck_type = uow.load(cancelled.load_id()).await?.truck_type().clone();
        self.loads
            .release_allocation(&mut uow, cancelled.load_id(), trucks)
            .await?;
        self.ledger
            .release(&mut uow, cancelled.transporter_id(), &truck_type, trucks)
            .await?;
        uow.commit().await?;

        info!(booking_id = %id, load_id = %cancelled.load_id(), trucks, "booking cancelled");
        Ok(cancelled)
    }

    /// Gets a booking by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the booking does not exist.
    pub async fn get(&self, id: BookingId) -> ApplicationResult<Booking> {
        debug!(booking_id = %id, "fetching booking");
        self.store
            .get_booking(&id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Booking", id))
    }

    /// Lists every booking on a load.
    ///
    /// # Errors
    ///
    /// Returns `Unexpected` on a storage failure.
    pub async fn for_load(&self, load_id: LoadId) -> ApplicationResult<Vec<Booking>> {
        Ok(self.store.find_bookings_by_load(&load_id).await?)
    }

    /// Lists every booking held by a transporter.
    ///
    /// # Errors
    ///
    /// Returns `Unexpected` on a storage failure.
    pub async fn for_transporter(
        &self,
        transporter_id: TransporterId,
    ) -> ApplicationResult<Vec<Booking>> {
        Ok(self
            .store
            .find_bookings_by_transporter(&transporter_id)
            .await?)
    }
}
