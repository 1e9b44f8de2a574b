//! # Capacity Ledger
//!
//! Sole writer of transporters' truck pools.
//!
//! Reads, reservations and releases run inside the caller's
//! [`UnitOfWork`], so a reservation made early in an operation disappears if
//! the operation fails later. [`CapacityLedger::replace_all`] is an
//! administrative overwrite and runs in its own unit of work.

use crate::application::error::ApplicationResult;
use crate::application::unit_of_work::UnitOfWork;
use crate::domain::entities::{Transporter, TruckPool};
use crate::domain::value_objects::{TransporterId, TruckType};
use crate::infrastructure::persistence::FreightStore;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Reserves and releases trucks in transporter pools.
#[derive(Debug, Clone)]
pub struct CapacityLedger {
    store: Arc<dyn FreightStore>,
}

impl CapacityLedger {
    /// Creates a ledger over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn FreightStore>) -> Self {
        Self { store }
    }

    /// Returns the unreserved count for a truck type, 0 if the type is absent.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the transporter does not exist.
    pub async fn available(
        &self,
        uow: &mut UnitOfWork,
        transporter_id: TransporterId,
        truck_type: &TruckType,
    ) -> ApplicationResult<u32> {
        Ok(uow.transporter(transporter_id).await?.available(truck_type))
    }

    /// Takes trucks out of a transporter's pool.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the transporter does not exist
    /// - `InsufficientCapacity` if the type is missing or short
    pub async fn reserve(
        &self,
        uow: &mut UnitOfWork,
        transporter_id: TransporterId,
        truck_type: &TruckType,
        count: u32,
    ) -> ApplicationResult<()> {
        let transporter = uow.transporter(transporter_id).await?;
        if let Err(err) = transporter.reserve_trucks(truck_type, count) {
            warn!(%transporter_id, %truck_type, count, error = %err, "truck reservation refused");
            return Err(err.into());
        }
        Ok(())
    }

    /// Returns trucks to a transporter's pool, creating the type if needed.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the transporter does not exist.
    pub async fn release(
        &self,
        uow: &mut UnitOfWork,
        transporter_id: TransporterId,
        truck_type: &TruckType,
        count: u32,
    ) -> ApplicationResult<()> {
        uow.transporter(transporter_id)
            .await?
            .release_trucks(truck_type, count);
        Ok(())
    }

    /// Overwrites a transporter's whole pool.
    ///
    /// In-flight bids are not re-validated.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the transporter does not exist
    /// - `Conflict` if the transporter changed concurrently
    #[instrument(skip(self, pool), fields(types = pool.entries().len()))]
    pub async fn replace_all(
        &self,
        transporter_id: TransporterId,
        pool: TruckPool,
    ) -> ApplicationResult<Transporter> {
        let mut uow = UnitOfWork::begin(Arc::clone(&self.store));
        let transporter = uow.transporter(transporter_id).await?;
        transporter.replace_truck_pool(pool);
        let updated = transporter.clone();
        uow.commit().await?;

        info!(%transporter_id, total = updated.truck_pool().total(), "truck pool replaced");
        Ok(updated)
    }
}
