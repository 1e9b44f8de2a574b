//! # Transporter Directory
//!
//! Registration and lookup of transporters. Pool changes after registration
//! belong to the [`CapacityLedger`](super::capacity_ledger::CapacityLedger).

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::unit_of_work::UnitOfWork;
use crate::domain::entities::{Transporter, TruckAvailability, TruckPool};
use crate::domain::value_objects::{Rating, TransporterId, TruckType};
use crate::infrastructure::persistence::FreightStore;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Input for registering a transporter.
#[derive(Debug, Clone, PartialEq)]
pub struct RegisterTransporter {
    /// Company name.
    pub company_name: String,
    /// Rating from 0.0 to 5.0.
    pub rating: f64,
    /// Initial pool as (truck type, count) pairs.
    pub trucks: Vec<(String, u32)>,
}

/// Builds a validated pool from (truck type, count) pairs.
///
/// # Errors
///
/// Returns `Validation` for a blank or duplicate truck type.
pub fn truck_pool_from_pairs(pairs: Vec<(String, u32)>) -> ApplicationResult<TruckPool> {
    let entries = pairs
        .into_iter()
        .map(|(truck_type, count)| -> ApplicationResult<TruckAvailability> {
            Ok(TruckAvailability::new(TruckType::new(truck_type)?, count))
        })
        .collect::<ApplicationResult<Vec<_>>>()?;
    Ok(TruckPool::new(entries)?)
}

/// Registry of transporters.
#[derive(Debug, Clone)]
pub struct TransporterDirectory {
    store: Arc<dyn FreightStore>,
}

impl TransporterDirectory {
    /// Creates the directory over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn FreightStore>) -> Self {
        Self { store }
    }

    /// Registers a transporter with its initial truck pool.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for a blank name, an out-of-range rating, or a
    /// malformed pool.
    #[instrument(skip(self, request), fields(company = %request.company_name))]
    pub async fn register(&self, request: RegisterTransporter) -> ApplicationResult<Transporter> {
        let rating = Rating::new(request.rating)?;
        let pool = truck_pool_from_pairs(request.trucks)?;
        let transporter = Transporter::new(request.company_name, rating, pool)?;

        let mut uow = UnitOfWork::begin(Arc::clone(&self.store));
        uow.add_transporter(transporter.clone());
        uow.commit().await?;

        info!(transporter_id = %transporter.id(), trucks = transporter.truck_pool().total(), "transporter registered");
        Ok(transporter)
    }

    /// Gets a transporter by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the transporter does not exist.
    pub async fn get(&self, id: TransporterId) -> ApplicationResult<Transporter> {
        debug!(transporter_id = %id, "fetching transporter");
        self.store
            .get_transporter(&id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Transporter", id))
    }

    /// Lists all transporters.
    ///
    /// # Errors
    ///
    /// Returns `Unexpected` on a storage failure.
    pub async fn list(&self) -> ApplicationResult<Vec<Transporter>> {
        Ok(self.store.list_transporters().await?)
    }
}
