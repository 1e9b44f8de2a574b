//! # Load Lifecycle
//!
//! Posting, listing and cancelling loads, plus the in-transaction hooks the
//! bid and booking lifecycles use to move a load's status and
//! remaining-truck counter.
//!
//! ```text
//! POSTED ──first bid──► OPEN_FOR_BIDS ──remaining = 0──► BOOKED
//!                           ▲                              │
//!                           └──── booking cancelled ───────┘
//! POSTED / OPEN_FOR_BIDS ──cancel──► CANCELLED
//! ```

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::unit_of_work::UnitOfWork;
use crate::domain::entities::{Load, LoadBuilder};
use crate::domain::value_objects::{
    LoadId, LoadStatus, ShipperId, Timestamp, TruckType, Weight, WeightUnit,
};
use crate::infrastructure::persistence::{FreightStore, LoadFilter, Page, PageRequest};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Input for posting a load.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateLoad {
    /// Shipper posting the load.
    pub shipper_id: String,
    /// Origin city.
    pub loading_city: String,
    /// Destination city.
    pub unloading_city: String,
    /// Product being shipped.
    pub product_type: String,
    /// Required truck type, any case.
    pub truck_type: String,
    /// Trucks requested.
    pub no_of_trucks: u32,
    /// Shipment weight.
    pub weight: f64,
    /// Unit of `weight`.
    pub weight_unit: WeightUnit,
    /// Optional free text.
    pub comment: Option<String>,
    /// Planned loading date; defaults to one day after posting.
    pub loading_date: Option<Timestamp>,
}

/// Owner of load state and remaining-truck counts.
#[derive(Debug, Clone)]
pub struct LoadLifecycle {
    store: Arc<dyn FreightStore>,
}

impl LoadLifecycle {
    /// Creates the lifecycle over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn FreightStore>) -> Self {
        Self { store }
    }

    /// Posts a new load with every truck still needed.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if any field is malformed.
    #[instrument(skip(self, request), fields(shipper_id = %request.shipper_id))]
    pub async fn create(&self, request: CreateLoad) -> ApplicationResult<Load> {
        let truck_type = TruckType::new(&request.truck_type)?;
        let weight = Weight::new(request.weight, request.weight_unit)?;
        let mut builder = LoadBuilder::new(
            ShipperId::new(request.shipper_id),
            request.loading_city,
            request.unloading_city,
            request.product_type,
            truck_type,
            request.no_of_trucks,
            weight,
        );
        if let Some(comment) = request.comment {
            builder = builder.comment(comment);
        }
        if let Some(loading_date) = request.loading_date {
            builder = builder.loading_date(loading_date);
        }
        let load = builder.try_build()?;

        let mut uow = UnitOfWork::begin(Arc::clone(&self.store));
        uow.add_load(load.clone());
        uow.commit().await?;

        info!(load_id = %load.id(), trucks = load.no_of_trucks(), truck_type = %load.truck_type(), "load posted");
        Ok(load)
    }

    /// Gets a load by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the load does not exist.
    pub async fn get(&self, id: LoadId) -> ApplicationResult<Load> {
        debug!(load_id = %id, "fetching load");
        self.store
            .get_load(&id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Load", id))
    }

    /// Lists loads matching the filter, one page at a time.
    ///
    /// # Errors
    ///
    /// Returns `Unexpected` on a storage failure.
    pub async fn list(&self, filter: &LoadFilter, page: PageRequest) -> ApplicationResult<Page<Load>> {
        debug!(?filter, page = page.page, size = page.size, "listing loads");
        Ok(self.store.find_loads(filter, page).await?)
    }

    /// Cancels a load that is still posted or open for bids.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the load does not exist
    /// - `InvalidTransition` if the load is already cancelled or booked
    /// - `Conflict` if the load changed concurrently
    #[instrument(skip(self))]
    pub async fn cancel(&self, id: LoadId) -> ApplicationResult<Load> {
        let mut uow = UnitOfWork::begin(Arc::clone(&self.store));
        let load = uow.load(id).await?;
        match load.status() {
            LoadStatus::Cancelled => {
                warn!(load_id = %id, "load already cancelled");
                return Err(ApplicationError::invalid_transition("Load is already cancelled"));
            }
            LoadStatus::Booked => {
                warn!(load_id = %id, "refusing to cancel booked load");
                return Err(ApplicationError::invalid_transition("Cannot cancel a booked load"));
            }
            LoadStatus::Posted | LoadStatus::OpenForBids => {}
        }
        load.cancel()?;
        let cancelled = load.clone();
        uow.commit().await?;

        info!(load_id = %id, "load cancelled");
        Ok(cancelled)
    }

    /// Moves a posted load into bidding. Returns true if the status changed.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the load does not exist.
    pub async fn mark_open_for_bidding(
        &self,
        uow: &mut UnitOfWork,
        id: LoadId,
    ) -> ApplicationResult<bool> {
        let opened = uow.load(id).await?.mark_open_for_bidding();
        if opened {
            debug!(load_id = %id, "load open for bids");
        }
        Ok(opened)
    }

    /// Subtracts allocated trucks; the load books itself when none remain.
    ///
    /// The caller has already checked the count against the remaining trucks.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the load does not exist.
    pub async fn apply_allocation(
        &self,
        uow: &mut UnitOfWork,
        id: LoadId,
        trucks: u32,
    ) -> ApplicationResult<()> {
        let load = uow.load(id).await?;
        load.apply_allocation(trucks);
        debug!(load_id = %id, trucks, remaining = load.remaining_trucks(), status = %load.status(), "allocation applied");
        Ok(())
    }

    /// Returns released trucks; a booked load reopens for bids.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the load does not exist.
    pub async fn release_allocation(
        &self,
        uow: &mut UnitOfWork,
        id: LoadId,
        trucks: u32,
    ) -> ApplicationResult<()> {
        let load = uow.load(id).await?;
        let restored = load.release_allocation(trucks);
        if restored < trucks {
            warn!(load_id = %id, trucks, restored, "release capped at load size");
        }
        debug!(load_id = %id, trucks, remaining = load.remaining_trucks(), status = %load.status(), "allocation released");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::application::error::ErrorKind;
    use crate::infrastructure::persistence::InMemoryFreightStore;

    fn request(shipper: &str, trucks: u32) -> CreateLoad {
        CreateLoad {
            shipper_id: shipper.to_string(),
            loading_city: "Ahmedabad".to_string(),
            unloading_city: "Kolkata".to_string(),
            product_type: "Chemicals".to_string(),
            truck_type: "large".to_string(),
            no_of_trucks: trucks,
            weight: 1200.0,
            weight_unit: WeightUnit::Kg,
            comment: None,
            loading_date: None,
        }
    }

    fn lifecycle() -> LoadLifecycle {
        LoadLifecycle::new(Arc::new(InMemoryFreightStore::new()))
    }

    mod create {
        use super::*;

        #[tokio::test]
        async fn posted_load_is_persisted() {
            let loads = lifecycle();
            let load = loads.create(request("s-1", 10)).await.unwrap();
            assert_eq!(load.status(), LoadStatus::Posted);
            assert_eq!(load.remaining_trucks(), 10);
            assert_eq!(load.truck_type().as_str(), "LARGE");
            assert_eq!(loads.get(load.id()).await.unwrap(), load);
        }

        #[tokio::test]
        async fn invalid_input_is_validation() {
            let loads = lifecycle();
            let err = loads.create(request("s-1", 0)).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation);

            let mut bad_weight = request("s-1", 1);
            bad_weight.weight = -1.0;
            assert!(loads.create(bad_weight).await.unwrap_err().is_validation());

            let mut bad_type = request("s-1", 1);
            bad_type.truck_type = " ".to_string();
            assert!(loads.create(bad_type).await.unwrap_err().is_validation());
        }
    }

    mod queries {
        use super::*;

        #[tokio::test]
        async fn unknown_load_is_not_found() {
            let err = lifecycle().get(LoadId::new_v4()).await.unwrap_err();
            assert!(err.is_not_found());
        }

        #[tokio::test]
        async fn list_filters_by_shipper() {
            let loads = lifecycle();
            loads.create(request("s-1", 1)).await.unwrap();
            loads.create(request("s-1", 2)).await.unwrap();
            loads.create(request("s-2", 3)).await.unwrap();

            let filter = LoadFilter::default().with_shipper(ShipperId::new("s-1"));
            let page = loads.list(&filter, PageRequest::new(0, 10)).await.unwrap();
            assert_eq!(page.total_elements, 2);

            let all = loads
                .list(&LoadFilter::default(), PageRequest::new(0, 2))
                .await
                .unwrap();
            assert_eq!(all.items.len(), 2);
            assert_eq!(all.total_pages, 2);
        }
    }

    mod cancel {
        use super::*;

        #[tokio::test]
        async fn cancel_posted_load() {
            let loads = lifecycle();
            let load = loads.create(request("s-1", 2)).await.unwrap();
            let cancelled = loads.cancel(load.id()).await.unwrap();
            assert_eq!(cancelled.status(), LoadStatus::Cancelled);
            assert_eq!(
                loads.get(load.id()).await.unwrap().status(),
                LoadStatus::Cancelled
            );
        }

        #[tokio::test]
        async fn cancel_twice_is_invalid_transition() {
            let loads = lifecycle();
            let load = loads.create(request("s-1", 2)).await.unwrap();
            loads.cancel(load.id()).await.unwrap();
            let err = loads.cancel(load.id()).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidTransition);
            assert_eq!(err.to_string(), "Load is already cancelled");
        }

        #[tokio::test]
        async fn booked_load_cannot_be_cancelled() {
            let store = Arc::new(InMemoryFreightStore::new());
            let loads = LoadLifecycle::new(store.clone());
            let load = loads.create(request("s-1", 2)).await.unwrap();

            let mut uow = UnitOfWork::begin(store);
            loads.apply_allocation(&mut uow, load.id(), 2).await.unwrap();
            uow.commit().await.unwrap();

            let err = loads.cancel(load.id()).await.unwrap_err();
            assert_eq!(err.to_string(), "Cannot cancel a booked load");
        }
    }

    mod allocation {
        use super::*;

        #[tokio::test]
        async fn allocate_and_release_within_one_unit() {
            let store = Arc::new(InMemoryFreightStore::new());
            let loads = LoadLifecycle::new(store.clone());
            let load = loads.create(request("s-1", 4)).await.unwrap();

            let mut uow = UnitOfWork::begin(store);
            assert!(loads.mark_open_for_bidding(&mut uow, load.id()).await.unwrap());
            assert!(!loads.mark_open_for_bidding(&mut uow, load.id()).await.unwrap());
            loads.apply_allocation(&mut uow, load.id(), 4).await.unwrap();
            assert_eq!(uow.load(load.id()).await.unwrap().status(), LoadStatus::Booked);
            loads.release_allocation(&mut uow, load.id(), 1).await.unwrap();
            uow.commit().await.unwrap();

            let stored = loads.get(load.id()).await.unwrap();
            assert_eq!(stored.remaining_trucks(), 1);
            assert_eq!(stored.status(), LoadStatus::OpenForBids);
        }

        #[tokio::test]
        async fn oversized_release_is_capped() {
            let store = Arc::new(InMemoryFreightStore::new());
            let loads = LoadLifecycle::new(store.clone());
            let load = loads.create(request("s-1", 3)).await.unwrap();

            let mut uow = UnitOfWork::begin(store);
            loads.apply_allocation(&mut uow, load.id(), 1).await.unwrap();
            loads.release_allocation(&mut uow, load.id(), 5).await.unwrap();
            uow.commit().await.unwrap();

            assert_eq!(loads.get(load.id()).await.unwrap().remaining_trucks(), 3);
        }
    }
}
