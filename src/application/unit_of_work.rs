//! # Unit of Work
//!
//! Explicit transaction for one externally triggered operation.
//!
//! A [`UnitOfWork`] reads records through the store, remembers the version
//! each one had when read, and hands out mutable references to its private
//! copies. Nothing reaches the store until [`UnitOfWork::commit`], which
//! stages every new or changed record into a single [`ChangeSet`]. Dropping
//! the unit of work without committing discards every change.
//!
//! Unchanged records are not staged, so a concurrent change to them goes
//! unnoticed. Read a record with a `guarded_*` accessor when the operation's
//! outcome depends on it; its version is then checked at commit as well.
//!
//! # Examples
//!
//! ```ignore
//! let mut uow = UnitOfWork::begin(Arc::clone(&store));
//! uow.load(load_id).await?.cancel()?;
//! uow.commit().await?;
//! ```

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::domain::entities::{Bid, Booking, Load, Transporter};
use crate::domain::value_objects::{BidId, BookingId, LoadId, TransporterId};
use crate::infrastructure::persistence::{ChangeSet, FreightStore, RepositoryResult, Staged};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;

/// A record plus the version it had when it entered the unit of work.
#[derive(Debug)]
struct Tracked<T> {
    /// `None` for records created inside this unit of work.
    original_version: Option<u64>,
    /// Check the version at commit even if unchanged.
    guarded: bool,
    record: T,
}

async fn track<'a, K, T, F>(
    table: &'a mut HashMap<K, Tracked<T>>,
    id: K,
    entity: &'static str,
    version: fn(&T) -> u64,
    fetch: F,
) -> ApplicationResult<&'a mut Tracked<T>>
where
    K: Copy + Eq + Hash + fmt::Display,
    F: Future<Output = RepositoryResult<Option<T>>>,
{
    match table.entry(id) {
        Entry::Occupied(entry) => Ok(entry.into_mut()),
        Entry::Vacant(entry) => {
            let record = fetch
                .await?
                .ok_or_else(|| ApplicationError::not_found(entity, id))?;
            Ok(entry.insert(Tracked {
                original_version: Some(version(&record)),
                guarded: false,
                record,
            }))
        }
    }
}

fn stage<K, T>(table: HashMap<K, Tracked<T>>, version: fn(&T) -> u64) -> Vec<Staged<T>> {
    table
        .into_values()
        .filter_map(|tracked| match tracked.original_version {
            None => Some(Staged::Insert(tracked.record)),
            Some(expected_version) if version(&tracked.record) != expected_version => {
                Some(Staged::Update {
                    expected_version,
                    record: tracked.record,
                })
            }
            Some(expected_version) if tracked.guarded => Some(Staged::Check {
                expected_version,
                record: tracked.record,
            }),
            Some(_) => None,
        })
        .collect()
}

/// Explicit transaction over loads, transporters, bids and bookings.
pub struct UnitOfWork {
    store: Arc<dyn FreightStore>,
    loads: HashMap<LoadId, Tracked<Load>>,
    transporters: HashMap<TransporterId, Tracked<Transporter>>,
    bids: HashMap<BidId, Tracked<Bid>>,
    bookings: HashMap<BookingId, Tracked<Booking>>,
}

impl UnitOfWork {
    /// Starts an empty unit of work against a store.
    #[must_use]
    pub fn begin(store: Arc<dyn FreightStore>) -> Self {
        Self {
            store,
            loads: HashMap::new(),
            transporters: HashMap::new(),
            bids: HashMap::new(),
            bookings: HashMap::new(),
        }
    }

    /// Returns the load, reading it on first access.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::NotFound` if the load does not exist.
    pub async fn load(&mut self, id: LoadId) -> ApplicationResult<&mut Load> {
        track(
            &mut self.loads,
            id,
            "Load",
            Load::version,
            self.store.get_load(&id),
        )
        .await
        .map(|tracked| &mut tracked.record)
    }

    /// Returns the load and keeps its version checked at commit, so the
    /// commit fails with a version conflict if the load changed meanwhile.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::NotFound` if the load does not exist.
    pub async fn guarded_load(&mut self, id: LoadId) -> ApplicationResult<&mut Load> {
        let tracked = track(
            &mut self.loads,
            id,
            "Load",
            Load::version,
            self.store.get_load(&id),
        )
        .await?;
        tracked.guarded = true;
        Ok(&mut tracked.record)
    }

    /// Returns the transporter, reading it on first access.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::NotFound` if the transporter does not exist.
    pub async fn transporter(&mut self, id: TransporterId) -> ApplicationResult<&mut Transporter> {
        track(
            &mut self.transporters,
            id,
            "Transporter",
            Transporter::version,
            self.store.get_transporter(&id),
        )
        .await
        .map(|tracked| &mut tracked.record)
    }

    /// Returns the bid, reading it on first access.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::NotFound` if the bid does not exist.
    pub async fn bid(&mut self, id: BidId) -> ApplicationResult<&mut Bid> {
        track(
            &mut self.bids,
            id,
            "Bid",
            Bid::version,
            self.store.get_bid(&id),
        )
        .await
        .map(|tracked| &mut tracked.record)
    }

    /// Returns the booking, reading it on first access.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::NotFound` if the booking does not exist.
    pub async fn booking(&mut self, id: BookingId) -> ApplicationResult<&mut Booking> {
        track(
            &mut self.bookings,
            id,
            "Booking",
            Booking::version,
            self.store.get_booking(&id),
        )
        .await
        .map(|tracked| &mut tracked.record)
    }

    /// Stages a new load.
    pub fn add_load(&mut self, load: Load) {
        self.loads.insert(load.id(), Tracked::new(load));
    }

    /// Stages a new transporter.
    pub fn add_transporter(&mut self, transporter: Transporter) {
        self.transporters
            .insert(transporter.id(), Tracked::new(transporter));
    }

    /// Stages a new bid.
    pub fn add_bid(&mut self, bid: Bid) {
        self.bids.insert(bid.id(), Tracked::new(bid));
    }

    /// Stages a new booking.
    pub fn add_booking(&mut self, booking: Booking) {
        self.bookings.insert(booking.id(), Tracked::new(booking));
    }

    /// Builds the change set without committing it.
    #[must_use]
    pub fn into_change_set(self) -> ChangeSet {
        ChangeSet {
            loads: stage(self.loads, Load::version),
            transporters: stage(self.transporters, Transporter::version),
            bids: stage(self.bids, Bid::version),
            bookings: stage(self.bookings, Booking::version),
        }
    }

    /// Writes every staged change atomically.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Repository` if the store rejects the change
    /// set, most commonly a version conflict. Nothing is written in that case.
    pub async fn commit(self) -> ApplicationResult<()> {
        let store = Arc::clone(&self.store);
        let changes = self.into_change_set();
        if changes.is_empty() {
            return Ok(());
        }
        tracing::trace!(
            writes = changes.writes(),
            checks = changes.len() - changes.writes(),
            "committing unit of work"
        );
        store.commit(changes).await?;
        Ok(())
    }
}

impl<T> Tracked<T> {
    fn new(record: T) -> Self {
        Self {
            original_version: None,
            guarded: false,
            record,
        }
    }
}

impl fmt::Debug for UnitOfWork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnitOfWork")
            .field("loads", &self.loads.len())
            .field("transporters", &self.transporters.len())
            .field("bids", &self.bids.len())
            .field("bookings", &self.bookings.len())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::entities::{LoadBuilder, TruckAvailability, TruckPool};
    use crate::domain::value_objects::{
        Rate, Rating, ShipperId, TransporterId, TruckType, Weight, WeightUnit,
    };
    use crate::infrastructure::persistence::{BidRepository, InMemoryFreightStore, LoadRepository};

    fn create_test_load() -> Load {
        LoadBuilder::new(
            ShipperId::new("shipper"),
            "Surat",
            "Jaipur",
            "Yarn",
            TruckType::new("MEDIUM").unwrap(),
            3,
            Weight::new(2.5, WeightUnit::Ton).unwrap(),
        )
        .try_build()
        .unwrap()
    }

    async fn seeded_store(load: &Load) -> Arc<InMemoryFreightStore> {
        let store = Arc::new(InMemoryFreightStore::new());
        let mut uow = UnitOfWork::begin(store.clone());
        uow.add_load(load.clone());
        uow.commit().await.unwrap();
        store
    }

    #[tokio::test]
    async fn missing_record_is_not_found() {
        let store = Arc::new(InMemoryFreightStore::new());
        let mut uow = UnitOfWork::begin(store);
        let err = uow.load(LoadId::new_v4()).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn unchanged_reads_stage_nothing() {
        let load = create_test_load();
        let store = seeded_store(&load).await;
        let mut uow = UnitOfWork::begin(store);
        uow.load(load.id()).await.unwrap();
        assert!(uow.into_change_set().is_empty());
    }

    #[tokio::test]
    async fn guarded_read_stages_check() {
        let load = create_test_load();
        let store = seeded_store(&load).await;
        let mut uow = UnitOfWork::begin(store);
        uow.guarded_load(load.id()).await.unwrap();

        let changes = uow.into_change_set();
        assert_eq!(changes.writes(), 0);
        assert!(matches!(
            changes.loads.first(),
            Some(Staged::Check {
                expected_version: 1,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn guarded_read_conflicts_with_concurrent_change() {
        let load = create_test_load();
        let store = seeded_store(&load).await;
        let rate = Rate::new(rust_decimal::Decimal::from(90)).unwrap();

        let mut bidding = UnitOfWork::begin(store.clone());
        assert!(bidding.guarded_load(load.id()).await.unwrap().status().accepts_bids());
        let bid = Bid::new(load.id(), TransporterId::new_v4(), rate, 1).unwrap();
        bidding.add_bid(bid.clone());

        let mut cancelling = UnitOfWork::begin(store.clone());
        cancelling.load(load.id()).await.unwrap().cancel().unwrap();
        cancelling.commit().await.unwrap();

        let err = bidding.commit().await.unwrap_err();
        assert!(err.is_conflict());
        assert!(store.get_bid(&bid.id()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn mutation_is_staged_as_update() {
        let load = create_test_load();
        let store = seeded_store(&load).await;
        let mut uow = UnitOfWork::begin(store);
        uow.load(load.id()).await.unwrap().mark_open_for_bidding();

        let changes = uow.into_change_set();
        assert_eq!(changes.loads.len(), 1);
        assert!(matches!(
            changes.loads.first(),
            Some(Staged::Update {
                expected_version: 1,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn repeated_access_returns_same_copy() {
        let load = create_test_load();
        let store = seeded_store(&load).await;
        let mut uow = UnitOfWork::begin(store);
        uow.load(load.id()).await.unwrap().apply_allocation(1);
        assert_eq!(uow.load(load.id()).await.unwrap().remaining_trucks(), 2);
    }

    #[tokio::test]
    async fn dropping_discards_changes() {
        let load = create_test_load();
        let store = seeded_store(&load).await;
        {
            let mut uow = UnitOfWork::begin(store.clone());
            uow.load(load.id()).await.unwrap().apply_allocation(3);
        }
        let stored = store.get_load(&load.id()).await.unwrap().unwrap();
        assert_eq!(stored.remaining_trucks(), 3);
    }

    #[tokio::test]
    async fn concurrent_units_conflict() {
        let load = create_test_load();
        let store = seeded_store(&load).await;

        let mut first = UnitOfWork::begin(store.clone());
        let mut second = UnitOfWork::begin(store.clone());
        first.load(load.id()).await.unwrap().apply_allocation(1);
        second.load(load.id()).await.unwrap().apply_allocation(2);

        first.commit().await.unwrap();
        let err = second.commit().await.unwrap_err();
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn inserts_commit_together() {
        let store = Arc::new(InMemoryFreightStore::new());
        let pool = TruckPool::new(vec![TruckAvailability::new(
            TruckType::new("LARGE").unwrap(),
            2,
        )])
        .unwrap();
        let transporter = Transporter::new("Acme", Rating::new(3.5).unwrap(), pool).unwrap();
        let load = create_test_load();

        let mut uow = UnitOfWork::begin(store.clone());
        uow.add_transporter(transporter.clone());
        uow.add_load(load.clone());
        uow.commit().await.unwrap();

        let mut uow = UnitOfWork::begin(store);
        assert_eq!(
            uow.transporter(transporter.id()).await.unwrap().company_name(),
            "Acme"
        );
        assert_eq!(uow.load(load.id()).await.unwrap().id(), load.id());
    }
}
