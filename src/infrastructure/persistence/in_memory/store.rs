//! # In-Memory Freight Store
//!
//! In-memory implementation of [`FreightStore`].
//!
//! All four tables sit behind one `RwLock`, so a commit validates and
//! applies its whole change set while holding a single write guard. Readers
//! never observe half of a commit.

use crate::domain::entities::{Bid, Booking, Load, Transporter};
use crate::domain::value_objects::{BidId, BookingId, LoadId, TransporterId};
use crate::infrastructure::persistence::change_set::{ChangeSet, Staged};
use crate::infrastructure::persistence::traits::{
    BidFilter, BidRepository, BookingRepository, FreightStore, LoadFilter, LoadRepository, Page,
    PageRequest, RepositoryError, RepositoryResult, TransporterRepository,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A versioned record the store can key and check.
trait Record: Clone {
    type Key: Copy + Eq + Hash + fmt::Display;
    const ENTITY: &'static str;

    fn key(&self) -> Self::Key;
    fn version(&self) -> u64;
}

macro_rules! record {
    ($ty:ty, $key:ty, $name:literal) => {
        impl Record for $ty {
            type Key = $key;
            const ENTITY: &'static str = $name;

            fn key(&self) -> Self::Key {
                self.id()
            }

            fn version(&self) -> u64 {
                <$ty>::version(self)
            }
        }
    };
}

record!(Load, LoadId, "Load");
record!(Transporter, TransporterId, "Transporter");
record!(Bid, BidId, "Bid");
record!(Booking, BookingId, "Booking");

#[derive(Debug, Default)]
struct Tables {
    loads: HashMap<LoadId, Load>,
    transporters: HashMap<TransporterId, Transporter>,
    bids: HashMap<BidId, Bid>,
    bookings: HashMap<BookingId, Booking>,
}

fn validate<T: Record>(table: &HashMap<T::Key, T>, writes: &[Staged<T>]) -> RepositoryResult<()> {
    for write in writes {
        match write {
            Staged::Insert(record) => {
                if table.contains_key(&record.key()) {
                    return Err(RepositoryError::duplicate(T::ENTITY, record.key()));
                }
            }
            Staged::Update {
                expected_version,
                record,
            }
            | Staged::Check {
                expected_version,
                record,
            } => {
                let stored = table
                    .get(&record.key())
                    .ok_or_else(|| RepositoryError::not_found(T::ENTITY, record.key()))?;
                if stored.version() != *expected_version {
                    return Err(RepositoryError::version_conflict(
                        T::ENTITY,
                        record.key(),
                        *expected_version,
                        stored.version(),
                    ));
                }
            }
        }
    }
    Ok(())
}

fn apply<T: Record>(table: &mut HashMap<T::Key, T>, writes: Vec<Staged<T>>) {
    for record in writes.into_iter().filter_map(Staged::into_write) {
        table.insert(record.key(), record);
    }
}

/// In-memory implementation of [`FreightStore`].
///
/// Cloning shares the underlying tables.
#[derive(Debug, Clone)]
pub struct InMemoryFreightStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryFreightStore {
    /// Creates a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tables: Arc::new(RwLock::new(Tables::default())),
        }
    }
}

impl Default for InMemoryFreightStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LoadRepository for InMemoryFreightStore {
    async fn get_load(&self, id: &LoadId) -> RepositoryResult<Option<Load>> {
        let tables = self.tables.read().await;
        Ok(tables.loads.get(id).cloned())
    }

    async fn find_loads(
        &self,
        filter: &LoadFilter,
        page: PageRequest,
    ) -> RepositoryResult<Page<Load>> {
        let tables = self.tables.read().await;
        let mut matches: Vec<Load> = tables
            .loads
            .values()
            .filter(|load| filter.matches(load))
            .cloned()
            .collect();
        matches.sort_by_key(|load| (load.posted_at(), load.id()));
        Ok(Page::from_all(matches, page))
    }
}

#[async_trait]
impl TransporterRepository for InMemoryFreightStore {
    async fn get_transporter(&self, id: &TransporterId) -> RepositoryResult<Option<Transporter>> {
        let tables = self.tables.read().await;
        Ok(tables.transporters.get(id).cloned())
    }

    async fn list_transporters(&self) -> RepositoryResult<Vec<Transporter>> {
        let tables = self.tables.read().await;
        let mut all: Vec<Transporter> = tables.transporters.values().cloned().collect();
        all.sort_by_key(|t| (t.registered_at(), t.id()));
        Ok(all)
    }
}

#[async_trait]
impl BidRepository for InMemoryFreightStore {
    async fn get_bid(&self, id: &BidId) -> RepositoryResult<Option<Bid>> {
        let tables = self.tables.read().await;
        Ok(tables.bids.get(id).cloned())
    }

    async fn find_bids(&self, filter: &BidFilter) -> RepositoryResult<Vec<Bid>> {
        let tables = self.tables.read().await;
        let mut matches: Vec<Bid> = tables
            .bids
            .values()
            .filter(|bid| filter.matches(bid))
            .cloned()
            .collect();
        matches.sort_by_key(|bid| (bid.submitted_at(), bid.id()));
        Ok(matches)
    }
}

#[async_trait]
impl BookingRepository for InMemoryFreightStore {
    async fn get_booking(&self, id: &BookingId) -> RepositoryResult<Option<Booking>> {
        let tables = self.tables.read().await;
        Ok(tables.bookings.get(id).cloned())
    }

    async fn find_bookings_by_load(&self, load_id: &LoadId) -> RepositoryResult<Vec<Booking>> {
        let tables = self.tables.read().await;
        let mut matches: Vec<Booking> = tables
            .bookings
            .values()
            .filter(|b| b.load_id() == *load_id)
            .cloned()
            .collect();
        matches.sort_by_key(|b| (b.booked_at(), b.id()));
        Ok(matches)
    }

    async fn find_bookings_by_transporter(
        &self,
        transporter_id: &TransporterId,
    ) -> RepositoryResult<Vec<Booking>> {
        let tables = self.tables.read().await;
        let mut matches: Vec<Booking> = tables
            .bookings
            .values()
            .filter(|b| b.transporter_id() == *transporter_id)
            .cloned()
            .collect();
        matches.sort_by_key(|b| (b.booked_at(), b.id()));
        Ok(matches)
    }
}

#[async_trait]
impl FreightStore for InMemoryFreightStore {
    async fn commit(&self, changes: ChangeSet) -> RepositoryResult<()> {
        let mut tables = self.tables.write().await;

        validate(&tables.loads, &changes.loads)?;
        validate(&tables.transporters, &changes.transporters)?;
        validate(&tables.bids, &changes.bids)?;
        validate(&tables.bookings, &changes.bookings)?;

        apply(&mut tables.loads, changes.loads);
        apply(&mut tables.transporters, changes.transporters);
        apply(&mut tables.bids, changes.bids);
        apply(&mut tables.bookings, changes.bookings);
        Ok(())
    }
}
