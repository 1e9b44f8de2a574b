//! # Transporter Aggregate
//!
//! A carrier and its pool of unreserved trucks, keyed by truck type.
//!
//! Pool mutations go through [`Transporter::reserve_trucks`],
//! [`Transporter::release_trucks`] and [`Transporter::replace_truck_pool`],
//! which the capacity ledger drives. Truck types compare case-insensitively
//! because [`TruckType`] is normalised on construction.

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{Rating, Timestamp, TransporterId, TruckType};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Count of unreserved trucks of one type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TruckAvailability {
    truck_type: TruckType,
    count: u32,
}

impl TruckAvailability {
    /// Creates an availability entry.
    #[must_use]
    pub fn new(truck_type: TruckType, count: u32) -> Self {
        Self { truck_type, count }
    }

    /// Returns the truck type.
    #[inline]
    #[must_use]
    pub fn truck_type(&self) -> &TruckType {
        &self.truck_type
    }

    /// Returns the number of unreserved trucks.
    #[inline]
    #[must_use]
    pub fn count(&self) -> u32 {
        self.count
    }
}

/// A transporter's trucks, one entry per truck type.
///
/// # Examples
///
/// ```
/// use freight_exchange::domain::entities::transporter::{TruckAvailability, TruckPool};
/// use freight_exchange::domain::value_objects::TruckType;
///
/// let large = TruckType::new("LARGE").unwrap();
/// let mut pool = TruckPool::new(vec![TruckAvailability::new(large.clone(), 20)]).unwrap();
///
/// pool.reserve(&TruckType::new("large").unwrap(), 5).unwrap();
/// assert_eq!(pool.available(&large), 15);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TruckPool {
    entries: Vec<TruckAvailability>,
}

impl TruckPool {
    /// Creates a pool from availability entries.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ValidationError` if a truck type appears twice.
    pub fn new(entries: Vec<TruckAvailability>) -> DomainResult<Self> {
        for (i, entry) in entries.iter().enumerate() {
            if entries
                .iter()
                .skip(i + 1)
                .any(|other| other.truck_type == entry.truck_type)
            {
                return Err(DomainError::validation(format!(
                    "duplicate truck type in pool: {}",
                    entry.truck_type
                )));
            }
        }
        Ok(Self { entries })
    }

    /// Returns the entries in insertion order.
    #[inline]
    #[must_use]
    pub fn entries(&self) -> &[TruckAvailability] {
        &self.entries
    }

    /// Returns the total unreserved trucks across all types.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|e| u64::from(e.count)).sum()
    }

    /// Returns the unreserved count for a truck type, 0 if the type is absent.
    #[must_use]
    pub fn available(&self, truck_type: &TruckType) -> u32 {
        self.entry(truck_type).map_or(0, |e| e.count)
    }

    /// Takes `count` trucks of a type out of the pool.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InsufficientCapacity` if the type is absent or
    /// holds fewer than `count` trucks. The pool is unchanged on error.
    pub fn reserve(&mut self, truck_type: &TruckType, count: u32) -> DomainResult<()> {
        let Some(entry) = self.entries.iter_mut().find(|e| &e.truck_type == truck_type) else {
            return Err(DomainError::insufficient_capacity(format!(
                "no trucks of type {truck_type} in pool"
            )));
        };
        if entry.count < count {
            return Err(DomainError::insufficient_capacity(format!(
                "requested {count} {truck_type} trucks, {} available",
                entry.count
            )));
        }
        entry.count -= count;
        Ok(())
    }

    /// Returns `count` trucks of a type to the pool.
    ///
    /// A type with no entry gets a new one holding `count`.
    pub fn release(&mut self, truck_type: &TruckType, count: u32) {
        match self.entries.iter_mut().find(|e| &e.truck_type == truck_type) {
            Some(entry) => entry.count = entry.count.saturating_add(count),
            None => self
                .entries
                .push(TruckAvailability::new(truck_type.clone(), count)),
        }
    }

    fn entry(&self, truck_type: &TruckType) -> Option<&TruckAvailability> {
        self.entries.iter().find(|e| &e.truck_type == truck_type)
    }
}

/// Transporter aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transporter {
    id: TransporterId,
    company_name: String,
    rating: Rating,
    truck_pool: TruckPool,
    version: u64,
    registered_at: Timestamp,
    updated_at: Timestamp,
}

impl Transporter {
    /// Registers a new transporter.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ValidationError` if the company name is blank.
    pub fn new(
        company_name: impl Into<String>,
        rating: Rating,
        truck_pool: TruckPool,
    ) -> DomainResult<Self> {
        let company_name = company_name.into();
        if company_name.trim().is_empty() {
            return Err(DomainError::validation("company name is required"));
        }
        let now = Timestamp::now();
        Ok(Self {
            id: TransporterId::new_v4(),
            company_name,
            rating,
            truck_pool,
            version: 1,
            registered_at: now,
            updated_at: now,
        })
    }

    /// Returns the transporter ID.
    #[inline]
    #[must_use]
    pub fn id(&self) -> TransporterId {
        self.id
    }

    /// Returns the company name.
    #[inline]
    #[must_use]
    pub fn company_name(&self) -> &str {
        &self.company_name
    }

    /// Returns the rating.
    #[inline]
    #[must_use]
    pub fn rating(&self) -> Rating {
        self.rating
    }

    /// Returns the truck pool.
    #[inline]
    #[must_use]
    pub fn truck_pool(&self) -> &TruckPool {
        &self.truck_pool
    }

    /// Returns the version for optimistic locking.
    #[inline]
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Returns when the transporter registered.
    #[inline]
    #[must_use]
    pub fn registered_at(&self) -> Timestamp {
        self.registered_at
    }

    /// Returns when the transporter was last modified.
    #[inline]
    #[must_use]
    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// Returns the unreserved count for a truck type.
    #[inline]
    #[must_use]
    pub fn available(&self, truck_type: &TruckType) -> u32 {
        self.truck_pool.available(truck_type)
    }

    /// Reserves trucks from the pool.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InsufficientCapacity` if the pool cannot cover
    /// `count`.
    pub fn reserve_trucks(&mut self, truck_type: &TruckType, count: u32) -> DomainResult<()> {
        self.truck_pool.reserve(truck_type, count)?;
        self.touch();
        Ok(())
    }

    /// Releases trucks back into the pool.
    pub fn release_trucks(&mut self, truck_type: &TruckType, count: u32) {
        self.truck_pool.release(truck_type, count);
        self.touch();
    }

    /// Overwrites the whole pool.
    pub fn replace_truck_pool(&mut self, truck_pool: TruckPool) {
        self.truck_pool = truck_pool;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Timestamp::now();
        self.version = self.version.saturating_add(1);
    }
}

impl fmt::Display for Transporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Transporter({} {} rating={} trucks={})",
            self.id,
            self.company_name,
            self.rating,
            self.truck_pool.total()
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn tt(name: &str) -> TruckType {
        TruckType::new(name).unwrap()
    }

    fn pool(entries: &[(&str, u32)]) -> TruckPool {
        TruckPool::new(
            entries
                .iter()
                .map(|(name, count)| TruckAvailability::new(tt(name), *count))
                .collect(),
        )
        .unwrap()
    }

    mod truck_pool {
        use super::*;

        #[test]
        fn missing_type_has_zero_available() {
            let pool = pool(&[("LARGE", 3)]);
            assert_eq!(pool.available(&tt("SMALL")), 0);
        }

        #[test]
        fn lookup_is_case_insensitive() {
            let pool = pool(&[("Large", 3)]);
            assert_eq!(pool.available(&tt("large")), 3);
        }

        #[test]
        fn duplicate_types_rejected() {
            let result = TruckPool::new(vec![
                TruckAvailability::new(tt("large"), 1),
                TruckAvailability::new(tt("LARGE"), 2),
            ]);
            assert!(matches!(result, Err(DomainError::ValidationError(_))));
        }

        #[test]
        fn reserve_more_than_available_fails_without_change() {
            let mut pool = pool(&[("LARGE", 3)]);
            let result = pool.reserve(&tt("LARGE"), 4);
            assert!(matches!(result, Err(DomainError::InsufficientCapacity(_))));
            assert_eq!(pool.available(&tt("LARGE")), 3);
        }

        #[test]
        fn reserve_missing_type_fails() {
            let mut pool = pool(&[("LARGE", 3)]);
            let result = pool.reserve(&tt("SMALL"), 1);
            assert!(matches!(result, Err(DomainError::InsufficientCapacity(_))));
        }

        #[test]
        fn reserve_exact_count_empties_entry() {
            let mut pool = pool(&[("LARGE", 3)]);
            pool.reserve(&tt("LARGE"), 3).unwrap();
            assert_eq!(pool.available(&tt("LARGE")), 0);
            assert_eq!(pool.entries().len(), 1);
        }

        #[test]
        fn release_recreates_missing_type() {
            let mut pool = pool(&[("LARGE", 3)]);
            pool.release(&tt("small"), 2);
            assert_eq!(pool.available(&tt("SMALL")), 2);
            assert_eq!(pool.entries().len(), 2);
        }

        #[test]
        fn total_sums_entries() {
            assert_eq!(pool(&[("LARGE", 3), ("SMALL", 4)]).total(), 7);
        }
    }

    mod transporter {
        use super::*;

        #[test]
        fn blank_company_name_rejected() {
            let result = Transporter::new("  ", Rating::new(4.0).unwrap(), TruckPool::default());
            assert!(result.is_err());
        }

        #[test]
        fn pool_mutations_bump_version() {
            let mut transporter =
                Transporter::new("Acme", Rating::new(4.0).unwrap(), pool(&[("LARGE", 5)]))
                    .unwrap();
            assert_eq!(transporter.version(), 1);

            transporter.reserve_trucks(&tt("LARGE"), 2).unwrap();
            assert_eq!(transporter.available(&tt("LARGE")), 3);
            assert_eq!(transporter.version(), 2);

            transporter.release_trucks(&tt("LARGE"), 2);
            assert_eq!(transporter.available(&tt("LARGE")), 5);
            assert_eq!(transporter.version(), 3);

            transporter.replace_truck_pool(pool(&[("SMALL", 1)]));
            assert_eq!(transporter.available(&tt("LARGE")), 0);
            assert_eq!(transporter.version(), 4);
        }

        #[test]
        fn failed_reserve_keeps_version() {
            let mut transporter =
                Transporter::new("Acme", Rating::new(4.0).unwrap(), pool(&[("LARGE", 1)]))
                    .unwrap();
            assert!(transporter.reserve_trucks(&tt("LARGE"), 2).is_err());
            assert_eq!(transporter.version(), 1);
        }
    }
}
