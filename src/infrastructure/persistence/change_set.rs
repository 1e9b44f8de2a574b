//! # Change Sets
//!
//! Writes staged by a unit of work, handed to the store in one piece.

use crate::domain::entities::{Bid, Booking, Load, Transporter};

/// A single staged write.
#[derive(Debug, Clone, PartialEq)]
pub enum Staged<T> {
    /// A record that must not exist yet.
    Insert(T),
    /// A record whose stored version must still equal `expected_version`.
    Update {
        /// Version observed when the record was read.
        expected_version: u64,
        /// New state of the record.
        record: T,
    },
    /// A record read but not changed whose stored version must still equal
    /// `expected_version`. Nothing is written.
    Check {
        /// Version observed when the record was read.
        expected_version: u64,
        /// The record as read.
        record: T,
    },
}

impl<T> Staged<T> {
    /// Returns the record to write, or `None` for a version check.
    #[must_use]
    pub fn into_write(self) -> Option<T> {
        match self {
            Self::Insert(record) | Self::Update { record, .. } => Some(record),
            Self::Check { .. } => None,
        }
    }

    /// Returns true if this entry writes a record.
    #[must_use]
    pub fn is_write(&self) -> bool {
        !matches!(self, Self::Check { .. })
    }
}

/// Every write of one operation, across all aggregates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeSet {
    /// Load writes.
    pub loads: Vec<Staged<Load>>,
    /// Transporter writes.
    pub transporters: Vec<Staged<Transporter>>,
    /// Bid writes.
    pub bids: Vec<Staged<Bid>>,
    /// Booking writes.
    pub bookings: Vec<Staged<Booking>>,
}

impl ChangeSet {
    /// Returns true if nothing is staged, checks included.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.loads.is_empty()
            && self.transporters.is_empty()
            && self.bids.is_empty()
            && self.bookings.is_empty()
    }

    /// Returns the number of staged entries, checks included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.loads.len() + self.transporters.len() + self.bids.len() + self.bookings.len()
    }

    /// Returns the number of entries that write a record.
    #[must_use]
    pub fn writes(&self) -> usize {
        fn count<T>(entries: &[Staged<T>]) -> usize {
            entries.iter().filter(|e| e.is_write()).count()
        }
        count(&self.loads) + count(&self.transporters) + count(&self.bids) + count(&self.bookings)
    }
}
