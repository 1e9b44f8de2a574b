//! # Repository Traits
//!
//! Port definitions for persistence abstraction.
//!
//! Reads go through one trait per aggregate. Writes never go through those
//! traits: the application layer stages them in a unit of work and hands the
//! resulting [`ChangeSet`] to [`FreightStore::commit`], which applies every
//! write or none.
//!
//! # Available Repositories
//!
//! - [`LoadRepository`]: loads, with filtered and paged listing
//! - [`TransporterRepository`]: transporters and their truck pools
//! - [`BidRepository`]: bids, filtered by load, transporter or status
//! - [`BookingRepository`]: bookings by load or transporter
//! - [`FreightStore`]: all of the above plus atomic commit
//!
//! # Examples
//!
//! ```ignore
//! use freight_exchange::infrastructure::persistence::traits::{LoadFilter, LoadRepository, PageRequest};
//!
//! async fn open_loads(repo: &impl LoadRepository) {
//!     let filter = LoadFilter::default().with_status(LoadStatus::OpenForBids);
//!     let page = repo.find_loads(&filter, PageRequest::new(0, 20)).await.unwrap();
//!     println!("{} of {} open loads", page.items.len(), page.total_elements);
//! }
//! ```

use crate::domain::entities::{Bid, Booking, Load, Transporter};
use crate::domain::value_objects::{
    BidId, BidStatus, BookingId, LoadId, LoadStatus, ShipperId, TransporterId,
};
use crate::infrastructure::persistence::change_set::ChangeSet;
use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Error type for repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Entity not found.
    #[error("{entity_type} not found: {id}")]
    NotFound {
        /// Type of entity.
        entity_type: &'static str,
        /// Entity identifier.
        id: String,
    },

    /// Duplicate entity.
    #[error("{entity_type} {id} already exists")]
    Duplicate {
        /// Type of entity.
        entity_type: &'static str,
        /// Entity identifier.
        id: String,
    },

    /// Optimistic locking conflict.
    #[error("Version conflict on {entity_type} {id}: read version {expected}, stored version {actual}")]
    VersionConflict {
        /// Type of entity.
        entity_type: &'static str,
        /// Entity identifier.
        id: String,
        /// Expected version.
        expected: u64,
        /// Actual version.
        actual: u64,
    },

    /// Internal error.
    #[error("Internal storage error: {0}")]
    Internal(String),
}

impl RepositoryError {
    /// Creates a not found error.
    #[must_use]
    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }

    /// Creates a duplicate error.
    #[must_use]
    pub fn duplicate(entity_type: &'static str, id: impl ToString) -> Self {
        Self::Duplicate {
            entity_type,
            id: id.to_string(),
        }
    }

    /// Creates a version conflict error.
    #[must_use]
    pub fn version_conflict(
        entity_type: &'static str,
        id: impl ToString,
        expected: u64,
        actual: u64,
    ) -> Self {
        Self::VersionConflict {
            entity_type,
            id: id.to_string(),
            expected,
            actual,
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns true if this is a not found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true if this is a duplicate error.
    #[must_use]
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate { .. })
    }

    /// Returns true if this is a version conflict error.
    #[must_use]
    pub fn is_version_conflict(&self) -> bool {
        matches!(self, Self::VersionConflict { .. })
    }
}

/// Result type for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Zero-based page selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Page index, starting at 0.
    pub page: u32,
    /// Items per page, at least 1.
    pub size: u32,
}

impl PageRequest {
    /// Creates a page request. A size of 0 is raised to 1.
    #[must_use]
    pub fn new(page: u32, size: u32) -> Self {
        Self {
            page,
            size: size.max(1),
        }
    }

    /// Returns the number of items to skip.
    #[must_use]
    pub fn offset(&self) -> usize {
        (self.page as usize).saturating_mul(self.size as usize)
    }
}

/// One page of results plus totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// Page index.
    pub page: u32,
    /// Requested page size.
    pub size: u32,
    /// Matching items across all pages.
    pub total_elements: u64,
    /// Number of pages.
    pub total_pages: u64,
}

impl<T> Page<T> {
    /// Slices `all` according to `request`.
    #[must_use]
    pub fn from_all(all: Vec<T>, request: PageRequest) -> Self {
        let total_elements = all.len() as u64;
        let total_pages = total_elements.div_ceil(u64::from(request.size));
        let items = all
            .into_iter()
            .skip(request.offset())
            .take(request.size as usize)
            .collect();
        Self {
            items,
            page: request.page,
            size: request.size,
            total_elements,
            total_pages,
        }
    }

    /// Converts the items, keeping the paging metadata.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
        }
    }
}

/// Filter for listing loads. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadFilter {
    /// Only loads posted by this shipper.
    pub shipper_id: Option<ShipperId>,
    /// Only loads in this status.
    pub status: Option<LoadStatus>,
}

impl LoadFilter {
    /// Restricts to one shipper.
    #[must_use]
    pub fn with_shipper(mut self, shipper_id: ShipperId) -> Self {
        self.shipper_id = Some(shipper_id);
        self
    }

    /// Restricts to one status.
    #[must_use]
    pub fn with_status(mut self, status: LoadStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Returns true if the load passes the filter.
    #[must_use]
    pub fn matches(&self, load: &Load) -> bool {
        self.shipper_id
            .as_ref()
            .is_none_or(|shipper| load.shipper_id() == shipper)
            && self.status.is_none_or(|status| load.status() == status)
    }
}

/// Filter for listing bids. Unset fields match everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BidFilter {
    /// Only bids on this load.
    pub load_id: Option<LoadId>,
    /// Only bids from this transporter.
    pub transporter_id: Option<TransporterId>,
    /// Only bids in this status.
    pub status: Option<BidStatus>,
}

impl BidFilter {
    /// Filter for every bid on a load.
    #[must_use]
    pub fn for_load(load_id: LoadId) -> Self {
        Self {
            load_id: Some(load_id),
            ..Self::default()
        }
    }

    /// Returns true if the bid passes the filter.
    #[must_use]
    pub fn matches(&self, bid: &Bid) -> bool {
        self.load_id.is_none_or(|id| bid.load_id() == id)
            && self.transporter_id.is_none_or(|id| bid.transporter_id() == id)
            && self.status.is_none_or(|status| bid.status() == status)
    }
}

/// Read access to loads.
#[async_trait]
pub trait LoadRepository: Send + Sync + fmt::Debug {
    /// Gets a load by ID.
    ///
    /// Returns `None` if the load does not exist.
    async fn get_load(&self, id: &LoadId) -> RepositoryResult<Option<Load>>;

    /// Finds loads matching the filter, oldest first, one page at a time.
    async fn find_loads(
        &self,
        filter: &LoadFilter,
        page: PageRequest,
    ) -> RepositoryResult<Page<Load>>;
}

/// Read access to transporters.
#[async_trait]
pub trait TransporterRepository: Send + Sync + fmt::Debug {
    /// Gets a transporter by ID.
    ///
    /// Returns `None` if the transporter does not exist.
    async fn get_transporter(&self, id: &TransporterId) -> RepositoryResult<Option<Transporter>>;

    /// Lists all transporters in registration order.
    async fn list_transporters(&self) -> RepositoryResult<Vec<Transporter>>;
}

/// Read access to bids.
#[async_trait]
pub trait BidRepository: Send + Sync + fmt::Debug {
    /// Gets a bid by ID.
    ///
    /// Returns `None` if the bid does not exist.
    async fn get_bid(&self, id: &BidId) -> RepositoryResult<Option<Bid>>;

    /// Finds bids matching the filter in submission order.
    async fn find_bids(&self, filter: &BidFilter) -> RepositoryResult<Vec<Bid>>;
}

/// Read access to bookings.
#[async_trait]
pub trait BookingRepository: Send + Sync + fmt::Debug {
    /// Gets a booking by ID.
    ///
    /// Returns `None` if the booking does not exist.
    async fn get_booking(&self, id: &BookingId) -> RepositoryResult<Option<Booking>>;

    /// Finds every booking on a load, cancelled ones included.
    async fn find_bookings_by_load(&self, load_id: &LoadId) -> RepositoryResult<Vec<Booking>>;

    /// Finds every booking held by a transporter, cancelled ones included.
    async fn find_bookings_by_transporter(
        &self,
        transporter_id: &TransporterId,
    ) -> RepositoryResult<Vec<Booking>>;
}

/// Complete persistence port for the freight exchange.
#[async_trait]
pub trait FreightStore:
    LoadRepository + TransporterRepository + BidRepository + BookingRepository
{
    /// Applies a change set atomically.
    ///
    /// Every staged insert must be new and every staged update or check must
    /// match the stored version. Checks write nothing. If any check fails
    /// nothing is written.
    ///
    /// # Errors
    ///
    /// - `RepositoryError::Duplicate` if an inserted record already exists
    /// - `RepositoryError::NotFound` if an updated or checked record is missing
    /// - `RepositoryError::VersionConflict` if a record changed since it was read
    async fn commit(&self, changes: ChangeSet) -> RepositoryResult<()>;
}
