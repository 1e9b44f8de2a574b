//! # Persistence Layer
//!
//! Repository ports and their in-memory implementation.
//!
//! ## Repository Traits (Ports)
//!
//! - [`LoadRepository`], [`TransporterRepository`], [`BidRepository`],
//!   [`BookingRepository`]: per-aggregate reads
//! - [`FreightStore`]: all reads plus atomic [`ChangeSet`] commit
//!
//! ## Implementations
//!
//! - `in_memory`: single-lock store with optimistic version checks

pub mod change_set;
pub mod in_memory;
pub mod traits;

pub use change_set::{ChangeSet, Staged};
pub use in_memory::InMemoryFreightStore;
pub use traits::{
    BidFilter, BidRepository, BookingRepository, FreightStore, LoadFilter, LoadRepository, Page,
    PageRequest, RepositoryError, RepositoryResult, TransporterRepository,
};
