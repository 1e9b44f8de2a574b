//! # In-Memory Persistence
//!
//! [`InMemoryFreightStore`] backs the server and the test suites without a
//! database.
//!
//! ## Thread Safety
//!
//! The store keeps every table behind one `Arc<RwLock<..>>`, so commits are
//! serialised and reads never see a partial commit.

pub mod store;

pub use store::InMemoryFreightStore;
