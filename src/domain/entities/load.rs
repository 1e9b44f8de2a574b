//! # Load Aggregate Root
//!
//! A shipper's request for a number of trucks between two cities.
//!
//! The load owns its status and its `remaining_trucks` counter. Both change
//! only through the methods on [`Load`], which are driven by the load,
//! bid and booking lifecycles in the application layer.
//!
//! # Examples
//!
//! ```
//! use freight_exchange::domain::entities::load::LoadBuilder;
//! use freight_exchange::domain::value_objects::{
//!     LoadStatus, ShipperId, TruckType, Weight, WeightUnit,
//! };
//!
//! let load = LoadBuilder::new(
//!     ShipperId::new("shipper-1"),
//!     "Pune",
//!     "Delhi",
//!     "Steel coils",
//!     TruckType::new("LARGE").unwrap(),
//!     10,
//!     Weight::new(20.0, WeightUnit::Ton).unwrap(),
//! )
//! .try_build()
//! .unwrap();
//!
//! assert_eq!(load.status(), LoadStatus::Posted);
//! assert_eq!(load.remaining_trucks(), 10);
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{LoadId, LoadStatus, ShipperId, Timestamp, TruckType, Weight};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Load aggregate root.
///
/// # Invariants
///
/// - `0 <= remaining_trucks <= no_of_trucks`
/// - `remaining_trucks == 0` exactly when the load is `Booked`, unless it
///   was cancelled
/// - `Cancelled` is terminal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Load {
    id: LoadId,
    shipper_id: ShipperId,
    loading_city: String,
    unloading_city: String,
    product_type: String,
    truck_type: TruckType,
    no_of_trucks: u32,
    remaining_trucks: u32,
    weight: Weight,
    comment: Option<String>,
    loading_date: Timestamp,
    status: LoadStatus,
    /// Version for optimistic locking.
    version: u64,
    posted_at: Timestamp,
    updated_at: Timestamp,
}

impl Load {
    fn transition_to(&mut self, target: LoadStatus) -> DomainResult<()> {
        if !self.status.can_transition_to(target) {
            return Err(DomainError::invalid_transition("load", self.status, target));
        }
        self.status = target;
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Timestamp::now();
        self.version = self.version.saturating_add(1);
    }

    // ========== Accessors ==========

    /// Returns the load ID.
    #[inline]
    #[must_use]
    pub fn id(&self) -> LoadId {
        self.id
    }

    /// Returns the shipper that posted the load.
    #[inline]
    #[must_use]
    pub fn shipper_id(&self) -> &ShipperId {
        &self.shipper_id
    }

    /// Returns the origin city.
    #[inline]
    #[must_use]
    pub fn loading_city(&self) -> &str {
        &self.loading_city
    }

    /// Returns the destination city.
    #[inline]
    #[must_use]
    pub fn unloading_city(&self) -> &str {
        &self.unloading_city
    }

    /// Returns the product being shipped.
    #[inline]
    #[must_use]
    pub fn product_type(&self) -> &str {
        &self.product_type
    }

    /// Returns the truck type required.
    #[inline]
    #[must_use]
    pub fn truck_type(&self) -> &TruckType {
        &self.truck_type
    }

    /// Returns the total number of trucks requested.
    #[inline]
    #[must_use]
    pub fn no_of_trucks(&self) -> u32 {
        self.no_of_trucks
    }

    /// Returns the trucks not yet allocated.
    #[inline]
    #[must_use]
    pub fn remaining_trucks(&self) -> u32 {
        self.remaining_trucks
    }

    /// Returns the shipment weight.
    #[inline]
    #[must_use]
    pub fn weight(&self) -> Weight {
        self.weight
    }

    /// Returns the free-text comment, if any.
    #[inline]
    #[must_use]
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Returns the planned loading date.
    #[inline]
    #[must_use]
    pub fn loading_date(&self) -> Timestamp {
        self.loading_date
    }

    /// Returns the current status.
    #[inline]
    #[must_use]
    pub fn status(&self) -> LoadStatus {
        self.status
    }

    /// Returns the version for optimistic locking.
    #[inline]
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Returns when the load was posted.
    #[inline]
    #[must_use]
    pub fn posted_at(&self) -> Timestamp {
        self.posted_at
    }

    /// Returns when the load was last modified.
    #[inline]
    #[must_use]
    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// Returns the number of trucks already allocated by confirmed bookings.
    #[inline]
    #[must_use]
    pub fn allocated_trucks(&self) -> u32 {
        self.no_of_trucks.saturating_sub(self.remaining_trucks)
    }

    // ========== State Transitions ==========

    /// Moves a freshly posted load into bidding.
    ///
    /// Transitions: Posted → OpenForBids. Any other status is left alone so
    /// the transition fires once. Returns true if the status changed.
    pub fn mark_open_for_bidding(&mut self) -> bool {
        if self.status != LoadStatus::Posted {
            return false;
        }
        self.status = LoadStatus::OpenForBids;
        self.touch();
        true
    }

    /// Subtracts allocated trucks from the remaining count.
    ///
    /// The count floors at zero; reaching zero books the load. Callers check
    /// `trucks <= remaining_trucks` beforehand.
    pub fn apply_allocation(&mut self, trucks: u32) {
        self.remaining_trucks = self.remaining_trucks.saturating_sub(trucks);
        if self.remaining_trucks == 0 {
            self.status = LoadStatus::Booked;
        }
        self.touch();
    }

    /// Returns released trucks to the remaining count and reports how many
    /// were actually restored.
    ///
    /// A booked load reopens for bidding. The count never exceeds
    /// `no_of_trucks`, so the result is below `trucks` when the release
    /// would overshoot.
    pub fn release_allocation(&mut self, trucks: u32) -> u32 {
        let before = self.remaining_trucks;
        self.remaining_trucks = before.saturating_add(trucks).min(self.no_of_trucks);
        if self.status == LoadStatus::Booked && self.remaining_trucks > 0 {
            self.status = LoadStatus::OpenForBids;
        }
        self.touch();
        self.remaining_trucks.saturating_sub(before)
    }

    /// Cancels the load.
    ///
    /// Transitions: Posted/OpenForBids → Cancelled
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStateTransition` if the load is already
    /// cancelled or fully booked.
    pub fn cancel(&mut self) -> DomainResult<()> {
        self.transition_to(LoadStatus::Cancelled)?;
        self.touch();
        Ok(())
    }
}

impl fmt::Display for Load {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Load({} {}->{} {}/{} {} [{}])",
            self.id,
            self.loading_city,
            self.unloading_city,
            self.remaining_trucks,
            self.no_of_trucks,
            self.truck_type,
            self.status
        )
    }
}

/// Builder for constructing [`Load`] instances.
#[derive(Debug, Clone)]
pub struct LoadBuilder {
    shipper_id: ShipperId,
    loading_city: String,
    unloading_city: String,
    product_type: String,
    truck_type: TruckType,
    no_of_trucks: u32,
    weight: Weight,
    comment: Option<String>,
    loading_date: Option<Timestamp>,
}

impl LoadBuilder {
    /// Creates a new builder with required fields.
    #[must_use]
    pub fn new(
        shipper_id: ShipperId,
        loading_city: impl Into<String>,
        unloading_city: impl Into<String>,
        product_type: impl Into<String>,
        truck_type: TruckType,
        no_of_trucks: u32,
        weight: Weight,
    ) -> Self {
        Self {
            shipper_id,
            loading_city: loading_city.into(),
            unloading_city: unloading_city.into(),
            product_type: product_type.into(),
            truck_type,
            no_of_trucks,
            weight,
            comment: None,
            loading_date: None,
        }
    }

    /// Sets the free-text comment.
    #[must_use]
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Sets the planned loading date. Defaults to one day after posting.
    #[must_use]
    pub fn loading_date(mut self, loading_date: Timestamp) -> Self {
        self.loading_date = Some(loading_date);
        self
    }

    /// Builds the load with validation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ValidationError` if a text field is blank or no
    /// trucks are requested.
    pub fn try_build(self) -> DomainResult<Load> {
        require_text("shipper id", self.shipper_id.as_str())?;
        require_text("loading city", &self.loading_city)?;
        require_text("unloading city", &self.unloading_city)?;
        require_text("product type", &self.product_type)?;
        if self.no_of_trucks == 0 {
            return Err(DomainError::validation(
                "number of trucks must be at least 1",
            ));
        }

        let now = Timestamp::now();
        Ok(Load {
            id: LoadId::new_v4(),
            shipper_id: self.shipper_id,
            loading_city: self.loading_city,
            unloading_city: self.unloading_city,
            product_type: self.product_type,
            truck_type: self.truck_type,
            no_of_trucks: self.no_of_trucks,
            remaining_trucks: self.no_of_trucks,
            weight: self.weight,
            comment: self.comment.filter(|c| !c.trim().is_empty()),
            loading_date: self.loading_date.unwrap_or_else(|| now.add_days(1)),
            status: LoadStatus::Posted,
            version: 1,
            posted_at: now,
            updated_at: now,
        })
    }
}

fn require_text(field: &str, value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{field} is required")));
    }
    Ok(())
}
