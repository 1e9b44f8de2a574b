//! # Rating Value Object
//!
//! Transporter reputation on a 0.0 to 5.0 scale.

use crate::domain::errors::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Transporter rating between [`Rating::MIN`] and [`Rating::MAX`] inclusive.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rating(f64);

impl Rating {
    /// Lowest rating.
    pub const MIN: f64 = 0.0;
    /// Highest rating.
    pub const MAX: f64 = 5.0;

    /// Creates a rating.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ValidationError` if the value is not finite or
    /// lies outside `0.0..=5.0`.
    pub fn new(value: f64) -> DomainResult<Self> {
        if !value.is_finite() || !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(DomainError::validation(format!(
                "rating must be between {} and {}, got {value}",
                Self::MIN,
                Self::MAX
            )));
        }
        Ok(Self(value))
    }

    /// Returns the raw value.
    #[inline]
    #[must_use]
    pub fn get(&self) -> f64 {
        self.0
    }

    /// Returns the rating scaled to `0.0..=1.0`.
    #[inline]
    #[must_use]
    pub fn normalized(&self) -> f64 {
        self.0 / Self::MAX
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}
