//! # Weight Value Object
//!
//! Shipment weight with its unit.

use crate::domain::errors::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unit a load's weight is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WeightUnit {
    /// Kilograms.
    Kg,
    /// Metric tonnes.
    Ton,
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Kg => write!(f, "KG"),
            Self::Ton => write!(f, "TON"),
        }
    }
}

/// Positive weight in a given unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weight {
    value: f64,
    unit: WeightUnit,
}

impl Weight {
    /// Creates a weight.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ValidationError` if the value is not a positive
    /// finite number.
    pub fn new(value: f64, unit: WeightUnit) -> DomainResult<Self> {
        if !value.is_finite() || value <= 0.0 {
            return Err(DomainError::validation(format!(
                "weight must be positive, got {value}"
            )));
        }
        Ok(Self { value, unit })
    }

    /// Returns the numeric value.
    #[inline]
    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Returns the unit.
    #[inline]
    #[must_use]
    pub fn unit(&self) -> WeightUnit {
        self.unit
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.unit)
    }
}
