//! # Rate Value Object
//!
//! Strictly positive monetary rate offered in a bid and fixed in a booking.
//!
//! Whether a rate is per truck or for the whole offer is a product decision
//! outside this crate; the engine copies the proposed rate into the booking
//! unchanged.

use crate::domain::errors::{DomainError, DomainResult};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A strictly positive rate.
///
/// # Examples
///
/// ```
/// use freight_exchange::domain::value_objects::Rate;
///
/// let rate = Rate::from_f64(1250.5).unwrap();
/// assert!((rate.to_f64() - 1250.5).abs() < f64::EPSILON);
/// assert!(Rate::from_f64(0.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rate(Decimal);

impl Rate {
    /// Creates a rate from a decimal value.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ValidationError` if the value is not positive.
    pub fn new(value: Decimal) -> DomainResult<Self> {
        if value <= Decimal::ZERO {
            return Err(DomainError::validation(format!(
                "rate must be positive, got {value}"
            )));
        }
        Ok(Self(value))
    }

    /// Creates a rate from a floating point value.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ValidationError` if the value is not finite,
    /// cannot be represented as a decimal, or is not positive.
    pub fn from_f64(value: f64) -> DomainResult<Self> {
        if !value.is_finite() {
            return Err(DomainError::validation("rate must be a finite number"));
        }
        let decimal = Decimal::try_from(value)
            .map_err(|e| DomainError::validation(format!("rate out of range: {e}")))?;
        Self::new(decimal)
    }

    /// Returns the decimal value.
    #[inline]
    #[must_use]
    pub fn get(&self) -> Decimal {
        self.0
    }

    /// Returns the value as `f64`, or `0.0` if it cannot be represented.
    #[must_use]
    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or(0.0)
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn positive_rate_is_accepted() {
        let rate = Rate::new(Decimal::new(500, 0)).unwrap();
        assert_eq!(rate.get(), Decimal::new(500, 0));
        assert_eq!(rate.to_string(), "500");
    }

    #[test]
    fn zero_and_negative_are_rejected() {
        assert!(Rate::new(Decimal::ZERO).is_err());
        assert!(Rate::from_f64(-1.0).is_err());
    }

    #[test]
    fn non_finite_is_rejected() {
        assert!(Rate::from_f64(f64::NAN).is_err());
        assert!(Rate::from_f64(f64::INFINITY).is_err());
    }

    #[test]
    fn f64_round_trip_keeps_value() {
        let rate = Rate::from_f64(99.75).unwrap();
        assert!((rate.to_f64() - 99.75).abs() < 1e-12);
    }
}
