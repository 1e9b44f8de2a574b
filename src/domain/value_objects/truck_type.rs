//! # Truck Type
//!
//! Free-form truck category matched case-insensitively.
//!
//! Loads name the truck type they need and transporters keep one pool
//! entry per type. Matching must ignore case, so the value is normalised to
//! upper case on construction and compared by value afterwards.
//!
//! # Examples
//!
//! ```
//! use freight_exchange::domain::value_objects::TruckType;
//!
//! let a = TruckType::new("Large").unwrap();
//! let b = TruckType::new(" LARGE ").unwrap();
//! assert_eq!(a, b);
//! assert_eq!(a.as_str(), "LARGE");
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// A normalised truck type such as `LARGE` or `FLATBED`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct TruckType(String);

impl TruckType {
    /// Creates a truck type, trimming and upper-casing the input.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ValidationError` if the value is blank.
    pub fn new(value: impl AsRef<str>) -> DomainResult<Self> {
        let normalised = value.as_ref().trim().to_uppercase();
        if normalised.is_empty() {
            return Err(DomainError::validation("truck type must not be blank"));
        }
        Ok(Self(normalised))
    }

    /// Returns the normalised value.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TruckType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TruckType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl<'de> Deserialize<'de> for TruckType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}
