//! # Application Errors
//!
//! Error types for the application layer.
//!
//! Every failure a use case can report falls into one [`ErrorKind`]. Callers
//! branch on [`ApplicationError::kind`], never on the variant that carried
//! the error up.
//!
//! # Error Hierarchy
//!
//! ```text
//! ApplicationError
//! ├── Domain(DomainError)          - entity invariants and state machines
//! ├── Repository(RepositoryError)  - persistence failures and version conflicts
//! ├── NotFound                     - referenced record does not exist
//! ├── InvalidTransition(String)    - operation illegal in the current state
//! ├── InsufficientCapacity(String) - not enough trucks
//! ├── Validation(String)           - malformed input
//! └── Internal(String)             - anything else
//! ```
//!
//! # Examples
//!
//! ```
//! use freight_exchange::application::error::{ApplicationError, ErrorKind};
//!
//! let err = ApplicationError::not_found("Load", "load-123");
//! assert_eq!(err.kind(), ErrorKind::NotFound);
//!
//! let err = ApplicationError::invalid_transition("Load is already fully booked");
//! assert_eq!(err.kind(), ErrorKind::InvalidTransition);
//! ```

use crate::domain::errors::DomainError;
use crate::infrastructure::persistence::RepositoryError;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Closed set of failure categories exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// A referenced load, transporter, bid or booking does not exist.
    NotFound,
    /// The operation is not legal in the entity's current state.
    InvalidTransition,
    /// Requested trucks exceed a pool or a load's remaining capacity.
    InsufficientCapacity,
    /// A record changed concurrently; refresh and retry.
    Conflict,
    /// Input rejected before reaching the core rules.
    Validation,
    /// Internal fault.
    Unexpected,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NotFound => "NOT_FOUND",
            Self::InvalidTransition => "INVALID_TRANSITION",
            Self::InsufficientCapacity => "INSUFFICIENT_CAPACITY",
            Self::Conflict => "CONFLICT",
            Self::Validation => "VALIDATION",
            Self::Unexpected => "UNEXPECTED",
        };
        write!(f, "{s}")
    }
}

/// Application layer error.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain rule violation.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Persistence failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// Resource not found.
    #[error("{resource_type} not found with id: {id}")]
    NotFound {
        /// Type of resource.
        resource_type: &'static str,
        /// Resource identifier.
        id: String,
    },

    /// Operation not legal in the current state.
    #[error("{0}")]
    InvalidTransition(String),

    /// Not enough trucks.
    #[error("{0}")]
    InsufficientCapacity(String),

    /// Request validation failed.
    #[error("validation error: {0}")]
    Validation(String),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Creates a not found error.
    #[must_use]
    pub fn not_found(resource_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource_type,
            id: id.to_string(),
        }
    }

    /// Creates an invalid transition error.
    #[must_use]
    pub fn invalid_transition(message: impl Into<String>) -> Self {
        Self::InvalidTransition(message.into())
    }

    /// Creates an insufficient capacity error.
    #[must_use]
    pub fn insufficient_capacity(message: impl Into<String>) -> Self {
        Self::InsufficientCapacity(message.into())
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Returns the category of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(err) => match err {
                DomainError::InvalidStateTransition { .. } | DomainError::InvalidOperation(_) => {
                    ErrorKind::InvalidTransition
                }
                DomainError::InsufficientCapacity(_) => ErrorKind::InsufficientCapacity,
                DomainError::ValidationError(_) => ErrorKind::Validation,
            },
            Self::Repository(err) => match err {
                RepositoryError::NotFound { .. } => ErrorKind::NotFound,
                RepositoryError::VersionConflict { .. } => ErrorKind::Conflict,
                RepositoryError::Duplicate { .. } | RepositoryError::Internal(_) => {
                    ErrorKind::Unexpected
                }
            },
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::InvalidTransition(_) => ErrorKind::InvalidTransition,
            Self::InsufficientCapacity(_) => ErrorKind::InsufficientCapacity,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Internal(_) => ErrorKind::Unexpected,
        }
    }

    /// Returns true if this is a not found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    /// Returns true if the caller should refresh and retry.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        self.kind() == ErrorKind::Conflict
    }

    /// Returns true if this is a validation error.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }
}

/// Result type for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
