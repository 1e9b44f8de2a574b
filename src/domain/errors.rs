//! # Domain Errors
//!
//! Errors raised by entity invariants and state machines.
//!
//! Domain errors never carry persistence or transport detail. The
//! application layer folds them into [`ApplicationError`] kinds.
//!
//! [`ApplicationError`]: crate::application::error::ApplicationError

use thiserror::Error;

/// Error raised when a domain rule is violated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// A status change that the entity's state machine does not allow.
    #[error("invalid {entity} transition: {from} -> {to}")]
    InvalidStateTransition {
        /// Entity kind ("load", "bid", "booking").
        entity: &'static str,
        /// Current status.
        from: String,
        /// Requested status.
        to: String,
    },

    /// An operation that is not legal in the entity's current state.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    /// Requested trucks exceed a pool or a load's remaining capacity.
    #[error("insufficient capacity: {0}")]
    InsufficientCapacity(String),

    /// Malformed input rejected by a constructor.
    #[error("validation error: {0}")]
    ValidationError(String),
}

impl DomainError {
    /// Creates an invalid state transition error.
    #[must_use]
    pub fn invalid_transition(
        entity: &'static str,
        from: impl ToString,
        to: impl ToString,
    ) -> Self {
        Self::InvalidStateTransition {
            entity,
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    /// Creates an insufficient capacity error.
    #[must_use]
    pub fn insufficient_capacity(message: impl Into<String>) -> Self {
        Self::InsufficientCapacity(message.into())
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    /// Returns true if the error rejects a state change.
    #[must_use]
    pub fn is_invalid_transition(&self) -> bool {
        matches!(
            self,
            Self::InvalidStateTransition { .. } | Self::InvalidOperation(_)
        )
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
