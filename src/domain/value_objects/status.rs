//! # Lifecycle Statuses
//!
//! State machines for loads, bids and bookings.
//!
//! # Load
//!
//! ```text
//! POSTED ──first bid──► OPEN_FOR_BIDS ──remaining hits 0──► BOOKED
//!   │                      ▲    │                              │
//!   │                      │    │                              │
//!   │                      └────┼──── booking cancelled ───────┘
//!   ▼                           ▼
//! CANCELLED ◄───────────────────┘
//! ```
//!
//! # Bid
//!
//! ```text
//! PENDING → ACCEPTED | REJECTED   (both terminal)
//! ```
//!
//! # Booking
//!
//! ```text
//! CONFIRMED → CANCELLED   (terminal, record retained)
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Load lifecycle status.
///
/// # Examples
///
/// ```
/// use freight_exchange::domain::value_objects::LoadStatus;
///
/// assert!(LoadStatus::Posted.can_transition_to(LoadStatus::OpenForBids));
/// assert!(LoadStatus::Booked.can_transition_to(LoadStatus::OpenForBids));
/// assert!(!LoadStatus::Booked.can_transition_to(LoadStatus::Cancelled));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoadStatus {
    /// Posted, no bids yet.
    #[default]
    Posted,
    /// At least one bid received; still needs trucks.
    OpenForBids,
    /// Every requested truck is allocated.
    Booked,
    /// Withdrawn by the shipper (terminal).
    Cancelled,
}

impl LoadStatus {
    /// Returns true if new bids may be placed.
    #[inline]
    #[must_use]
    pub const fn accepts_bids(&self) -> bool {
        matches!(self, Self::Posted | Self::OpenForBids)
    }

    /// Returns true if bids on the load may still be accepted.
    ///
    /// A `Booked` load qualifies so that the remaining-trucks check, not the
    /// status, decides the outcome.
    #[inline]
    #[must_use]
    pub const fn accepts_bookings(&self) -> bool {
        matches!(self, Self::Posted | Self::OpenForBids | Self::Booked)
    }

    /// Returns true if this is a terminal state.
    #[inline]
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Returns true if this state can transition to the target state.
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Posted, Self::OpenForBids)
                | (Self::Posted, Self::Booked)
                | (Self::Posted, Self::Cancelled)
                | (Self::OpenForBids, Self::Booked)
                | (Self::OpenForBids, Self::Cancelled)
                | (Self::Booked, Self::OpenForBids)
        )
    }
}

impl fmt::Display for LoadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Posted => "POSTED",
            Self::OpenForBids => "OPEN_FOR_BIDS",
            Self::Booked => "BOOKED",
            Self::Cancelled => "CANCELLED",
        };
        write!(f, "{s}")
    }
}

/// Bid lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BidStatus {
    /// Awaiting a decision.
    #[default]
    Pending,
    /// Turned into a booking (terminal).
    Accepted,
    /// Declined by the shipper (terminal).
    Rejected,
}

impl BidStatus {
    /// Returns true if this is a terminal state.
    #[inline]
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Accepted | Self::Rejected)
    }

    /// Returns true if this state can transition to the target state.
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Pending, Self::Accepted) | (Self::Pending, Self::Rejected)
        )
    }
}

impl fmt::Display for BidStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "PENDING",
            Self::Accepted => "ACCEPTED",
            Self::Rejected => "REJECTED",
        };
        write!(f, "{s}")
    }
}

/// Booking lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    /// Trucks are allocated to the load.
    #[default]
    Confirmed,
    /// Allocation released; record kept for audit (terminal).
    Cancelled,
}

impl BookingStatus {
    /// Returns true if this state can transition to the target state.
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!((self, target), (Self::Confirmed, Self::Cancelled))
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Confirmed => write!(f, "CONFIRMED"),
            Self::Cancelled => write!(f, "CANCELLED"),
        }
    }
}
