//! Error types for Harbor core.

use std::{error::Error, fmt};

/// Error type for Harbor core operations.
///
/// Each variant corresponds to exactly one HTTP status in the server layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HarborError {
    /// Missing, malformed, or unrecognized input.
    InvalidArgument(String),
    /// A referenced ship or port does not exist.
    NotFound(String),
    /// The target port has no free berth.
    CapacityExceeded {
        /// Port that rejected the ship.
        port_id: i64,
        /// Configured capacity of that port.
        capacity: i32,
    },
    /// Store failure or inconsistency.
    Internal(String),
}

impl HarborError {
    /// Build a not-found error for a ship id.
    pub fn ship_not_found(id: i64) -> Self {
        Self::NotFound(format!("ship {id} not found"))
    }

    /// Build a not-found error for a port id.
    pub fn port_not_found(id: i64) -> Self {
        Self::NotFound(format!("port {id} not found"))
    }
}

impl fmt::Display for HarborError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument(message) => write!(f, "invalid argument: {message}"),
            Self::NotFound(message) => write!(f, "{message}"),
            Self::CapacityExceeded { port_id, capacity } => {
                write!(f, "port {port_id} is at capacity ({capacity})")
            }
            Self::Internal(message) => write!(f, "internal error: {message}"),
        }
    }
}

impl Error for HarborError {}

/// Convenience result type for Harbor core.
pub type Result<T> = std::result::Result<T, HarborError>;
