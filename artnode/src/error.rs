//! Error types for node operations

use std::fmt;

use thiserror::Error;

/// Result type alias for node operations
pub type Result<T> = std::result::Result<T, NodeError>;

/// Which side of a partial key a neighbour query looked on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Smallest stored key at or above the queried key.
    Next,
    /// Largest stored key at or below the queried key.
    Prev,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Next => f.write_str("at or after"),
            Direction::Prev => f.write_str("at or before"),
        }
    }
}

/// Recoverable failures of the node contract.
///
/// Contract violations (inserting into a full node, duplicate partial keys, transitions outside
/// their capacity band) are caller bugs and panic instead.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeError {
    /// No stored partial key satisfies the ordering; the walker should continue from the parent.
    #[error("no partial key stored {direction} {partial_key:#04x}")]
    NotFound { partial_key: u8, direction: Direction },
}
