//! Error types for network construction and state manipulation.

use thiserror::Error;

/// Errors surfaced by geometry generation and network state operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// The sampled wire distribution produced no junctions at all.
    #[error("the wire distribution contains no junctions")]
    EmptyNetwork,

    /// A node index fell outside the current network.
    #[error("node index {index} out of range for a network of {nodes} nodes")]
    InvalidIndex { index: usize, nodes: usize },

    /// Two states with incompatible shapes were combined.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// A physical parameter is outside its valid range.
    #[error("invalid value {value} for parameter `{name}`")]
    InvalidParameter { name: &'static str, value: f64 },
}

pub type Result<T> = std::result::Result<T, Error>;
