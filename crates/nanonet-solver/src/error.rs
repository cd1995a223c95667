//! Solver error types.

use thiserror::Error;

/// Errors surfaced by the linear and nodal solvers.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// The assembled system is not invertible, typically because an input
    /// node has no conductive path to any ground.
    #[error("singular system: an input node may be isolated from every ground")]
    SingularMatrix,

    /// Operands with incompatible shapes were combined.
    #[error("dimension mismatch: expected {expected}, actual {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// An input references a ground node or an index outside the network.
    #[error("input node {index} is not a stimulable node ({limit} non-ground nodes)")]
    InvalidIndex { index: usize, limit: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
