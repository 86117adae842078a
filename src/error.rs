//! Error types for ndscatter

use crate::dtype::DType;
use thiserror::Error;

/// Result type alias using ndscatter's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors reported by the host-side launch layer
///
/// Kernels themselves have no error channel: everything here is detected
/// before a grid is launched.
#[derive(Error, Debug)]
pub enum Error {
    /// Iteration shape and stride table disagree on the rank
    #[error("Rank mismatch: iteration shape has {shape} dimensions, stride table has {strides}")]
    RankMismatch {
        /// Length of the iteration shape
        shape: usize,
        /// Length of the stride table
        strides: usize,
    },

    /// More indexed dimensions than an index table can hold
    #[error("Too many indices: {count} requested, at most {max} supported")]
    TooManyIndices {
        /// Requested number of indexed dimensions
        count: usize,
        /// Index table capacity
        max: usize,
    },

    /// A per-index table is shorter than the number of indexed dimensions
    #[error("Length mismatch for '{what}': expected at least {expected}, got {got}")]
    LengthMismatch {
        /// Which table is short
        what: &'static str,
        /// Required length
        expected: usize,
        /// Actual length
        got: usize,
    },

    /// An index value outside `[-size, size)`
    #[error("Index {index} out of bounds for indexed dimension {dim} of size {size}")]
    IndexOutOfBounds {
        /// Indexed dimension the value belongs to
        dim: usize,
        /// The offending index value
        index: i64,
        /// Size of the indexed dimension
        size: i64,
    },

    /// Unsupported dtype for an operation
    #[error("Unsupported dtype {dtype:?} for operation '{op}'")]
    UnsupportedDType {
        /// The unsupported dtype
        dtype: DType,
        /// The operation name
        op: &'static str,
    },

    /// No kernel registered under the requested name
    #[error("Unknown kernel '{name}'")]
    UnknownKernel {
        /// The requested kernel name
        name: String,
    },

    /// Invalid argument provided to an operation
    #[error("Invalid argument '{arg}': {reason}")]
    InvalidArgument {
        /// The argument name
        arg: &'static str,
        /// Reason for invalidity
        reason: String,
    },

    /// Execution backend error (thread pool construction and the like)
    #[error("Backend error: {0}")]
    Backend(String),
}

impl Error {
    /// Create an unsupported dtype error
    pub fn unsupported_dtype(dtype: DType, op: &'static str) -> Self {
        Self::UnsupportedDType { dtype, op }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(arg: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            arg,
            reason: reason.into(),
        }
    }

    /// Create a length mismatch error
    pub fn length_mismatch(what: &'static str, expected: usize, got: usize) -> Self {
        Self::LengthMismatch {
            what,
            expected,
            got,
        }
    }
}
