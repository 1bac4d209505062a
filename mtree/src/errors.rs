//! The errors that can occur while building or querying a metric tree.

use std::error::Error;
use std::fmt;

/// Helper type for a call that could go wrong.
pub type MTreeResult<T> = Result<T, MTreeError>;

/// Error type for the `mtree` crate.
#[derive(Debug)]
pub enum MTreeError {
    /// A vector was inserted, or used as a query, whose dimensionality does not match
    /// the dimensionality fixed by the first vector ever inserted into the tree.
    DimensionMismatch {
        /// Dimensionality the tree was built with.
        expected: usize,
        /// Dimensionality of the offending vector.
        got: usize,
    },
    /// An argument supplied to a tree operation is not valid, e.g. a `k` of zero in a
    /// k-nearest-neighbor query or a negative search radius.
    InvalidArgument(String),
}

impl fmt::Display for MTreeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MTreeError::DimensionMismatch { expected, got } => write!(
                f,
                "dimension mismatch: tree expects vectors of length {}, got {}",
                expected, got
            ),
            MTreeError::InvalidArgument(ref msg) => write!(f, "invalid argument: {}", msg),
        }
    }
}

impl Error for MTreeError {}
