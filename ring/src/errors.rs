//! Errors raised by the consistent-hash ring.

use std::error::Error;
use std::fmt;

/// Helper type for a call that could go wrong.
pub type RingResult<T> = Result<T, RingError>;

#[derive(Debug)]
pub enum RingError {
    /// A node with this id is already registered.
    AlreadyPresent(String),
    /// No node with this id is registered.
    NotFound(String),
    /// The ring has no nodes at all, so lookups cannot be answered.
    EmptyRing,
}

impl fmt::Display for RingError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RingError::AlreadyPresent(id) => write!(f, "node '{}' is already registered", id),
            RingError::NotFound(id) => write!(f, "node '{}' is not registered", id),
            RingError::EmptyRing => write!(f, "the ring has no registered nodes"),
        }
    }
}

impl Error for RingError {}
