//! The request-path error taxonomy: every way a worker can fail to satisfy an HTTP
//! request, each tagged with the status code it maps to.

use std::error::Error;
use std::fmt;

use hyper::StatusCode;
use mtree::MTreeError;

#[derive(Debug)]
pub enum ServiceError {
    /// The request body was not valid JSON, or was missing a required field.
    BadRequest(String),
    /// The body parsed but was rejected by the tree itself (wrong dimensionality,
    /// `k` of zero, negative radius).
    InvalidQuery(MTreeError),
}

impl ServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServiceError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
        }
    }

    pub fn message(&self) -> String {
        match self {
            ServiceError::BadRequest(msg) => msg.clone(),
            ServiceError::InvalidQuery(e) => e.to_string(),
        }
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl Error for ServiceError {}

impl From<MTreeError> for ServiceError {
    fn from(err: MTreeError) -> Self {
        ServiceError::InvalidQuery(err)
    }
}
