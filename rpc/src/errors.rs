//! Errors raised while talking to a peer worker or coordinator over HTTP.

use std::error::Error;
use std::fmt;

use hyper::StatusCode;

/// Helper type for a call that could go wrong.
pub type RpcResult<T> = Result<T, RpcError>;

#[derive(Debug)]
pub enum RpcError {
    /// The request body, or the URI it was sent to, could not be constructed.
    Build(http::Error),
    /// The underlying HTTP transport failed (connection refused, reset, timed out).
    Transport(hyper::Error),
    /// The peer replied but its body was not valid JSON, or not the JSON shape
    /// expected for this call.
    Decode(serde_json::Error),
    /// The peer replied with a status code indicating it rejected or could not
    /// process the request.
    Status(StatusCode),
}

impl fmt::Display for RpcError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RpcError::Build(e) => write!(f, "failed to build request: {}", e),
            RpcError::Transport(e) => write!(f, "transport error: {}", e),
            RpcError::Decode(e) => write!(f, "failed to decode response: {}", e),
            RpcError::Status(code) => write!(f, "peer responded with status {}", code),
        }
    }
}

impl Error for RpcError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            RpcError::Build(e) => Some(e),
            RpcError::Transport(e) => Some(e),
            RpcError::Decode(e) => Some(e),
            RpcError::Status(_) => None,
        }
    }
}

impl From<http::Error> for RpcError {
    fn from(err: http::Error) -> Self {
        RpcError::Build(err)
    }
}

impl From<hyper::Error> for RpcError {
    fn from(err: hyper::Error) -> Self {
        RpcError::Transport(err)
    }
}

impl From<serde_json::Error> for RpcError {
    fn from(err: serde_json::Error) -> Self {
        RpcError::Decode(err)
    }
}
