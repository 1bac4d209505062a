//! The request-path error taxonomy for the coordinator.

use std::error::Error;
use std::fmt;

use hyper::StatusCode;
use rpc::RpcError;

#[derive(Debug)]
pub enum ServiceError {
    /// The request body was not valid JSON, or was missing a required field, or
    /// carried a vector with no `id`.
    BadRequest(String),
    /// There are no registered workers at all, so there is nowhere to route a
    /// request.
    NoActiveWorkers,
    /// The ring produced an owning node id, but that id is no longer registered
    /// (it deregistered between the ring lookup and the dispatch).
    NoRouteToAnyWorker,
    /// The single worker that owns this write could not be reached or rejected it.
    WorkerUnreachable(RpcError),
    /// Every worker contacted during a scatter-gather read failed.
    AllWorkersFailed,
}

impl ServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServiceError::NoActiveWorkers => StatusCode::SERVICE_UNAVAILABLE,
            ServiceError::NoRouteToAnyWorker => StatusCode::SERVICE_UNAVAILABLE,
            ServiceError::WorkerUnreachable(_) => StatusCode::BAD_GATEWAY,
            ServiceError::AllWorkersFailed => StatusCode::BAD_GATEWAY,
        }
    }

    pub fn message(&self) -> String {
        match self {
            ServiceError::BadRequest(msg) => msg.clone(),
            ServiceError::NoActiveWorkers => "no workers are registered".to_string(),
            ServiceError::NoRouteToAnyWorker => "the owning worker is no longer registered".to_string(),
            ServiceError::WorkerUnreachable(e) => format!("worker unreachable: {}", e),
            ServiceError::AllWorkersFailed => "every worker failed to answer this request".to_string(),
        }
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl Error for ServiceError {}
