//! JSON request/response bodies exchanged between coordinator and worker, and
//! between an external caller and either of them. Field names match the original
//! service exactly, since they are part of the external contract.

use mtree::vector::SearchResultWire;
use mtree::{TreeMetricsSnapshot, Vector};
use ring_topology::RingStatus;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /insert` (worker) and `POST /insert_vector` (coordinator): the
/// vector to store, in the same shape either way.
pub type InsertRequest = Vector;

/// Body of a k-nearest-neighbor search request, sent to both the worker's
/// `/search/knn` and the coordinator's `/search/knn`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnnRequest {
    pub query_vector: Vector,
    pub k: usize,
}

/// Body of a range search request, sent to both the worker's `/search/range` and the
/// coordinator's `/search/range`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RangeRequest {
    pub query_vector: Vector,
    pub radius: f64,
}

/// Shared success/failure envelope for results returned from a search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub status: String,
    pub results: Vec<SearchResultWire>,
}

impl SearchResponse {
    pub fn ok(results: Vec<SearchResultWire>) -> Self {
        SearchResponse {
            status: "success".to_string(),
            results,
        }
    }
}

/// Generic `{"status": ..., "message": ...}` acknowledgement used by `/insert`,
/// `/register_worker` and `/deregister_worker`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ack {
    pub status: String,
    pub message: String,
}

impl Ack {
    pub fn success(message: impl Into<String>) -> Self {
        Ack {
            status: "success".to_string(),
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Ack {
            status: "error".to_string(),
            message: message.into(),
        }
    }
}

/// A flat `{"error": "..."}` body used for malformed-request responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        ErrorBody { error: error.into() }
    }
}

/// Body of `GET /health` on a worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerHealthResponse {
    pub status: String,
    pub node_id: String,
}

/// Body of `GET /status` on a worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerStatusResponse {
    pub node_id: String,
    pub status: String,
    pub m_tree_size: usize,
    pub m_tree_metrics: TreeMetricsSnapshot,
}

/// Body of `GET /health` on the coordinator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoordinatorHealthResponse {
    pub status: String,
    pub service: String,
}

impl Default for CoordinatorHealthResponse {
    fn default() -> Self {
        CoordinatorHealthResponse {
            status: "healthy".to_string(),
            service: "coordinator".to_string(),
        }
    }
}

/// Body of `GET /status` on the coordinator: the overall system view assembled by
/// scattering `GET /status` across every registered worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemStatusResponse {
    pub orchestrator_status: String,
    pub active_workers_count: usize,
    pub consistent_hasher_status: RingStatus,
    /// Each worker's own `/status` body verbatim, or `{"node_id", "status":
    /// "UNREACHABLE", "error"}` if it could not be reached in time.
    pub worker_details: Vec<Value>,
}

/// Body of `POST /register_worker`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterWorkerRequest {
    pub node_id: String,
    pub node_url: String,
}

/// Body of `POST /deregister_worker`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeregisterWorkerRequest {
    pub node_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_request_serializes_with_wire_field_names() {
        let v = Vector::new("a", vec![1.0, 2.0], Value::Null);
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["id"], "a");
        assert_eq!(json["vector"], serde_json::json!([1.0, 2.0]));
        assert!(json.get("data").is_none());
    }

    #[test]
    fn knn_request_round_trips() {
        let req = KnnRequest {
            query_vector: Vector::new("q", vec![0.0], Value::Null),
            k: 5,
        };
        let json = serde_json::to_string(&req).unwrap();
        let back: KnnRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(back.k, 5);
        assert_eq!(back.query_vector.id, "q");
    }
}
