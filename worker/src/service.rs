//! The worker's in-process state: one M-Tree behind a reader-writer lock, shared by
//! every connection the HTTP server accepts.

use std::sync::Arc;
use std::time::Duration;

use hyper::client::HttpConnector;
use hyper::Client;
use log::{info, warn};
use mtree::{MTree, MTreeResult, SearchResult, Vector};
use rpc::{post_json, Ack, RegisterWorkerRequest};
use tokio::sync::RwLock;

use crate::config::Config;

/// Shared worker state. Cheap to clone: everything of substance lives behind the
/// `Arc`, so each connection handler gets its own handle to the same tree.
#[derive(Clone)]
pub struct WorkerService {
    pub node_id: String,
    tree: Arc<RwLock<MTree>>,
}

impl WorkerService {
    pub fn new(config: &Config) -> Self {
        let tree = MTree::with_fanout(config.distance_metric, config.max_children, config.min_children);
        WorkerService {
            node_id: config.node_id.clone(),
            tree: Arc::new(RwLock::new(tree)),
        }
    }

    /// Inserting needs exclusive access: the tree may grow, split nodes, and bump
    /// its metric counters.
    pub async fn insert(&self, vector: Vector) -> MTreeResult<()> {
        let mut tree = self.tree.write().await;
        tree.insert(vector)
    }

    /// Reads take a shared lock, so concurrent k-NN and range queries never block
    /// each other, only a concurrent insert.
    pub async fn knn(&self, query: &[f64], k: usize) -> MTreeResult<Vec<SearchResult>> {
        let tree = self.tree.read().await;
        tree.knn(query, k)
    }

    pub async fn range(&self, query: &[f64], radius: f64) -> MTreeResult<Vec<SearchResult>> {
        let tree = self.tree.read().await;
        tree.range(query, radius)
    }

    pub async fn status(&self) -> WorkerStatus {
        let tree = self.tree.read().await;
        WorkerStatus {
            node_id: self.node_id.clone(),
            size: tree.len(),
            metrics: tree.metrics().snapshot(),
        }
    }
}

pub struct WorkerStatus {
    pub node_id: String,
    pub size: usize,
    pub metrics: mtree::TreeMetricsSnapshot,
}

/// Best-effort self-registration against the coordinator named by `ORCHESTRATOR_URL`.
/// Failure is logged and swallowed: the worker still serves reads and writes
/// directly, it just won't receive routed traffic from that coordinator until
/// someone registers it (or it retries and succeeds on a future deploy).
pub async fn self_register(config: &Config) {
    let orchestrator_url = match &config.orchestrator_url {
        Some(url) => url,
        None => return,
    };
    let client: Client<HttpConnector> = Client::new();
    let request = RegisterWorkerRequest {
        node_id: config.node_id.clone(),
        node_url: config.advertise_url.clone(),
    };
    let url = format!("{}/register_worker", orchestrator_url.trim_end_matches('/'));
    match post_json::<_, Ack>(&client, &url, &request, Duration::from_millis(2_000)).await {
        Ok(ack) => info!("registered with orchestrator at {}: {}", orchestrator_url, ack.message),
        Err(e) => warn!(
            "could not self-register with orchestrator at {}: {} (continuing unregistered)",
            orchestrator_url, e
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn test_config() -> Config {
        Config {
            node_id: "worker-test".to_string(),
            host: "127.0.0.1".to_string(),
            port: 0,
            advertise_url: "http://127.0.0.1:0".to_string(),
            orchestrator_url: None,
            rpc_timeout: Duration::from_millis(100),
            distance_metric: mtree::DistanceMetric::Euclidean,
            max_children: 8,
            min_children: 3,
        }
    }

    #[tokio::test]
    async fn insert_then_knn_finds_it() {
        let service = WorkerService::new(&test_config());
        service
            .insert(Vector::new("a", vec![1.0, 1.0], Value::Null))
            .await
            .unwrap();
        let results = service.knn(&[1.0, 1.0], 1).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].vector.id, "a");
    }

    #[tokio::test]
    async fn status_reports_node_id_and_size() {
        let service = WorkerService::new(&test_config());
        service
            .insert(Vector::new("a", vec![0.0], Value::Null))
            .await
            .unwrap();
        let status = service.status().await;
        assert_eq!(status.node_id, "worker-test");
        assert_eq!(status.size, 1);
        assert_eq!(status.metrics.inserts, 1);
    }
}
