//! The coordinator's routing logic: single-owner writes, scatter-gather reads.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use hyper::client::HttpConnector;
use hyper::Client;
use log::warn;
use mtree::vector::SearchResultWire;
use mtree::Vector;
use rpc::{
    get_json, post_json, Ack, KnnRequest, RangeRequest, SearchResponse, SystemStatusResponse, WorkerStatusResponse,
};
use serde_json::json;

use crate::config::Config;
use crate::errors::ServiceError;
use crate::registry::WorkerRegistry;

#[derive(Clone)]
pub struct CoordinatorService {
    registry: Arc<WorkerRegistry>,
    client: Client<HttpConnector>,
    worker_rpc_timeout: Duration,
    status_rpc_timeout: Duration,
}

impl CoordinatorService {
    pub fn new(config: &Config) -> Self {
        CoordinatorService {
            registry: Arc::new(WorkerRegistry::new(config.ring_replicas)),
            client: Client::new(),
            worker_rpc_timeout: config.worker_rpc_timeout,
            status_rpc_timeout: config.status_rpc_timeout,
        }
    }

    pub fn registry(&self) -> &WorkerRegistry {
        &self.registry
    }

    /// Routes a vector to the single worker that owns its id and forwards the
    /// insert. Unlike a read, a write is never fanned out: consistent hashing's job
    /// is precisely to give every key one owner.
    pub async fn insert_vector(&self, vector: Vector) -> Result<(), ServiceError> {
        if self.registry.len() == 0 {
            return Err(ServiceError::NoActiveWorkers);
        }
        let (_, url) = self
            .registry
            .route(&vector.id)
            .ok_or(ServiceError::NoRouteToAnyWorker)?;
        let endpoint = format!("{}/insert", url.trim_end_matches('/'));
        post_json::<_, Ack>(&self.client, &endpoint, &vector, self.worker_rpc_timeout)
            .await
            .map(|_| ())
            .map_err(ServiceError::WorkerUnreachable)
    }

    /// Scatter-gathers a k-NN query across every registered worker, merges their
    /// local top-k lists by distance, and truncates to the global top-k.
    pub async fn knn_search(&self, query: Vector, k: usize) -> Result<Vec<SearchResultWire>, ServiceError> {
        let workers = self.registry.snapshot();
        if workers.is_empty() {
            return Err(ServiceError::NoActiveWorkers);
        }
        let request = KnnRequest { query_vector: query, k };
        let timeout = self.worker_rpc_timeout;
        let client = self.client.clone();
        let calls = workers.into_iter().map(|(node_id, url)| {
            let request = request.clone();
            let client = client.clone();
            async move {
                let endpoint = format!("{}/search/knn", url.trim_end_matches('/'));
                match post_json::<_, SearchResponse>(&client, &endpoint, &request, timeout).await {
                    Ok(resp) => Some(resp.results),
                    Err(e) => {
                        warn!("k-NN fan-out to worker '{}' at {} failed: {}", node_id, url, e);
                        None
                    }
                }
            }
        });

        let per_worker: Vec<Option<Vec<SearchResultWire>>> = join_all(calls).await;
        if per_worker.iter().all(Option::is_none) {
            return Err(ServiceError::AllWorkersFailed);
        }
        let mut merged: Vec<SearchResultWire> = per_worker.into_iter().flatten().flatten().collect();
        merged.sort_by(|a, b| a.distance.partial_cmp(&b.distance).unwrap());
        merged.truncate(k);
        Ok(merged)
    }

    /// Scatter-gathers a range query across every registered worker and merges the
    /// results, deduplicating by vector id in case overlapping shards ever return
    /// the same vector twice.
    pub async fn range_search(&self, query: Vector, radius: f64) -> Result<Vec<SearchResultWire>, ServiceError> {
        let workers = self.registry.snapshot();
        if workers.is_empty() {
            return Err(ServiceError::NoActiveWorkers);
        }
        let request = RangeRequest { query_vector: query, radius };
        let timeout = self.worker_rpc_timeout;
        let client = self.client.clone();
        let calls = workers.into_iter().map(|(node_id, url)| {
            let request = request.clone();
            let client = client.clone();
            async move {
                let endpoint = format!("{}/search/range", url.trim_end_matches('/'));
                match post_json::<_, SearchResponse>(&client, &endpoint, &request, timeout).await {
                    Ok(resp) => Some(resp.results),
                    Err(e) => {
                        warn!("range fan-out to worker '{}' at {} failed: {}", node_id, url, e);
                        None
                    }
                }
            }
        });

        let per_worker: Vec<Option<Vec<SearchResultWire>>> = join_all(calls).await;
        if per_worker.iter().all(Option::is_none) {
            return Err(ServiceError::AllWorkersFailed);
        }
        let mut seen = std::collections::HashSet::new();
        let mut merged = Vec::new();
        for result in per_worker.into_iter().flatten().flatten() {
            if seen.insert(result.vector_id.clone()) {
                merged.push(result);
            }
        }
        merged.sort_by(|a, b| a.distance.partial_cmp(&b.distance).unwrap());
        Ok(merged)
    }

    /// Assembles a system-wide status view by querying every registered worker's
    /// own `/status`. A worker that does not answer in time is reported as
    /// unreachable rather than failing the whole call.
    pub async fn system_status(&self) -> SystemStatusResponse {
        let workers = self.registry.snapshot();
        let timeout = self.status_rpc_timeout;
        let client = self.client.clone();
        let calls = workers.into_iter().map(|(node_id, url)| {
            let client = client.clone();
            async move {
                let endpoint = format!("{}/status", url.trim_end_matches('/'));
                match get_json::<WorkerStatusResponse>(&client, &endpoint, timeout).await {
                    Ok(status) => serde_json::to_value(status).expect("status types always serialize"),
                    Err(e) => json!({"node_id": node_id, "status": "UNREACHABLE", "error": e.to_string()}),
                }
            }
        });
        let worker_details = join_all(calls).await;

        SystemStatusResponse {
            orchestrator_status: "READY".to_string(),
            active_workers_count: self.registry.len(),
            consistent_hasher_status: self.registry.ring_status(),
            worker_details,
        }
    }
}
