//! Startup configuration, read once from the environment. Unlike the request-path
//! error taxonomy in [`crate::errors`], a missing or malformed required variable is a
//! deployment mistake, not a runtime condition a client can trigger: the process logs
//! what's wrong and refuses to start.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use mtree::DistanceMetric;

#[derive(Debug, Clone)]
pub struct Config {
    /// This worker's unique id, used as its key on the coordinator's hash ring.
    pub node_id: String,
    /// Interface to bind the HTTP server on.
    pub host: String,
    /// Port to bind the HTTP server on.
    pub port: u16,
    /// URL other services should use to reach this worker, advertised during
    /// self-registration. Defaults to `http://{host}:{port}` when unset, which is
    /// only useful for local development.
    pub advertise_url: String,
    /// Coordinator to best-effort self-register with at startup, if any.
    pub orchestrator_url: Option<String>,
    /// Timeout for outbound calls this worker makes (currently just self-registration).
    pub rpc_timeout: Duration,
    pub distance_metric: DistanceMetric,
    pub max_children: usize,
    pub min_children: usize,
}

fn env_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

fn parse_env_or<T: FromStr>(name: &str, default: T) -> T {
    match env_var(name) {
        Some(raw) => raw
            .parse()
            .unwrap_or_else(|_| panic!("{} is set but not a valid value: '{}'", name, raw)),
        None => default,
    }
}

impl Config {
    /// Builds configuration from the environment. Panics with a descriptive message
    /// if `WORKER_NODE_ID` is unset or any other variable is set but malformed.
    pub fn from_env() -> Config {
        let node_id = env_var("WORKER_NODE_ID")
            .unwrap_or_else(|| panic!("WORKER_NODE_ID must be set: every worker needs a stable identity on the hash ring"));
        let host = env_var("WORKER_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port: u16 = parse_env_or("WORKER_BASE_PORT", 5001);
        let advertise_url = env_var("WORKER_ADVERTISE_URL").unwrap_or_else(|| format!("http://{}:{}", host, port));
        let orchestrator_url = env_var("ORCHESTRATOR_URL");
        let rpc_timeout_ms: u64 = parse_env_or("WORKER_RPC_TIMEOUT_MS", 10_000);
        let distance_metric = match env_var("M_TREE_DISTANCE_METRIC") {
            Some(raw) => raw
                .parse()
                .unwrap_or_else(|e| panic!("M_TREE_DISTANCE_METRIC is invalid: {}", e)),
            None => DistanceMetric::Euclidean,
        };
        let max_children: usize = parse_env_or("M_TREE_MAX_CHILDREN", 4);
        let min_children: usize = parse_env_or("M_TREE_MIN_CHILDREN", 2);

        Config {
            node_id,
            host,
            port,
            advertise_url,
            orchestrator_url,
            rpc_timeout: Duration::from_millis(rpc_timeout_ms),
            distance_metric,
            max_children,
            min_children,
        }
    }
}
