//! Startup configuration for the coordinator, read once from the environment.

use std::env;
use std::str::FromStr;
use std::time::Duration;

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

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Virtual points placed on the hash ring per registered worker.
    pub ring_replicas: usize,
    /// Timeout for a single worker RPC during insert/search fan-out.
    pub worker_rpc_timeout: Duration,
    /// Timeout for a single worker's `/status` call while assembling `/status`.
    pub status_rpc_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Config {
        let host = env_var("ORCHESTRATOR_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port: u16 = parse_env_or("ORCHESTRATOR_PORT", 5000);
        let ring_replicas: usize = parse_env_or("CONSISTENT_HASHER_REPLICAS", 100);
        let worker_rpc_timeout_ms: u64 = parse_env_or("WORKER_RPC_TIMEOUT_MS", 10_000);
        let status_rpc_timeout_ms: u64 = parse_env_or("STATUS_RPC_TIMEOUT_MS", 2_000);

        Config {
            host,
            port,
            ring_replicas,
            worker_rpc_timeout: Duration::from_millis(worker_rpc_timeout_ms),
            status_rpc_timeout: Duration::from_millis(status_rpc_timeout_ms),
        }
    }
}
