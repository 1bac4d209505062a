//! The coordinator's view of the fleet: which worker ids exist, what URL each is
//! reachable at, and the hash ring used to route keys to them.
//!
//! Both live behind a single `std::sync::Mutex`. Registration churn is rare and
//! cheap, so a coarse lock covering ring and URL map together is simpler than trying
//! to keep them separately synchronized. The lock is never held across an `.await`:
//! every public method here takes the lock, does plain in-memory work, and returns,
//! so callers that need to fan out RPCs first take a snapshot and release the lock
//! before making any network call.

use std::collections::HashMap;
use std::sync::Mutex;

use ring_topology::{ConsistentHashRing, RingStatus};

struct State {
    ring: ConsistentHashRing,
    urls: HashMap<String, String>,
}

pub struct WorkerRegistry {
    state: Mutex<State>,
}

impl WorkerRegistry {
    pub fn new(ring_replicas: usize) -> Self {
        WorkerRegistry {
            state: Mutex::new(State {
                ring: ConsistentHashRing::new(ring_replicas),
                urls: HashMap::new(),
            }),
        }
    }

    /// Registers a worker, or updates its URL if it is already registered. Mirrors
    /// the original's lenient re-registration behavior: a worker calling this twice
    /// (say, after a restart with a new address) is not an error.
    pub fn register(&self, node_id: &str, url: &str) {
        let mut state = self.state.lock().expect("registry lock poisoned");
        if state.urls.contains_key(node_id) {
            state.urls.insert(node_id.to_string(), url.to_string());
        } else {
            state.urls.insert(node_id.to_string(), url.to_string());
            // The ring and the URL map can only drift if this insert succeeds but the
            // ring add fails; `add_node` only fails on a duplicate, which `contains_key`
            // above already ruled out.
            state.ring.add_node(node_id).expect("node_id was not yet in the ring");
        }
    }

    /// Deregisters a worker. Returns `false` if it was not registered.
    pub fn deregister(&self, node_id: &str) -> bool {
        let mut state = self.state.lock().expect("registry lock poisoned");
        if state.urls.remove(node_id).is_none() {
            return false;
        }
        let _ = state.ring.remove_node(node_id);
        true
    }

    /// The worker that owns `key`, if any worker is registered and that worker's URL
    /// is still on file. If the ring names an owner whose URL is no longer on file
    /// (it deregistered without the ring being updated, which should not happen
    /// through this type's own API but is cheap to guard against), that stale id is
    /// pruned from the ring before returning `None`.
    pub fn route(&self, key: &str) -> Option<(String, String)> {
        let mut state = self.state.lock().expect("registry lock poisoned");
        let node_id = state.ring.get_node(key).ok()?.to_string();
        match state.urls.get(&node_id).cloned() {
            Some(url) => Some((node_id, url)),
            None => {
                let _ = state.ring.remove_node(&node_id);
                None
            }
        }
    }

    /// A snapshot of every registered worker's (id, url), taken under the lock and
    /// then handed to the caller to fan RPCs out against without holding it.
    pub fn snapshot(&self) -> Vec<(String, String)> {
        let state = self.state.lock().expect("registry lock poisoned");
        state.urls.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    pub fn len(&self) -> usize {
        self.state.lock().expect("registry lock poisoned").urls.len()
    }

    pub fn ring_status(&self) -> RingStatus {
        self.state.lock().expect("registry lock poisoned").ring.status()
    }
}
