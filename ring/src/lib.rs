#![allow(dead_code)]
#![deny(warnings)]

//! A consistent-hash ring mapping keys (vector ids) onto a set of registered nodes
//! (worker node ids), used by the coordinator to decide which worker owns a write and
//! which workers must be asked for a read.
//!
//! Each physical node is represented by several points on the ring (its "replicas" or
//! virtual nodes), which spreads a node's share of the key space across many small
//! arcs instead of one large one, so the load that shifts to neighboring nodes when a
//! node joins or leaves stays roughly even.

pub mod errors;
pub use errors::{RingError, RingResult};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};

/// Number of virtual points placed on the ring for each physical node.
const DEFAULT_REPLICAS: usize = 100;

/// Hashes a key onto the ring's 32-bit space.
///
/// Mirrors `int(sha1(key).hexdigest(), 16) % 2**32`: the low 32 bits of the digest,
/// read as a big-endian integer from its last four bytes.
fn hash_key(key: &str) -> u32 {
    let digest = Sha1::digest(key.as_bytes());
    let tail = &digest[digest.len() - 4..];
    u32::from_be_bytes([tail[0], tail[1], tail[2], tail[3]])
}

/// A consistent-hash ring over a set of named nodes.
#[derive(Debug, Clone)]
pub struct ConsistentHashRing {
    replicas: usize,
    /// Sorted map from ring position to the physical node that owns it.
    points: BTreeMap<u32, String>,
    /// The set of physical nodes currently registered, in insertion order.
    nodes: Vec<String>,
}

impl Default for ConsistentHashRing {
    fn default() -> Self {
        ConsistentHashRing::new(DEFAULT_REPLICAS)
    }
}

impl ConsistentHashRing {
    /// Builds an empty ring with `replicas` virtual points per physical node.
    pub fn new(replicas: usize) -> Self {
        ConsistentHashRing {
            replicas,
            points: BTreeMap::new(),
            nodes: Vec::new(),
        }
    }

    /// Registers a node, placing `replicas` virtual points for it on the ring.
    pub fn add_node(&mut self, node_id: &str) -> RingResult<()> {
        if self.nodes.iter().any(|n| n == node_id) {
            return Err(RingError::AlreadyPresent(node_id.to_string()));
        }
        for i in 0..self.replicas {
            let point = hash_key(&format!("{}-{}", node_id, i));
            self.points.insert(point, node_id.to_string());
        }
        self.nodes.push(node_id.to_string());
        Ok(())
    }

    /// Removes a node and every virtual point it placed.
    pub fn remove_node(&mut self, node_id: &str) -> RingResult<()> {
        if !self.nodes.iter().any(|n| n == node_id) {
            return Err(RingError::NotFound(node_id.to_string()));
        }
        self.points.retain(|_, owner| owner != node_id);
        self.nodes.retain(|n| n != node_id);
        Ok(())
    }

    /// Whether `node_id` is currently registered.
    pub fn contains(&self, node_id: &str) -> bool {
        self.nodes.iter().any(|n| n == node_id)
    }

    /// Finds the node that owns `key`: the node whose virtual point is the first one
    /// at or after `hash_key(key)` on the ring, wrapping around to the smallest point
    /// if `key` hashes past every registered point.
    pub fn get_node(&self, key: &str) -> RingResult<&str> {
        if self.points.is_empty() {
            return Err(RingError::EmptyRing);
        }
        let hash = hash_key(key);
        let owner = self
            .points
            .range(hash..)
            .next()
            .or_else(|| self.points.iter().next())
            .map(|(_, node_id)| node_id.as_str())
            .expect("ring is non-empty");
        Ok(owner)
    }

    /// Every registered physical node, in the order they were added.
    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }

    /// A snapshot of ring composition, suitable for a status endpoint.
    pub fn status(&self) -> RingStatus {
        let mut node_ids = self.nodes.clone();
        node_ids.sort();
        RingStatus {
            physical_node_count: self.nodes.len(),
            virtual_point_count: self.points.len(),
            node_ids,
        }
    }
}

/// Snapshot of a ring's composition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RingStatus {
    pub physical_node_count: usize,
    pub virtual_point_count: usize,
    pub node_ids: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_ring_rejects_lookups() {
        let ring = ConsistentHashRing::new(10);
        assert!(matches!(ring.get_node("a"), Err(RingError::EmptyRing)));
    }

    #[test]
    fn single_node_owns_everything() {
        let mut ring = ConsistentHashRing::new(10);
        ring.add_node("worker-1").unwrap();
        for key in ["a", "b", "some-vector-id", ""] {
            assert_eq!(ring.get_node(key).unwrap(), "worker-1");
        }
    }

    #[test]
    fn adding_same_node_twice_errors() {
        let mut ring = ConsistentHashRing::new(10);
        ring.add_node("worker-1").unwrap();
        assert!(matches!(
            ring.add_node("worker-1"),
            Err(RingError::AlreadyPresent(_))
        ));
    }

    #[test]
    fn removing_unknown_node_errors() {
        let mut ring = ConsistentHashRing::new(10);
        assert!(matches!(ring.remove_node("ghost"), Err(RingError::NotFound(_))));
    }

    #[test]
    fn lookups_are_stable_and_deterministic() {
        let mut ring = ConsistentHashRing::new(50);
        ring.add_node("worker-1").unwrap();
        ring.add_node("worker-2").unwrap();
        ring.add_node("worker-3").unwrap();

        let keys: Vec<String> = (0..200).map(|i| format!("vector-{}", i)).collect();
        let first_pass: Vec<String> = keys.iter().map(|k| ring.get_node(k).unwrap().to_string()).collect();
        let second_pass: Vec<String> = keys.iter().map(|k| ring.get_node(k).unwrap().to_string()).collect();
        assert_eq!(first_pass, second_pass);
    }

    #[test]
    fn removing_a_node_only_reassigns_its_own_keys() {
        let mut ring = ConsistentHashRing::new(50);
        ring.add_node("worker-1").unwrap();
        ring.add_node("worker-2").unwrap();
        ring.add_node("worker-3").unwrap();

        let keys: Vec<String> = (0..500).map(|i| format!("vector-{}", i)).collect();
        let before: Vec<String> = keys.iter().map(|k| ring.get_node(k).unwrap().to_string()).collect();

        ring.remove_node("worker-2").unwrap();
        let after: Vec<String> = keys.iter().map(|k| ring.get_node(k).unwrap().to_string()).collect();

        for (b, a) in before.iter().zip(after.iter()) {
            // Keys that did not belong to the removed node must not move.
            if b != "worker-2" {
                assert_eq!(b, a);
            }
        }
        // Keys that did belong to worker-2 must have moved to a surviving node.
        for (b, a) in before.iter().zip(after.iter()) {
            if b == "worker-2" {
                assert_ne!(a, "worker-2");
            }
        }
    }

    #[test]
    fn status_reports_physical_and_virtual_counts() {
        let mut ring = ConsistentHashRing::new(20);
        ring.add_node("worker-1").unwrap();
        ring.add_node("worker-2").unwrap();
        let status = ring.status();
        assert_eq!(status.physical_node_count, 2);
        assert_eq!(status.virtual_point_count, 40);
        assert_eq!(status.node_ids, vec!["worker-1".to_string(), "worker-2".to_string()]);
    }
}
