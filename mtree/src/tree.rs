//! The M-Tree itself.
//!
//! Nodes live in a flat arena (`Vec<Node>`) and are addressed by integer handle rather
//! than by owning pointers, so splitting and re-parenting a subtree is just moving
//! indices around instead of fighting the borrow checker over a doubly-linked
//! structure. A node holds no reference to its parent; the path from the root to the
//! node being touched is instead threaded through an explicit stack while descending,
//! and that same stack is walked back upward to propagate covering-radius changes and
//! splits.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use ordered_float::OrderedFloat;

use crate::errors::{MTreeError, MTreeResult};
use crate::metric::DistanceMetric;
use crate::metrics::TreeMetrics;
use crate::vector::{SearchResult, Vector};

/// Maximum number of entries a node may hold before it must split.
const DEFAULT_MAX_CHILDREN: usize = 8;
/// Minimum number of entries a non-root node must hold after a split.
const DEFAULT_MIN_CHILDREN: usize = 3;

type NodeHandle = usize;

/// One slot in a node: either a leaf entry (an actual stored vector) or an internal
/// entry (a routing object describing a child subtree).
#[derive(Debug, Clone)]
struct Entry {
    /// The stored vector (leaf) or routing object (internal).
    vector: Vector,
    /// Distance from `vector` to the routing object of the parent entry that points at
    /// the node this entry lives in. Zero for entries of the root node, which has no
    /// parent.
    distance_to_parent: f64,
    /// Radius of the ball, centered on `vector`, that covers every vector in the
    /// subtree rooted at `child`. Zero for leaf entries.
    covering_radius: f64,
    /// Subtree this entry routes to. `None` for leaf entries.
    child: Option<NodeHandle>,
}

impl Entry {
    fn is_leaf_entry(&self) -> bool {
        self.child.is_none()
    }
}

#[derive(Debug, Clone)]
struct Node {
    is_leaf: bool,
    entries: Vec<Entry>,
}

impl Node {
    fn new(is_leaf: bool) -> Self {
        Node {
            is_leaf,
            entries: Vec::new(),
        }
    }
}

/// A stack frame recorded while descending from the root to a leaf.
struct Frame {
    node: NodeHandle,
    /// Index, within the parent node's entries, of the entry that points at `node`.
    /// `None` for the root.
    parent_entry_idx: Option<usize>,
}

/// A height-balanced M-Tree over `Vec<f64>` vectors under a fixed [`DistanceMetric`].
///
/// Reads (`knn`, `range`, `len`) may run concurrently with each other; `insert` needs
/// exclusive access. This type itself has no opinion on locking, it is the caller's
/// (the worker service's) job to wrap it in an `RwLock`.
pub struct MTree {
    metric: DistanceMetric,
    nodes: Vec<Node>,
    root: Option<NodeHandle>,
    dim: Option<usize>,
    size: usize,
    max_children: usize,
    min_children: usize,
    metrics: TreeMetrics,
}

impl MTree {
    /// Builds an empty tree using default fan-out bounds.
    pub fn new(metric: DistanceMetric) -> Self {
        MTree::with_fanout(metric, DEFAULT_MAX_CHILDREN, DEFAULT_MIN_CHILDREN)
    }

    /// Builds an empty tree with explicit fan-out bounds. `min_children` must be at
    /// least 2 and at most `max_children / 2`; mainly useful in tests that want to
    /// force splits with a handful of vectors.
    pub fn with_fanout(metric: DistanceMetric, max_children: usize, min_children: usize) -> Self {
        MTree {
            metric,
            nodes: Vec::new(),
            root: None,
            dim: None,
            size: 0,
            max_children,
            min_children,
            metrics: TreeMetrics::new(),
        }
    }

    /// The metric this tree was built with.
    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }

    /// Number of vectors currently stored.
    pub fn len(&self) -> usize {
        self.size
    }

    /// Whether the tree holds no vectors.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Dimensionality fixed by the first inserted vector, if any.
    pub fn dim(&self) -> Option<usize> {
        self.dim
    }

    /// Diagnostic counters for this tree.
    pub fn metrics(&self) -> &TreeMetrics {
        &self.metrics
    }

    fn validate_dim(&self, data: &[f64]) -> MTreeResult<()> {
        if let Some(d) = self.dim {
            if data.len() != d {
                return Err(MTreeError::DimensionMismatch {
                    expected: d,
                    got: data.len(),
                });
            }
        }
        Ok(())
    }

    /// Inserts a vector into the tree.
    pub fn insert(&mut self, vector: Vector) -> MTreeResult<()> {
        self.validate_dim(&vector.data)?;
        self.metrics.record_insert();

        let root = match self.root {
            Some(root) => root,
            None => {
                let mut leaf = Node::new(true);
                leaf.entries.push(Entry {
                    vector: vector.clone(),
                    distance_to_parent: 0.0,
                    covering_radius: 0.0,
                    child: None,
                });
                self.nodes.push(leaf);
                let handle = self.nodes.len() - 1;
                self.root = Some(handle);
                self.dim = Some(vector.dim());
                self.size += 1;
                return Ok(());
            }
        };
        self.dim.get_or_insert(vector.dim());

        // Descend to a leaf, recording the path, which entry in each ancestor we
        // followed, and the routing object each node's own entries are measured
        // against (`routing_objects[i]` lines up with `path[i]`; the root has no
        // parent so its routing object is `None`).
        let mut path: Vec<Frame> = Vec::new();
        let mut routing_objects: Vec<Option<Vec<f64>>> = Vec::new();
        let mut current = root;
        let mut current_routing: Option<Vec<f64>> = None;
        loop {
            path.push(Frame {
                node: current,
                parent_entry_idx: None,
            });
            routing_objects.push(current_routing.clone());
            if self.nodes[current].is_leaf {
                break;
            }
            let idx = self.choose_subtree(current, &vector.data);
            let entry = &self.nodes[current].entries[idx];
            let child = entry.child.expect("non-leaf entry must have a child");
            current_routing = Some(entry.vector.data.clone());
            path.last_mut().unwrap().parent_entry_idx = Some(idx);
            current = child;
        }

        let leaf = path.last().unwrap().node;
        let leaf_routing = routing_objects.last().unwrap().clone();
        let distance_to_parent = leaf_routing
            .as_ref()
            .map(|r| self.metric.dist(&vector.data, r))
            .unwrap_or(0.0);
        self.nodes[leaf].entries.push(Entry {
            vector: vector.clone(),
            distance_to_parent,
            covering_radius: 0.0,
            child: None,
        });
        self.size += 1;

        self.rebalance_from(path, routing_objects);
        Ok(())
    }

    /// Chooses which child entry of an internal node a new vector should descend into:
    /// the entry already covering the point with the smallest distance if one exists,
    /// otherwise the entry needing the smallest radius increase.
    fn choose_subtree(&mut self, node: NodeHandle, query: &[f64]) -> usize {
        let entries = &self.nodes[node].entries;
        self.metrics
            .record_distance_evaluations(entries.len() as u64);
        let mut best_covering: Option<(usize, f64)> = None;
        let mut best_expanding: Option<(usize, f64)> = None;
        for (i, e) in entries.iter().enumerate() {
            let d = self.metric.dist(query, &e.vector.data);
            if d <= e.covering_radius {
                if best_covering.map_or(true, |(_, bd)| d < bd) {
                    best_covering = Some((i, d));
                }
            } else {
                let expansion = d - e.covering_radius;
                if best_expanding.map_or(true, |(_, be)| expansion < be) {
                    best_expanding = Some((i, expansion));
                }
            }
        }
        best_covering
            .map(|(i, _)| i)
            .unwrap_or_else(|| best_expanding.expect("node has at least one entry").0)
    }

    /// After inserting into (or splitting) a node, walk back up the recorded path,
    /// splitting any node that now exceeds `max_children` and keeping every ancestor's
    /// covering radius accurate.
    fn rebalance_from(&mut self, mut path: Vec<Frame>, mut routing_objects: Vec<Option<Vec<f64>>>) {
        while let Some(frame) = path.pop() {
            routing_objects.pop();
            let node = frame.node;
            if self.nodes[node].entries.len() > self.max_children {
                self.metrics.record_split();
                let (promoted_a, entries_a, promoted_b, entries_b) =
                    self.split_entries(node);
                let radius_a = covering_radius_of(&entries_a);
                let radius_b = covering_radius_of(&entries_b);

                match frame.parent_entry_idx {
                    None => {
                        // Splitting the root: grow the tree by one level.
                        self.nodes[node] = Node {
                            is_leaf: entries_a.first().map_or(true, |e| e.is_leaf_entry()),
                            entries: entries_a,
                        };
                        self.nodes.push(Node {
                            is_leaf: entries_b.first().map_or(true, |e| e.is_leaf_entry()),
                            entries: entries_b,
                        });
                        let handle_b = self.nodes.len() - 1;
                        let mut new_root = Node::new(false);
                        new_root.entries.push(Entry {
                            vector: promoted_a,
                            distance_to_parent: 0.0,
                            covering_radius: radius_a,
                            child: Some(node),
                        });
                        new_root.entries.push(Entry {
                            vector: promoted_b,
                            distance_to_parent: 0.0,
                            covering_radius: radius_b,
                            child: Some(handle_b),
                        });
                        self.nodes.push(new_root);
                        self.root = Some(self.nodes.len() - 1);
                    }
                    Some(entry_idx) => {
                        let parent = path.last().unwrap().node;
                        let grandparent_routing = routing_objects.last().cloned().flatten();
                        let dist_a = grandparent_routing
                            .as_ref()
                            .map(|r| self.metric.dist(&promoted_a.data, r))
                            .unwrap_or(0.0);
                        let dist_b = grandparent_routing
                            .as_ref()
                            .map(|r| self.metric.dist(&promoted_b.data, r))
                            .unwrap_or(0.0);

                        self.nodes[node] = Node {
                            is_leaf: entries_a.first().map_or(true, |e| e.is_leaf_entry()),
                            entries: entries_a,
                        };
                        self.nodes.push(Node {
                            is_leaf: entries_b.first().map_or(true, |e| e.is_leaf_entry()),
                            entries: entries_b,
                        });
                        let handle_b = self.nodes.len() - 1;

                        let parent_entry = &mut self.nodes[parent].entries[entry_idx];
                        parent_entry.vector = promoted_a;
                        parent_entry.distance_to_parent = dist_a;
                        parent_entry.covering_radius = radius_a;
                        self.nodes[parent].entries.push(Entry {
                            vector: promoted_b,
                            distance_to_parent: dist_b,
                            covering_radius: radius_b,
                            child: Some(handle_b),
                        });
                        // The parent will be re-examined on the next loop iteration,
                        // which may cascade the split further up.
                    }
                }
            } else if let Some(entry_idx) = frame.parent_entry_idx {
                let parent = path.last().unwrap().node;
                let radius = covering_radius_of(&self.nodes[node].entries);
                self.nodes[parent].entries[entry_idx].covering_radius = radius;
            }
        }
    }

    /// Splits an over-full node's entries into two groups using the mM_RAD_2
    /// heuristic: try every pair of entries as the two new routing objects and keep
    /// the pair that minimizes the larger of the two resulting covering radii.
    fn split_entries(&mut self, node: NodeHandle) -> (Vector, Vec<Entry>, Vector, Vec<Entry>) {
        let entries = std::mem::take(&mut self.nodes[node].entries);
        let n = entries.len();
        debug_assert!(n >= 2);

        let mut dist = vec![vec![0.0_f64; n]; n];
        for i in 0..n {
            for j in (i + 1)..n {
                let d = self.metric.dist(&entries[i].vector.data, &entries[j].vector.data);
                dist[i][j] = d;
                dist[j][i] = d;
            }
        }
        self.metrics
            .record_distance_evaluations((n * n.saturating_sub(1) / 2) as u64);

        // mM_RAD_2, minimum-sum-of-radii variant: minimize max_a + max_b, breaking
        // ties lexicographically on (max_a, max_b, id_a, id_b) for determinism.
        let (mut pivot_a, mut pivot_b) = (0usize, 1usize);
        let mut best_sum = f64::INFINITY;
        let mut best_max_a = f64::INFINITY;
        let mut best_max_b = f64::INFINITY;
        for i in 0..n {
            for j in (i + 1)..n {
                let mut max_a = 0.0_f64;
                let mut max_b = 0.0_f64;
                for k in 0..n {
                    if k == i || k == j {
                        continue;
                    }
                    if dist[k][i] <= dist[k][j] {
                        if dist[k][i] > max_a {
                            max_a = dist[k][i];
                        }
                    } else if dist[k][j] > max_b {
                        max_b = dist[k][j];
                    }
                }
                let sum = max_a + max_b;
                let candidate = (sum, max_a, max_b, entries[i].vector.id.as_str(), entries[j].vector.id.as_str());
                let current_best = (
                    best_sum,
                    best_max_a,
                    best_max_b,
                    entries[pivot_a].vector.id.as_str(),
                    entries[pivot_b].vector.id.as_str(),
                );
                if candidate < current_best {
                    best_sum = sum;
                    best_max_a = max_a;
                    best_max_b = max_b;
                    pivot_a = i;
                    pivot_b = j;
                }
            }
        }

        let mut group_a: Vec<usize> = vec![pivot_a];
        let mut group_b: Vec<usize> = vec![pivot_b];
        for k in 0..n {
            if k == pivot_a || k == pivot_b {
                continue;
            }
            if dist[k][pivot_a] <= dist[k][pivot_b] {
                group_a.push(k);
            } else {
                group_b.push(k);
            }
        }

        rebalance_groups(&mut group_a, &mut group_b, &dist, pivot_a, pivot_b, self.min_children);

        let promoted_a = entries[pivot_a].vector.clone();
        let promoted_b = entries[pivot_b].vector.clone();

        let mut entries_a = Vec::with_capacity(group_a.len());
        let mut entries_b = Vec::with_capacity(group_b.len());
        for idx in group_a {
            let mut e = entries[idx].clone();
            e.distance_to_parent = dist[idx][pivot_a];
            entries_a.push(e);
        }
        for idx in group_b {
            let mut e = entries[idx].clone();
            e.distance_to_parent = dist[idx][pivot_b];
            entries_b.push(e);
        }

        (promoted_a, entries_a, promoted_b, entries_b)
    }

    /// Returns up to `k` nearest neighbors of `query`, closest first.
    pub fn knn(&self, query: &[f64], k: usize) -> MTreeResult<Vec<SearchResult>> {
        self.validate_dim(query)?;
        if k == 0 {
            return Err(MTreeError::InvalidArgument("k must be greater than zero".into()));
        }
        let root = match self.root {
            Some(root) => root,
            None => return Ok(Vec::new()),
        };

        let mut best: BinaryHeap<HeapItem> = BinaryHeap::with_capacity(k + 1);
        let mut pq: BinaryHeap<Reverse<(OrderedFloat<f64>, NodeHandle, Option<OrderedFloat<f64>>)>> =
            BinaryHeap::new();
        pq.push(Reverse((OrderedFloat(0.0), root, None)));

        while let Some(Reverse((lb, node, parent_dist))) = pq.pop() {
            let current_worst = worst_distance(&best, k);
            if lb.into_inner() > current_worst {
                break;
            }
            self.metrics.record_node_visit();
            let parent_dist = parent_dist.map(OrderedFloat::into_inner);
            for e in &self.nodes[node].entries {
                let current_worst = worst_distance(&best, k);
                if let Some(dp) = parent_dist {
                    if (dp - e.distance_to_parent).abs() > current_worst + e.covering_radius {
                        continue;
                    }
                }
                let d = self.metric.dist(query, &e.vector.data);
                self.metrics.record_distance_evaluations(1);
                match e.child {
                    Some(child) => {
                        let lb_child = (d - e.covering_radius).max(0.0);
                        if lb_child <= current_worst {
                            pq.push(Reverse((OrderedFloat(lb_child), child, Some(OrderedFloat(d)))));
                        }
                    }
                    None => {
                        if d <= current_worst || best.len() < k {
                            best.push(HeapItem {
                                dist: OrderedFloat(d),
                                result: SearchResult::new(e.vector.clone(), d),
                            });
                            if best.len() > k {
                                best.pop();
                            }
                        }
                    }
                }
            }
        }

        let mut results: Vec<SearchResult> = best.into_sorted_vec_ascending();
        results.truncate(k);
        Ok(results)
    }

    /// Returns every vector within `radius` (inclusive) of `query`.
    pub fn range(&self, query: &[f64], radius: f64) -> MTreeResult<Vec<SearchResult>> {
        self.validate_dim(query)?;
        if radius < 0.0 {
            return Err(MTreeError::InvalidArgument("radius must be non-negative".into()));
        }
        let root = match self.root {
            Some(root) => root,
            None => return Ok(Vec::new()),
        };

        let mut results = Vec::new();
        let mut stack = vec![(root, None::<f64>)];
        while let Some((node, parent_dist)) = stack.pop() {
            self.metrics.record_node_visit();
            for e in &self.nodes[node].entries {
                if let Some(dp) = parent_dist {
                    if (dp - e.distance_to_parent).abs() > radius + e.covering_radius {
                        continue;
                    }
                }
                let d = self.metric.dist(query, &e.vector.data);
                self.metrics.record_distance_evaluations(1);
                match e.child {
                    Some(child) => {
                        if d - e.covering_radius <= radius {
                            stack.push((child, Some(d)));
                        }
                    }
                    None => {
                        if d <= radius {
                            results.push(SearchResult::new(e.vector.clone(), d));
                        }
                    }
                }
            }
        }
        results.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap()
                .then_with(|| a.vector.id.cmp(&b.vector.id))
        });
        Ok(results)
    }
}

fn covering_radius_of(entries: &[Entry]) -> f64 {
    entries
        .iter()
        .map(|e| e.distance_to_parent + e.covering_radius)
        .fold(0.0, f64::max)
}

/// If a split leaves one side with fewer than `min_children` entries (and the other
/// side has entries to spare), move the entries from the larger group that sit
/// closest to the smaller group's pivot across, until both sides meet the minimum or
/// the larger side cannot shrink further without violating it itself.
fn rebalance_groups(
    group_a: &mut Vec<usize>,
    group_b: &mut Vec<usize>,
    dist: &[Vec<f64>],
    pivot_a: usize,
    pivot_b: usize,
    min_children: usize,
) {
    loop {
        let (small, large, small_pivot) = if group_a.len() < group_b.len() {
            (&mut *group_a, &mut *group_b, pivot_a)
        } else {
            (&mut *group_b, &mut *group_a, pivot_b)
        };
        if small.len() >= min_children || large.len() <= min_children {
            break;
        }
        let (best_pos, _) = large
            .iter()
            .enumerate()
            .filter(|(_, &idx)| idx != pivot_a && idx != pivot_b)
            .min_by(|(_, &i), (_, &j)| dist[i][small_pivot].partial_cmp(&dist[j][small_pivot]).unwrap())
            .expect("larger group has a movable entry");
        let moved = large.remove(best_pos);
        small.push(moved);
    }
}

fn worst_distance(best: &BinaryHeap<HeapItem>, k: usize) -> f64 {
    if best.len() < k {
        f64::INFINITY
    } else {
        best.peek().map(|item| item.dist.into_inner()).unwrap_or(f64::INFINITY)
    }
}

#[derive(Debug, Clone)]
struct HeapItem {
    dist: OrderedFloat<f64>,
    result: SearchResult,
}

impl PartialEq for HeapItem {
    fn eq(&self, other: &Self) -> bool {
        self.dist == other.dist
    }
}
impl Eq for HeapItem {}
impl PartialOrd for HeapItem {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for HeapItem {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.dist.cmp(&other.dist)
    }
}

trait IntoSortedAscending {
    fn into_sorted_vec_ascending(self) -> Vec<SearchResult>;
}

impl IntoSortedAscending for BinaryHeap<HeapItem> {
    fn into_sorted_vec_ascending(self) -> Vec<SearchResult> {
        let mut v: Vec<HeapItem> = self.into_vec();
        v.sort_by(|a, b| a.dist.cmp(&b.dist).then_with(|| a.result.vector.id.cmp(&b.result.vector.id)));
        v.into_iter().map(|item| item.result).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn v(id: &str, data: Vec<f64>) -> Vector {
        Vector::new(id, data, Value::Null)
    }

    fn brute_force_knn(points: &[Vector], query: &[f64], k: usize, metric: DistanceMetric) -> Vec<SearchResult> {
        let mut results: Vec<SearchResult> = points
            .iter()
            .map(|p| SearchResult::new(p.clone(), metric.dist(query, &p.data)))
            .collect();
        results.sort_by(|a, b| a.distance.partial_cmp(&b.distance).unwrap());
        results.truncate(k);
        results
    }

    #[test]
    fn knn_on_empty_tree_is_empty() {
        let mut tree = MTree::new(DistanceMetric::Euclidean);
        let result = tree.knn(&[0.0, 0.0], 3).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn knn_zero_is_rejected() {
        let mut tree = MTree::new(DistanceMetric::Euclidean);
        tree.insert(v("a", vec![0.0, 0.0])).unwrap();
        assert!(tree.knn(&[0.0, 0.0], 0).is_err());
    }

    #[test]
    fn insert_validates_dimension() {
        let mut tree = MTree::new(DistanceMetric::Euclidean);
        tree.insert(v("a", vec![0.0, 0.0])).unwrap();
        let err = tree.insert(v("b", vec![0.0, 0.0, 0.0])).unwrap_err();
        assert!(matches!(err, MTreeError::DimensionMismatch { expected: 2, got: 3 }));
    }

    #[test]
    fn single_vector_is_its_own_nearest_neighbor() {
        let mut tree = MTree::new(DistanceMetric::Euclidean);
        tree.insert(v("a", vec![1.0, 1.0])).unwrap();
        let result = tree.knn(&[1.0, 1.0], 1).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].vector.id, "a");
        assert_eq!(result[0].distance, 0.0);
    }

    #[test]
    fn split_triggers_and_tree_still_answers_correctly() {
        // A fan-out of 3 forces a split well before 10 insertions.
        let mut tree = MTree::with_fanout(DistanceMetric::Euclidean, 3, 2);
        let mut points = Vec::new();
        for i in 0..10 {
            let p = v(&format!("p{}", i), vec![i as f64, (i * i) as f64]);
            points.push(p.clone());
            tree.insert(p).unwrap();
        }
        assert_eq!(tree.len(), 10);
        assert!(tree.metrics().snapshot().splits > 0);

        let query = [4.0, 16.0];
        let got = tree.knn(&query, 3).unwrap();
        let want = brute_force_knn(&points, &query, 3, DistanceMetric::Euclidean);
        let got_ids: Vec<&str> = got.iter().map(|r| r.vector.id.as_str()).collect();
        let want_ids: Vec<&str> = want.iter().map(|r| r.vector.id.as_str()).collect();
        assert_eq!(got_ids, want_ids);
    }

    #[test]
    fn knn_matches_brute_force_on_random_like_data() {
        let mut tree = MTree::with_fanout(DistanceMetric::Euclidean, 4, 2);
        let coords: Vec<(f64, f64)> = vec![
            (0.0, 0.0),
            (5.0, 5.0),
            (1.0, 1.0),
            (9.0, 2.0),
            (3.0, 7.0),
            (2.0, 2.0),
            (8.0, 8.0),
            (4.0, 4.0),
            (6.0, 1.0),
            (0.5, 9.5),
        ];
        let mut points = Vec::new();
        for (i, (x, y)) in coords.into_iter().enumerate() {
            let p = v(&format!("p{}", i), vec![x, y]);
            points.push(p.clone());
            tree.insert(p).unwrap();
        }
        for query in [[3.0, 3.0], [0.0, 0.0], [9.0, 9.0]] {
            let got = tree.knn(&query, 4).unwrap();
            let want = brute_force_knn(&points, &query, 4, DistanceMetric::Euclidean);
            let got_ids: Vec<&str> = got.iter().map(|r| r.vector.id.as_str()).collect();
            let want_ids: Vec<&str> = want.iter().map(|r| r.vector.id.as_str()).collect();
            assert_eq!(got_ids, want_ids, "mismatch for query {:?}", query);
        }
    }

    #[test]
    fn range_search_returns_exact_set() {
        let mut tree = MTree::with_fanout(DistanceMetric::Euclidean, 4, 2);
        for i in 0..8 {
            tree.insert(v(&format!("p{}", i), vec![i as f64, 0.0])).unwrap();
        }
        let result = tree.range(&[0.0, 0.0], 3.0).unwrap();
        let mut ids: Vec<&str> = result.iter().map(|r| r.vector.id.as_str()).collect();
        ids.sort();
        assert_eq!(ids, vec!["p0", "p1", "p2", "p3"]);
    }

    #[test]
    fn range_rejects_negative_radius() {
        let mut tree = MTree::new(DistanceMetric::Euclidean);
        tree.insert(v("a", vec![0.0, 0.0])).unwrap();
        assert!(tree.range(&[0.0, 0.0], -1.0).is_err());
    }
}
