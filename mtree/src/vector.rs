//! The data types stored in and returned by a tree.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single point in the metric space, together with an opaque identifier and metadata
/// blob that travels alongside it but never participates in distance computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vector {
    /// Caller-assigned identifier. Uniqueness is the caller's responsibility; the tree
    /// does not deduplicate by id.
    pub id: String,
    /// The coordinates of the point. Serialized under the wire name `vector` to match
    /// the `{"id": ..., "vector": [...], "metadata": {...}}` insert payload.
    #[serde(rename = "vector")]
    pub data: Vec<f64>,
    /// Arbitrary JSON metadata carried alongside the vector.
    #[serde(default = "default_metadata")]
    pub metadata: Value,
}

fn default_metadata() -> Value {
    Value::Object(serde_json::Map::new())
}

impl Vector {
    /// Builds a new vector with the given id, coordinates and metadata.
    pub fn new(id: impl Into<String>, data: Vec<f64>, metadata: Value) -> Self {
        Vector {
            id: id.into(),
            data,
            metadata,
        }
    }

    /// The dimensionality of this vector.
    pub fn dim(&self) -> usize {
        self.data.len()
    }
}

/// The maximum number of leading coordinates echoed back in [`SearchResult::vector_data_snippet`].
const SNIPPET_LEN: usize = 5;

/// A single hit from a k-nearest-neighbor or range query, pairing the stored vector with
/// its distance from the query point.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    /// The vector that was found.
    pub vector: Vector,
    /// Its distance from the query point, under whatever metric the query used.
    pub distance: f64,
}

impl SearchResult {
    /// Builds a new search result.
    pub fn new(vector: Vector, distance: f64) -> Self {
        SearchResult { vector, distance }
    }
}

impl PartialOrd for SearchResult {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.distance.partial_cmp(&other.distance)
    }
}

/// Wire representation of a [`SearchResult`], matching the exact field names expected by
/// worker and coordinator clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResultWire {
    pub vector_id: String,
    pub distance: f64,
    pub vector_data_snippet: Vec<f64>,
    pub metadata: Value,
}

impl From<&SearchResult> for SearchResultWire {
    fn from(result: &SearchResult) -> Self {
        let snippet_len = SNIPPET_LEN.min(result.vector.data.len());
        SearchResultWire {
            vector_id: result.vector.id.clone(),
            distance: result.distance,
            vector_data_snippet: result.vector.data[..snippet_len].to_vec(),
            metadata: result.vector.metadata.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snippet_truncates_long_vectors() {
        let v = Vector::new("a", vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0], Value::Null);
        let r = SearchResult::new(v, 0.5);
        let wire = SearchResultWire::from(&r);
        assert_eq!(wire.vector_data_snippet, vec![1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn snippet_keeps_short_vectors_whole() {
        let v = Vector::new("a", vec![1.0, 2.0], Value::Null);
        let r = SearchResult::new(v, 0.5);
        let wire = SearchResultWire::from(&r);
        assert_eq!(wire.vector_data_snippet, vec![1.0, 2.0]);
    }
}
