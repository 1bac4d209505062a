//! Distance metrics supported by the tree.
//!
//! Only plain element-wise arithmetic is used here; no SIMD, no external numeric array
//! library. Vectors are compared as ordinary `&[f64]` slices.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::MTreeError;

/// A metric over `R^n`. Selected once, at tree-construction time, and fixed for the
/// lifetime of the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMetric {
    /// Straight-line (L2) distance.
    Euclidean,
    /// `1 - cosine_similarity`, so that identical directions have distance 0 and
    /// opposite directions have distance 2. A zero vector compared against anything,
    /// including another zero vector, is defined to have distance 1.0 (see
    /// `cosine_distance` below) rather than panicking or dividing by zero.
    Cosine,
}

impl DistanceMetric {
    /// Computes the distance between two same-length slices under this metric.
    ///
    /// Panics if `a.len() != b.len()`; callers are expected to validate dimensionality
    /// (see [`crate::tree::MTree`]) before calling this.
    pub fn dist(&self, a: &[f64], b: &[f64]) -> f64 {
        debug_assert_eq!(a.len(), b.len());
        match self {
            DistanceMetric::Euclidean => euclidean_distance(a, b),
            DistanceMetric::Cosine => cosine_distance(a, b),
        }
    }
}

impl FromStr for DistanceMetric {
    type Err = MTreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "euclidean" | "l2" => Ok(DistanceMetric::Euclidean),
            "cosine" => Ok(DistanceMetric::Cosine),
            other => Err(MTreeError::InvalidArgument(format!(
                "unknown distance metric: {}",
                other
            ))),
        }
    }
}

/// Euclidean (L2) distance between two equal-length vectors.
pub fn euclidean_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

/// `1 - cosine_similarity(a, b)`. If either vector has zero norm, the cosine
/// similarity is undefined; we define the distance to be `1.0` in that case so a
/// zero vector is neither closer nor farther than average from anything, including
/// itself.
pub fn cosine_distance(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 1.0;
    }
    1.0 - dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn euclidean_matches_known_value() {
        let a = [0.0, 0.0];
        let b = [3.0, 4.0];
        assert_eq!(euclidean_distance(&a, &b), 5.0);
    }

    #[test]
    fn cosine_identical_vectors_is_zero() {
        let a = [1.0, 2.0, 3.0];
        let d = cosine_distance(&a, &a);
        assert!(d.abs() < 1e-9);
    }

    #[test]
    fn cosine_opposite_vectors_is_two() {
        let a = [1.0, 0.0];
        let b = [-1.0, 0.0];
        let d = cosine_distance(&a, &b);
        assert!((d - 2.0).abs() < 1e-9);
    }

    #[test]
    fn cosine_zero_vector_is_one() {
        let a = [0.0, 0.0];
        let b = [1.0, 2.0];
        assert_eq!(cosine_distance(&a, &b), 1.0);
        assert_eq!(cosine_distance(&a, &a), 1.0);
    }

    #[test]
    fn from_str_parses_known_names() {
        assert_eq!(
            "euclidean".parse::<DistanceMetric>().unwrap(),
            DistanceMetric::Euclidean
        );
        assert_eq!(
            "Cosine".parse::<DistanceMetric>().unwrap(),
            DistanceMetric::Cosine
        );
        assert!("manhattan".parse::<DistanceMetric>().is_err());
    }
}
