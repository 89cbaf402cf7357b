//! Brute-force cosine nearest-neighbour index over matrix rows.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::InteractionMatrix;
use crate::error::AppError;

/// Result of a neighbour query, nearest first.
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbors {
    pub distances: Vec<f64>,
    pub indices: Vec<usize>,
}

/// Fitted index: the training rows and their L2 norms.
///
/// Only the rows are persisted; norms are recomputed on load so a reloaded
/// index answers queries with bit-identical distances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredIndex", into = "StoredIndex")]
pub struct NeighborIndex {
    n_features: usize,
    rows: Vec<Vec<f64>>,
    norms: Vec<f64>,
}

#[derive(Serialize, Deserialize)]
struct StoredIndex {
    n_features: usize,
    rows: Vec<Vec<f64>>,
}

impl From<StoredIndex> for NeighborIndex {
    fn from(stored: StoredIndex) -> Self {
        let norms = stored.rows.iter().map(|r| l2_norm(r)).collect();
        Self {
            n_features: stored.n_features,
            rows: stored.rows,
            norms,
        }
    }
}

impl From<NeighborIndex> for StoredIndex {
    fn from(index: NeighborIndex) -> Self {
        Self {
            n_features: index.n_features,
            rows: index.rows,
        }
    }
}

/// Cosine distance `1 - a·b / (|a||b|)`, clipped to `[0, 2]`.
///
/// A zero vector has similarity 0 with everything, so distance 1.
pub fn cosine_distance(a: &[f64], norm_a: f64, b: &[f64], norm_b: f64) -> f64 {
    if norm_a == 0.0 || norm_b == 0.0 {
        return 1.0;
    }
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    (1.0 - dot / (norm_a * norm_b)).clamp(0.0, 2.0)
}

fn l2_norm(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

impl NeighborIndex {
    /// Fit the index over every row of the matrix.
    pub fn fit(matrix: &InteractionMatrix) -> Self {
        let rows = (0..matrix.rows())
            .map(|r| matrix.row(r).iter().map(|&c| f64::from(c)).collect())
            .collect();

        StoredIndex {
            n_features: matrix.cols(),
            rows,
        }
        .into()
    }

    /// Number of fitted rows.
    pub fn n_samples(&self) -> usize {
        self.rows.len()
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Rows, norms and feature width agree with each other.
    pub fn is_consistent(&self) -> bool {
        self.rows.len() == self.norms.len()
            && self.rows.iter().all(|r| r.len() == self.n_features)
    }

    /// The `k` fitted rows closest to `vector`, ties broken by row index.
    ///
    /// `k` is clamped to the number of fitted rows.
    pub fn query(&self, vector: &[f64], k: usize) -> Result<Neighbors, AppError> {
        if k == 0 {
            return Err(AppError::NeighborQuery(
                "Expected n_neighbors > 0".to_string(),
            ));
        }
        if self.rows.is_empty() {
            return Err(AppError::NeighborQuery("Index has no fitted rows".to_string()));
        }
        if vector.len() != self.n_features {
            return Err(AppError::NeighborQuery(format!(
                "Query has {} features, index was fitted with {}",
                vector.len(),
                self.n_features
            )));
        }

        let query_norm = l2_norm(vector);
        let mut scored: Vec<(usize, f64)> = self
            .rows
            .iter()
            .zip(&self.norms)
            .enumerate()
            .map(|(i, (row, &norm))| (i, cosine_distance(vector, query_norm, row, norm)))
            .collect();

        scored.sort_by(|a, b| {
            a.1.partial_cmp(&b.1)
                .unwrap_or(Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });
        scored.truncate(k.min(self.rows.len()));

        Ok(Neighbors {
            distances: scored.iter().map(|&(_, d)| d).collect(),
            indices: scored.iter().map(|&(i, _)| i).collect(),
        })
    }
}
