//! Pairwise Manhattan dissimilarity and per-scenario diversity scores.

use rayon::prelude::*;

use crate::features::FeatureMatrix;

// ── Distance matrix ──

/// Dense symmetric N×N distance matrix with a zero diagonal.
pub struct DistanceMatrix {
    n: usize,
    values: Vec<f64>,
}

impl DistanceMatrix {
    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    #[inline(always)]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        debug_assert!(i < self.n && j < self.n);
        self.values[i * self.n + j]
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.values[i * self.n..(i + 1) * self.n]
    }
}

/// Full pairwise Manhattan distances between feature rows.
///
/// Rows are independent, so the outer loop runs in parallel; inner
/// summation order is fixed, so the result is identical for any thread
/// count.
pub fn manhattan_distances(features: &FeatureMatrix) -> DistanceMatrix {
    let n = features.num_rows();
    let values: Vec<f64> = (0..n)
        .into_par_iter()
        .flat_map_iter(|i| {
            let row_i = features.row(i);
            (0..n).map(move |j| manhattan(row_i, features.row(j)))
        })
        .collect();

    DistanceMatrix { n, values }
}

#[inline(always)]
fn manhattan(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b).map(|(x, y)| (x - y).abs()).sum()
}

/// Mean distance from each scenario to all others.
///
/// Batches with fewer than two rows or no feature columns have nothing to
/// compare against and score 0.0 everywhere; that is a valid result, not an
/// error.
pub fn diversity_scores(features: &FeatureMatrix) -> Vec<f64> {
    let n = features.num_rows();
    if n < 2 || features.num_columns() == 0 {
        return vec![0.0; n];
    }

    let distances = manhattan_distances(features);
    (0..n)
        .map(|i| {
            let row = distances.row(i);
            let sum: f64 = row.iter().sum();
            (sum - row[i]) / (n - 1) as f64
        })
        .collect()
}
