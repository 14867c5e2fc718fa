//! Property-based tests for scoring, distances, and selection.

use proptest::prelude::*;

use scenario_reduce::diversity::{diversity_scores, manhattan_distances};
use scenario_reduce::features::FeatureMatrix;
use scenario_reduce::select::{additional_greedy, max_exec_time};

/// Strategy: per-scenario (collision flag, exec seconds, diversity score).
fn suite_strategy() -> impl Strategy<Value = Vec<(bool, f64, f64)>> {
    prop::collection::vec((any::<bool>(), 0.0..600.0f64, 0.0..10.0f64), 0..40)
}

/// Strategy: a feature matrix with a shared width and values in [0, 1].
fn rows_strategy() -> impl Strategy<Value = Vec<Vec<f64>>> {
    (1usize..8).prop_flat_map(|width| {
        prop::collection::vec(prop::collection::vec(0.0..1.0f64, width), 0..16)
    })
}

fn matrix(rows: Vec<Vec<f64>>) -> FeatureMatrix {
    let width = rows.first().map_or(0, Vec::len);
    let columns = (0..width).map(|i| format!("f{}", i)).collect();
    FeatureMatrix::from_rows(columns, rows)
}

fn split(suite: &[(bool, f64, f64)]) -> (Vec<bool>, Vec<f64>, Vec<f64>) {
    let collisions = suite.iter().map(|s| s.0).collect();
    let exec_times = suite.iter().map(|s| s.1).collect();
    let diversity = suite.iter().map(|s| s.2).collect();
    (collisions, exec_times, diversity)
}

proptest! {
    // 1. Every collision occurrence ends up covered when all scores are finite
    #[test]
    fn selection_covers_every_collision(suite in suite_strategy()) {
        let (collisions, exec_times, diversity) = split(&suite);
        let p = collisions.iter().filter(|&&c| c).count();

        let selected = additional_greedy(&collisions, &exec_times, &diversity);
        let covered = selected.iter().filter(|&&i| collisions[i]).count();
        prop_assert_eq!(covered, p, "selected={:?}", selected);
    }

    // 2. A pool without collisions passes through whole, in id order
    #[test]
    fn no_collisions_is_a_full_passthrough(
        times_and_divs in prop::collection::vec((0.0..600.0f64, 0.0..10.0f64), 0..40),
    ) {
        let n = times_and_divs.len();
        let collisions = vec![false; n];
        let exec_times: Vec<f64> = times_and_divs.iter().map(|s| s.0).collect();
        let diversity: Vec<f64> = times_and_divs.iter().map(|s| s.1).collect();

        let selected = additional_greedy(&collisions, &exec_times, &diversity);
        prop_assert_eq!(selected, (0..n).collect::<Vec<usize>>());
    }

    // 3. Selection is deterministic
    #[test]
    fn selection_is_deterministic(suite in suite_strategy()) {
        let (collisions, exec_times, diversity) = split(&suite);
        let first = additional_greedy(&collisions, &exec_times, &diversity);
        let second = additional_greedy(&collisions, &exec_times, &diversity);
        prop_assert_eq!(first, second);
    }

    // 4. Selected ids are unique and in range
    #[test]
    fn selection_has_no_duplicates(suite in suite_strategy()) {
        let (collisions, exec_times, diversity) = split(&suite);
        let selected = additional_greedy(&collisions, &exec_times, &diversity);

        prop_assert!(selected.len() <= suite.len());
        let mut seen = vec![false; suite.len()];
        for &i in &selected {
            prop_assert!(i < suite.len());
            prop_assert!(!seen[i], "duplicate id {}", i);
            seen[i] = true;
        }
    }

    // 5. Normalization base dominates the batch and degrades to 1.0
    #[test]
    fn max_exec_time_bounds_the_batch(times in prop::collection::vec(0.0..600.0f64, 0..40)) {
        let max = max_exec_time(&times);
        prop_assert!(max > 0.0);
        for &t in &times {
            prop_assert!(t / max <= 1.0 + 1e-12);
        }
    }

    // 6. Zero-cost batches still select (the floor keeps scores finite)
    #[test]
    fn zero_exec_times_never_stall_selection(
        flags in prop::collection::vec(any::<bool>(), 1..30),
        divs in prop::collection::vec(0.0..10.0f64, 30),
    ) {
        let n = flags.len();
        let exec_times = vec![0.0; n];
        let p = flags.iter().filter(|&&c| c).count();

        let selected = additional_greedy(&flags, &exec_times, &divs[..n]);
        let covered = selected.iter().filter(|&&i| flags[i]).count();
        prop_assert_eq!(covered, p);
    }

    // 7. Distance matrix: symmetric, zero diagonal, non-negative
    #[test]
    fn distances_are_symmetric_and_non_negative(rows in rows_strategy()) {
        let m = matrix(rows);
        let d = manhattan_distances(&m);

        prop_assert_eq!(d.len(), m.num_rows());
        for i in 0..d.len() {
            prop_assert_eq!(d.get(i, i), 0.0);
            for j in 0..d.len() {
                prop_assert!(d.get(i, j) >= 0.0);
                prop_assert_eq!(d.get(i, j), d.get(j, i));
            }
        }
    }

    // 8. Diversity scores align with rows and stay non-negative
    #[test]
    fn diversity_aligns_with_rows(rows in rows_strategy()) {
        let m = matrix(rows);
        let scores = diversity_scores(&m);

        prop_assert_eq!(scores.len(), m.num_rows());
        for &s in &scores {
            prop_assert!(s >= 0.0);
            prop_assert!(s.is_finite());
        }
        if m.num_rows() < 2 {
            prop_assert!(scores.iter().all(|&s| s == 0.0));
        }
    }

    // 9. Diversity is reproducible for a fixed matrix
    #[test]
    fn diversity_is_deterministic(rows in rows_strategy()) {
        let first = diversity_scores(&matrix(rows.clone()));
        let second = diversity_scores(&matrix(rows));
        prop_assert_eq!(first, second);
    }
}
