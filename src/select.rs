//! Coverage-driven greedy selection over scored scenarios.

use log::warn;

/// Floor for the normalized execution time, keeping scores finite for
/// near-zero costs.
pub const MIN_NORMALIZED_EXEC_TIME: f64 = 0.0001;

/// Largest execution time in the batch, used as the normalization base.
/// A batch with no positive time normalizes against 1.0.
pub fn max_exec_time(exec_times: &[f64]) -> f64 {
    let max = exec_times.iter().cloned().fold(0.0, f64::max);
    if max > 0.0 {
        max
    } else {
        1.0
    }
}

/// Select scenarios until every collision occurrence is covered.
///
/// Each round scores every unselected scenario as
/// `(0.5 * diversity + 0.5 * collision_flag) / normalized_exec_time` and
/// takes the strict maximum, lowest id on ties. Selecting a
/// collision-flagged scenario advances the coverage count; the loop ends
/// when the count reaches the number of collision-flagged scenarios in the
/// pool, or when no candidate is left to pick. A pool with no collisions
/// at all is returned whole, in id order.
///
/// A candidate whose score comes out non-finite is passed over for that
/// round only. The returned ids are in pick order.
pub fn additional_greedy(collisions: &[bool], exec_times: &[f64], diversity: &[f64]) -> Vec<usize> {
    let n = collisions.len();
    debug_assert_eq!(n, exec_times.len());
    debug_assert_eq!(n, diversity.len());

    let p = collisions.iter().filter(|&&c| c).count();
    if p == 0 {
        return (0..n).collect();
    }

    let max_exec = max_exec_time(exec_times);
    let mut selected: Vec<usize> = Vec::new();
    let mut used = vec![false; n];
    let mut covered = 0usize;

    while covered < p {
        let mut best: Option<(usize, f64)> = None;
        for i in 0..n {
            if used[i] {
                continue;
            }
            let norm_exec = (exec_times[i] / max_exec).max(MIN_NORMALIZED_EXEC_TIME);
            let flag = if collisions[i] { 1.0 } else { 0.0 };
            let score = (0.5 * diversity[i] + 0.5 * flag) / norm_exec;
            if !score.is_finite() {
                warn!("Scenario {} scored non-finite; passing it over this round", i);
                continue;
            }
            match best {
                Some((_, top)) if score <= top => {}
                _ => best = Some((i, score)),
            }
        }

        match best {
            Some((idx, _)) => {
                used[idx] = true;
                if collisions[idx] {
                    covered += 1;
                }
                selected.push(idx);
            }
            None => {
                warn!(
                    "Candidates exhausted with {} of {} collisions covered",
                    covered, p
                );
                break;
            }
        }
    }

    selected
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn covers_both_collisions_in_a_mixed_pool() {
        // Five scenarios, uniform cost, collisions at 1 and 4.
        let collisions = [false, true, false, false, true];
        let exec_times = [60.0; 5];
        let diversity = [0.1, 0.9, 0.2, 0.5, 0.05];

        // Scores: [0.05, 0.95, 0.10, 0.25, 0.525] → 1 first, then 4.
        let selected = additional_greedy(&collisions, &exec_times, &diversity);
        assert_eq!(selected, vec![1, 4]);
    }

    #[test]
    fn no_collisions_returns_the_whole_pool_in_order() {
        let collisions = [false; 4];
        let exec_times = [60.0, 30.0, 90.0, 10.0];
        let diversity = [0.2, 0.9, 0.1, 0.5];

        let selected = additional_greedy(&collisions, &exec_times, &diversity);
        assert_eq!(selected, vec![0, 1, 2, 3]);
    }

    #[test]
    fn ties_break_toward_the_lowest_id() {
        let collisions = [true, true];
        let exec_times = [60.0, 60.0];
        let diversity = [0.3, 0.3];

        let selected = additional_greedy(&collisions, &exec_times, &diversity);
        assert_eq!(selected, vec![0, 1]);
    }

    #[test]
    fn cheap_scenarios_win_on_equal_diversity() {
        // Same diversity, same flag; the cheaper scenario scores higher.
        let collisions = [true, true];
        let exec_times = [60.0, 15.0];
        let diversity = [0.4, 0.4];

        let selected = additional_greedy(&collisions, &exec_times, &diversity);
        assert_eq!(selected, vec![1, 0]);
    }

    #[test]
    fn high_diversity_non_collision_can_precede_a_collision() {
        let collisions = [true, false];
        let exec_times = [60.0, 60.0];
        let diversity = [0.1, 3.0];

        // Scores: 0.55 vs 1.5; the loop keeps going until the collision
        // is covered.
        let selected = additional_greedy(&collisions, &exec_times, &diversity);
        assert_eq!(selected, vec![1, 0]);
    }

    #[test]
    fn zero_exec_times_stay_finite_through_the_floor() {
        let collisions = [true, false];
        let exec_times = [0.0, 0.0];
        let diversity = [0.2, 0.8];

        // max normalizes to 1.0, each time floors to 0.0001.
        let selected = additional_greedy(&collisions, &exec_times, &diversity);
        assert_eq!(selected, vec![0]);
    }

    #[test]
    fn non_finite_scores_are_skipped_and_may_leave_coverage_short() {
        let collisions = [true, false];
        let exec_times = [60.0, 60.0];
        let diversity = [f64::INFINITY, 0.2];

        // The collision scenario never scores finite, so only the
        // non-collision one is picked and the loop gives up.
        let selected = additional_greedy(&collisions, &exec_times, &diversity);
        assert_eq!(selected, vec![1]);
    }

    #[test]
    fn single_collision_pool_selects_itself() {
        let selected = additional_greedy(&[true], &[60.0], &[0.0]);
        assert_eq!(selected, vec![0]);
    }

    #[test]
    fn single_quiet_scenario_passes_through() {
        let selected = additional_greedy(&[false], &[60.0], &[0.0]);
        assert_eq!(selected, vec![0]);
    }

    #[test]
    fn empty_pool_selects_nothing() {
        let selected = additional_greedy(&[], &[], &[]);
        assert!(selected.is_empty());
    }

    #[test]
    fn max_exec_time_handles_degenerate_batches() {
        assert_eq!(max_exec_time(&[60.0, 120.0, 30.0]), 120.0);
        assert_eq!(max_exec_time(&[0.0, 0.0]), 1.0);
        assert_eq!(max_exec_time(&[]), 1.0);
    }
}
