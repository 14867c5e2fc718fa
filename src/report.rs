//! Report assembly and persistence for a completed analysis pass.
//!
//! The report is a single JSON document: totals over the full suite,
//! totals over the selected subset, and one detail entry per selected
//! scenario in pick order. It is assembled whole after the pass succeeds
//! and written under a timestamped run directory.

use std::path::{Path, PathBuf};

use chrono::Local;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::records::ScenarioOutcome;

/// Placeholder for scalar fields the record never carried.
const ABSENT: &str = "N/A";

// ── Report JSON types ──

#[derive(Serialize)]
pub struct AnalysisReport {
    pub input_folder: String,
    pub total_scenarios_analyzed: usize,
    pub initial_suite_stats: SuiteStatsJson,
    pub selected_suite_stats: SelectedSuiteStatsJson,
    pub details_of_selected_scenarios: Vec<SelectedScenarioJson>,
}

#[derive(Serialize)]
pub struct SuiteStatsJson {
    pub total_collisions: usize,
    pub total_execution_time_seconds: String,
    pub sum_diversity_scores: String,
}

#[derive(Serialize)]
pub struct SelectedSuiteStatsJson {
    pub num_selected_scenarios: usize,
    pub selected_scenario_indices: Vec<usize>,
    pub total_collisions_covered: usize,
    pub total_execution_time_seconds: String,
    pub sum_diversity_scores: String,
}

#[derive(Serialize)]
pub struct SelectedScenarioJson {
    pub index_in_original_list: usize,
    pub original_filename: String,
    pub event_type: String,
    pub timestamp_of_event: Value,
    pub map_town: String,
    pub road_type_at_collision: String,
    pub weather_details: Map<String, Value>,
    pub town_characteristics: Map<String, Value>,
    pub diversity_score: String,
}

// ── Aggregation ──

/// Totals over a set of scenarios. Built fresh for every aggregation; no
/// state survives between runs.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SuiteTotals {
    pub collisions: usize,
    pub exec_time_seconds: f64,
    pub diversity: f64,
}

impl SuiteTotals {
    /// Accumulate totals over the outcomes with the given ids.
    pub fn tally(
        ids: impl IntoIterator<Item = usize>,
        outcomes: &[ScenarioOutcome],
        diversity: &[f64],
    ) -> SuiteTotals {
        let mut totals = SuiteTotals::default();
        for id in ids {
            if outcomes[id].kind.is_collision() {
                totals.collisions += 1;
            }
            totals.exec_time_seconds += outcomes[id].exec_time_seconds;
            totals.diversity += diversity[id];
        }
        totals
    }
}

// ── Assembly ──

/// Build the report document for one completed pass. `selected` is in pick
/// order and the detail entries preserve it.
pub fn assemble(
    input_folder: &str,
    outcomes: &[ScenarioOutcome],
    diversity: &[f64],
    selected: &[usize],
) -> AnalysisReport {
    let initial = SuiteTotals::tally(0..outcomes.len(), outcomes, diversity);
    let picked = SuiteTotals::tally(selected.iter().copied(), outcomes, diversity);

    let details: Vec<SelectedScenarioJson> = selected
        .iter()
        .map(|&id| {
            let o = &outcomes[id];
            SelectedScenarioJson {
                index_in_original_list: id,
                original_filename: o.source_name.clone(),
                event_type: o.kind.label().unwrap_or(ABSENT).to_string(),
                timestamp_of_event: o
                    .timestamp
                    .clone()
                    .unwrap_or_else(|| Value::String(ABSENT.to_string())),
                map_town: o.town.clone().unwrap_or_else(|| ABSENT.to_string()),
                road_type_at_collision: o.kind.road_type().unwrap_or(ABSENT).to_string(),
                weather_details: o.weather.clone(),
                town_characteristics: o.town_characteristics.clone(),
                diversity_score: format!("{:.3}", diversity[id]),
            }
        })
        .collect();

    AnalysisReport {
        input_folder: input_folder.to_string(),
        total_scenarios_analyzed: outcomes.len(),
        initial_suite_stats: SuiteStatsJson {
            total_collisions: initial.collisions,
            total_execution_time_seconds: format!("{:.2}", initial.exec_time_seconds),
            sum_diversity_scores: format!("{:.3}", initial.diversity),
        },
        selected_suite_stats: SelectedSuiteStatsJson {
            num_selected_scenarios: selected.len(),
            selected_scenario_indices: selected.to_vec(),
            total_collisions_covered: picked.collisions,
            total_execution_time_seconds: format!("{:.2}", picked.exec_time_seconds),
            sum_diversity_scores: format!("{:.3}", picked.diversity),
        },
        details_of_selected_scenarios: details,
    }
}

/// Create a timestamped run directory under `output_root` and write the
/// report as pretty-printed JSON. Returns the report path.
pub fn save(report: &AnalysisReport, output_root: &Path) -> std::io::Result<PathBuf> {
    let run_dir = output_root.join(format!("run_{}", Local::now().format("%Y%m%d_%H%M%S")));
    std::fs::create_dir_all(&run_dir)?;

    let path = run_dir.join("analysis_report.json");
    let json = serde_json::to_string_pretty(report).map_err(std::io::Error::other)?;
    std::fs::write(&path, json)?;
    Ok(path)
}
