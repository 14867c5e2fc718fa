//! End-to-end orchestration of one analysis pass.
//!
//! A pass is strictly one-way: load → vectorize → estimate diversity →
//! select → report. Each stage consumes its input and produces a new
//! immutable artifact; nothing is recomputed or mutated after the fact.

use std::path::PathBuf;

use log::info;
use thiserror::Error;

use crate::diversity::diversity_scores;
use crate::features::vectorize;
use crate::records::{load_outcomes, ExecTimes, ScenarioOutcome};
use crate::report::{self, SuiteTotals};
use crate::select::additional_greedy;

/// Errors that abort an analysis pass. Anything recoverable (an unreadable
/// record file, a non-finite candidate score) is logged and worked around
/// instead.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("record store not found: {0}")]
    RecordStoreMissing(PathBuf),

    #[error("no scenario outcomes could be loaded from {0}")]
    EmptySuite(PathBuf),

    #[error("invalid execution-times file {path}: {reason}")]
    ExecTimes { path: PathBuf, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration for one pass.
#[derive(Clone, Debug)]
pub struct AnalysisConfig {
    /// Record-store root to ingest.
    pub input_dir: PathBuf,
    /// Root under which the timestamped run directory is created.
    pub output_dir: PathBuf,
    /// Execution time assumed for records without a measured entry.
    pub default_exec_time: f64,
    /// Optional measured execution times: a JSON object mapping record
    /// file name to seconds.
    pub exec_times_file: Option<PathBuf>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            input_dir: PathBuf::from("simulation_output"),
            output_dir: PathBuf::from("analysis_results"),
            default_exec_time: crate::records::DEFAULT_EXEC_TIME_SECONDS,
            exec_times_file: None,
        }
    }
}

/// One loaded suite with every per-scenario artifact, index-aligned with
/// the outcome ids.
#[derive(Debug)]
pub struct AnalyzedSuite {
    pub outcomes: Vec<ScenarioOutcome>,
    pub collisions: Vec<bool>,
    pub exec_times: Vec<f64>,
    pub diversity: Vec<f64>,
}

impl AnalyzedSuite {
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Totals over the whole suite.
    pub fn totals(&self) -> SuiteTotals {
        SuiteTotals::tally(0..self.len(), &self.outcomes, &self.diversity)
    }

    /// Totals over a subset of ids.
    pub fn totals_for(&self, ids: &[usize]) -> SuiteTotals {
        SuiteTotals::tally(ids.iter().copied(), &self.outcomes, &self.diversity)
    }
}

/// Load a suite and compute every per-scenario artifact, without selecting.
///
/// Fatal conditions: the record store root does not exist, no outcome
/// loads, or a requested execution-times file cannot be used.
pub fn analyze_suite(config: &AnalysisConfig) -> Result<AnalyzedSuite, AnalysisError> {
    let exec = load_exec_times(config)?;

    let outcomes = load_outcomes(&config.input_dir, &exec)
        .ok_or_else(|| AnalysisError::RecordStoreMissing(config.input_dir.clone()))?;
    if outcomes.is_empty() {
        return Err(AnalysisError::EmptySuite(config.input_dir.clone()));
    }

    let collisions: Vec<bool> = outcomes.iter().map(|o| o.kind.is_collision()).collect();
    let exec_times: Vec<f64> = outcomes.iter().map(|o| o.exec_time_seconds).collect();

    let features = vectorize(&outcomes);
    info!(
        "Vectorized {} scenarios into {} feature columns",
        features.num_rows(),
        features.num_columns()
    );
    let diversity = diversity_scores(&features);

    Ok(AnalyzedSuite {
        outcomes,
        collisions,
        exec_times,
        diversity,
    })
}

/// Full pass: analyze, select, assemble, and write the report. Returns the
/// analyzed suite, the selection in pick order, and the report path.
pub fn run_analysis(
    config: &AnalysisConfig,
) -> Result<(AnalyzedSuite, Vec<usize>, PathBuf), AnalysisError> {
    let suite = analyze_suite(config)?;

    let selected = additional_greedy(&suite.collisions, &suite.exec_times, &suite.diversity);
    info!(
        "Selected {} of {} scenarios",
        selected.len(),
        suite.len()
    );

    let report = report::assemble(
        &config.input_dir.to_string_lossy(),
        &suite.outcomes,
        &suite.diversity,
        &selected,
    );
    let path = report::save(&report, &config.output_dir)?;
    info!("Report written to {}", path.display());

    Ok((suite, selected, path))
}

fn load_exec_times(config: &AnalysisConfig) -> Result<ExecTimes, AnalysisError> {
    let Some(path) = &config.exec_times_file else {
        return Ok(ExecTimes::fixed(config.default_exec_time));
    };

    let text = std::fs::read_to_string(path).map_err(|e| AnalysisError::ExecTimes {
        path: path.clone(),
        reason: e.to_string(),
    })?;
    ExecTimes::from_json(&text, config.default_exec_time).map_err(|e| AnalysisError::ExecTimes {
        path: path.clone(),
        reason: e.to_string(),
    })
}
