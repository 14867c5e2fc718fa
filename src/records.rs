//! Scenario-outcome records: wire model, record-store loader, execution times.

use std::collections::HashMap;
use std::path::Path;

use log::{info, warn};
use serde::Deserialize;
use serde_json::{Map, Value};
use walkdir::WalkDir;

/// Event tag the recorder writes for a scenario that ended in a collision.
pub const COLLISION_EVENT: &str = "collision";

/// Execution time assumed for a record without a measured entry.
pub const DEFAULT_EXEC_TIME_SECONDS: f64 = 60.0;

// ── Outcome kind ──

/// What the recorded scenario ended in. Only `Collision` counts toward the
/// selector's coverage target; every other tag (or none at all) is a
/// non-incident.
#[derive(Clone, Debug, PartialEq)]
pub enum OutcomeKind {
    Collision { road_type: Option<String> },
    NoIncident { tag: Option<String> },
}

impl OutcomeKind {
    pub fn is_collision(&self) -> bool {
        matches!(self, OutcomeKind::Collision { .. })
    }

    /// The raw event tag, when the record carried one.
    pub fn label(&self) -> Option<&str> {
        match self {
            OutcomeKind::Collision { .. } => Some(COLLISION_EVENT),
            OutcomeKind::NoIncident { tag } => tag.as_deref(),
        }
    }

    /// Road type at the point of impact. Always None for non-collisions.
    pub fn road_type(&self) -> Option<&str> {
        match self {
            OutcomeKind::Collision { road_type } => road_type.as_deref(),
            OutcomeKind::NoIncident { .. } => None,
        }
    }
}

// ── Scenario outcome ──

/// One accepted scenario record, normalized for the pipeline.
#[derive(Clone, Debug)]
pub struct ScenarioOutcome {
    /// Dense index in load order; doubles as the selection id.
    pub id: usize,
    /// Name of the originating record file.
    pub source_name: String,
    pub kind: OutcomeKind,
    /// Raw event timestamp, echoed into reports untouched.
    pub timestamp: Option<Value>,
    pub town: Option<String>,
    /// Raw nested maps, kept whole for reporting. Feature extraction reads
    /// them through the attribute schema, never by key discovery.
    pub weather: Map<String, Value>,
    pub town_characteristics: Map<String, Value>,
    /// Execution cost in seconds.
    pub exec_time_seconds: f64,
}

// ── Wire format ──

/// First element of a record file's event array, as the recorder writes it.
/// Unknown fields are ignored.
#[derive(Deserialize)]
struct RawEvent {
    event_type: Option<String>,
    timestamp: Option<Value>,
    town: Option<String>,
    road_type_at_collision: Option<String>,
    #[serde(default)]
    weather: Map<String, Value>,
    #[serde(default)]
    town_characteristics: Map<String, Value>,
}

// ── Execution times ──

/// Per-record execution times in seconds, keyed by record file name.
/// Records without a measured entry fall back to the fixed default.
pub struct ExecTimes {
    default_seconds: f64,
    measured: HashMap<String, f64>,
}

impl ExecTimes {
    /// A fixed time for every record.
    pub fn fixed(default_seconds: f64) -> ExecTimes {
        ExecTimes {
            default_seconds,
            measured: HashMap::new(),
        }
    }

    /// Parse a measured-times document: a JSON object of file name → seconds.
    pub fn from_json(text: &str, default_seconds: f64) -> serde_json::Result<ExecTimes> {
        let measured: HashMap<String, f64> = serde_json::from_str(text)?;
        Ok(ExecTimes {
            default_seconds,
            measured,
        })
    }

    pub fn seconds_for(&self, file_name: &str) -> f64 {
        self.measured
            .get(file_name)
            .copied()
            .unwrap_or(self.default_seconds)
    }
}

// ── Loader ──

/// Load every record file under `root`, skipping files that cannot be used.
///
/// Traversal is depth-first with directory entries sorted by file name, so
/// ids are stable across runs and platforms. A file is skipped (with a
/// warning) when it is unreadable, fails to parse as JSON, is not a
/// top-level array, is empty, or its first event is not an event object.
///
/// Returns None when `root` itself does not exist. An existing root with no
/// usable files returns an empty Vec; whether that is an error is the
/// caller's call.
pub fn load_outcomes(root: &Path, exec: &ExecTimes) -> Option<Vec<ScenarioOutcome>> {
    if !root.exists() {
        return None;
    }

    let mut outcomes: Vec<ScenarioOutcome> = Vec::new();
    for entry in WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
    {
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if !name.ends_with(".json") {
            continue;
        }

        let text = match std::fs::read_to_string(entry.path()) {
            Ok(t) => t,
            Err(e) => {
                warn!("Cannot read {}: {}", entry.path().display(), e);
                continue;
            }
        };

        match parse_first_event(&text) {
            Ok(event) => {
                let id = outcomes.len();
                outcomes.push(outcome_from_event(id, name, event, exec));
            }
            Err(reason) => warn!("Skipping {}: {}", name, reason),
        }
    }

    info!(
        "Loaded {} scenario outcomes from {}",
        outcomes.len(),
        root.display()
    );
    Some(outcomes)
}

/// A record file holds an array of events; only the first is the scenario's
/// representative outcome, the rest are ignored.
fn parse_first_event(text: &str) -> Result<RawEvent, String> {
    let doc: Value = serde_json::from_str(text).map_err(|e| format!("invalid JSON ({})", e))?;
    let events = doc
        .as_array()
        .ok_or_else(|| "top level is not an event array".to_string())?;
    let first = events
        .first()
        .ok_or_else(|| "event array is empty".to_string())?;
    serde_json::from_value(first.clone()).map_err(|e| format!("malformed event ({})", e))
}

fn outcome_from_event(
    id: usize,
    source_name: String,
    event: RawEvent,
    exec: &ExecTimes,
) -> ScenarioOutcome {
    let kind = match event.event_type {
        Some(tag) if tag == COLLISION_EVENT => OutcomeKind::Collision {
            road_type: event.road_type_at_collision,
        },
        other => OutcomeKind::NoIncident { tag: other },
    };
    let exec_time_seconds = exec.seconds_for(&source_name);

    ScenarioOutcome {
        id,
        source_name,
        kind,
        timestamp: event.timestamp,
        town: event.town,
        weather: event.weather,
        town_characteristics: event.town_characteristics,
        exec_time_seconds,
    }
}
