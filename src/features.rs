//! Feature vectorization: heterogeneous scenario outcomes → fixed-width
//! numeric rows.
//!
//! Numeric attributes are min-max scaled against the batch being vectorized,
//! so a feature value is only meaningful relative to its own batch.
//! Categorical attributes are one-hot encoded with categories in
//! lexicographic order, which keeps column layout reproducible for a given
//! input set.

use std::collections::BTreeSet;

use crate::records::ScenarioOutcome;
use crate::schema::{coerce_numeric, TOWN_ATTRIBUTES, WEATHER_ATTRIBUTES};

/// Literal category that absent categorical values fold into before
/// one-hot encoding.
pub const UNKNOWN_CATEGORY: &str = "Unknown";

// ── Feature matrix ──

/// Row-major feature matrix; row i belongs to the outcome with id i.
/// Zero-row and zero-column matrices are valid.
pub struct FeatureMatrix {
    num_rows: usize,
    columns: Vec<String>,
    values: Vec<f64>,
}

impl FeatureMatrix {
    /// Build a matrix from explicit rows. Every row must match the column
    /// count.
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<f64>>) -> FeatureMatrix {
        let width = columns.len();
        let mut values = Vec::with_capacity(rows.len() * width);
        for row in &rows {
            assert_eq!(row.len(), width, "row width must match column count");
            values.extend_from_slice(row);
        }
        FeatureMatrix {
            num_rows: rows.len(),
            columns,
            values,
        }
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Column labels: scaled numeric attributes first, then one-hot
    /// categories (`attribute_category`).
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[inline(always)]
    pub fn row(&self, i: usize) -> &[f64] {
        debug_assert!(i < self.num_rows);
        let width = self.columns.len();
        &self.values[i * width..(i + 1) * width]
    }
}

// ── Vectorization ──

/// Build the feature matrix for a batch of outcomes.
///
/// Numeric schema attributes become columns scaled to [0, 1] against this
/// batch; a missing value counts as 0.0 and takes part in the min/max, and
/// an attribute missing from every outcome contributes no column. A column
/// with no spread scales to all zeros. The `town` attribute is always
/// encoded; `road_type_at_collision` is encoded only when at least one
/// outcome carries a road type.
pub fn vectorize(outcomes: &[ScenarioOutcome]) -> FeatureMatrix {
    let n = outcomes.len();
    let mut columns: Vec<String> = Vec::new();
    let mut column_values: Vec<Vec<f64>> = Vec::new();

    // Numeric columns, in schema order.
    let mut numeric: Vec<(&str, Vec<Option<f64>>)> = Vec::new();
    for attr in WEATHER_ATTRIBUTES {
        let raw: Vec<Option<f64>> = outcomes
            .iter()
            .map(|o| o.weather.get(attr).and_then(coerce_numeric))
            .collect();
        numeric.push((attr, raw));
    }
    for attr in TOWN_ATTRIBUTES {
        let raw: Vec<Option<f64>> = outcomes
            .iter()
            .map(|o| o.town_characteristics.get(attr).and_then(coerce_numeric))
            .collect();
        numeric.push((attr, raw));
    }
    // Attributes no outcome carries contribute nothing.
    numeric.retain(|(_, raw)| raw.iter().any(Option::is_some));

    for (attr, raw) in numeric {
        columns.push(attr.to_string());
        column_values.push(min_max_scale(&raw));
    }

    // Categorical columns.
    let town_labels: Vec<&str> = outcomes
        .iter()
        .map(|o| o.town.as_deref().unwrap_or(UNKNOWN_CATEGORY))
        .collect();
    push_one_hot("town", &town_labels, &mut columns, &mut column_values);

    if outcomes.iter().any(|o| o.kind.road_type().is_some()) {
        let road_labels: Vec<&str> = outcomes
            .iter()
            .map(|o| o.kind.road_type().unwrap_or(UNKNOWN_CATEGORY))
            .collect();
        push_one_hot(
            "road_type_at_collision",
            &road_labels,
            &mut columns,
            &mut column_values,
        );
    }

    // Assemble row-major.
    let width = columns.len();
    let mut values = vec![0.0; n * width];
    for (c, column) in column_values.iter().enumerate() {
        for (r, &v) in column.iter().enumerate() {
            values[r * width + c] = v;
        }
    }

    FeatureMatrix {
        num_rows: n,
        columns,
        values,
    }
}

/// Zero-fill missing values, then scale the column to [0, 1] against its own
/// min/max. The fill happens before the min/max is taken, so missing values
/// pull the minimum down. A column with no spread becomes all zeros.
fn min_max_scale(raw: &[Option<f64>]) -> Vec<f64> {
    let filled: Vec<f64> = raw.iter().map(|v| v.unwrap_or(0.0)).collect();
    let min = filled.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = filled.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;

    if span > 0.0 {
        filled.iter().map(|v| (v - min) / span).collect()
    } else {
        vec![0.0; filled.len()]
    }
}

/// Append one 0/1 column per distinct category, categories in lexicographic
/// order.
fn push_one_hot(
    attr: &str,
    labels: &[&str],
    columns: &mut Vec<String>,
    column_values: &mut Vec<Vec<f64>>,
) {
    let categories: BTreeSet<&str> = labels.iter().copied().collect();
    for category in categories {
        let column: Vec<f64> = labels
            .iter()
            .map(|&l| if l == category { 1.0 } else { 0.0 })
            .collect();
        columns.push(format!("{}_{}", attr, category));
        column_values.push(column);
    }
}
