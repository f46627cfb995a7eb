// Simulation result domain models
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::DashboardError;

/// One observation to visualize, e.g. a strategy and its average net profit/loss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub category: String,
    pub metric: f64,
}

impl ResultRecord {
    pub fn new(category: impl Into<String>, metric: f64) -> Self {
        Self {
            category: category.into(),
            metric,
        }
    }
}

/// A row of a summary table as produced by the simulation analytics step,
/// keyed by column name (`Strategy_Name`, `Win_Rate_Percentage`, ...).
pub type ResultRow = Map<String, Value>;

/// Project summary rows onto `(category, metric)` records.
///
/// Fails on the first row whose category column is not a string or whose
/// metric column is missing, null or non-numeric. Row order is preserved.
pub fn records_from_rows(
    rows: &[ResultRow],
    category_field: &str,
    metric_field: &str,
) -> Result<Vec<ResultRecord>, DashboardError> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let category = match row.get(category_field) {
                Some(Value::String(s)) => s.clone(),
                Some(other) => {
                    return Err(DashboardError::invalid(format!(
                        "row {}: column '{}' is not a string ({})",
                        i, category_field, other
                    )));
                }
                None => {
                    return Err(DashboardError::invalid(format!(
                        "row {}: missing column '{}'",
                        i, category_field
                    )));
                }
            };

            // pandas serializes NaN as null, which we treat as a non-finite metric
            let metric = match row.get(metric_field) {
                Some(Value::Number(n)) => n.as_f64().ok_or_else(|| {
                    DashboardError::invalid(format!(
                        "row {}: column '{}' is not representable as f64",
                        i, metric_field
                    ))
                })?,
                Some(Value::Null) => {
                    return Err(DashboardError::invalid(format!(
                        "row {}: column '{}' is null",
                        i, metric_field
                    )));
                }
                Some(other) => {
                    return Err(DashboardError::invalid(format!(
                        "row {}: column '{}' is not numeric ({})",
                        i, metric_field, other
                    )));
                }
                None => {
                    return Err(DashboardError::invalid(format!(
                        "row {}: missing column '{}'",
                        i, metric_field
                    )));
                }
            };

            Ok(ResultRecord::new(category, metric))
        })
        .collect()
}
