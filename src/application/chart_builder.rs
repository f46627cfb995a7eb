// Chart spec builder - Pure mapping from result records to chart specifications
use crate::domain::chart::{ChartKind, ChartSpec, Layout, Trace};
use crate::domain::error::DashboardError;
use crate::domain::result::ResultRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Reduction applied to records that share a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    Mean,
    Sum,
    Min,
    Max,
    Count,
}

impl Aggregation {
    /// `values` is never empty: every group holds at least the record that created it.
    pub fn apply(self, values: &[f64]) -> f64 {
        match self {
            // Incremental mean, summing first overflows on large metrics
            Aggregation::Mean => values
                .iter()
                .enumerate()
                .fold(0.0, |mean, (i, x)| mean + (x - mean) / (i + 1) as f64),
            Aggregation::Sum => values.iter().sum(),
            Aggregation::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
            Aggregation::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            Aggregation::Count => values.len() as f64,
        }
    }
}

/// Describes one chart to build from a record set.
///
/// The same shape is read from `[[panels]]` in the dashboard config and from
/// HTTP request bodies, so every field except `kind` has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpecBuilder {
    pub kind: ChartKind,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub x_axis_label: String,
    #[serde(default)]
    pub y_axis_label: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub aggregation: Option<Aggregation>,
}

impl ChartSpecBuilder {
    pub fn new(kind: ChartKind) -> Self {
        Self {
            kind,
            title: String::new(),
            x_axis_label: String::new(),
            y_axis_label: String::new(),
            label: None,
            aggregation: None,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn axis_labels(mut self, x: impl Into<String>, y: impl Into<String>) -> Self {
        self.x_axis_label = x.into();
        self.y_axis_label = y.into();
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn aggregate(mut self, aggregation: Aggregation) -> Self {
        self.aggregation = Some(aggregation);
        self
    }

    /// Build a single-trace chart whose categories follow first-seen order.
    ///
    /// Records sharing a category are only accepted when an aggregation was
    /// requested. Nothing is returned unless every record is usable.
    pub fn build(&self, records: &[ResultRecord]) -> Result<ChartSpec, DashboardError> {
        if records.is_empty() {
            return Err(DashboardError::invalid("no result records to chart"));
        }

        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut groups: Vec<(&str, Vec<f64>)> = Vec::new();

        for (i, record) in records.iter().enumerate() {
            if record.category.is_empty() {
                return Err(DashboardError::invalid(format!("record {} has an empty category", i)));
            }
            if !record.metric.is_finite() {
                return Err(DashboardError::invalid(format!(
                    "record {} ('{}') has a non-finite metric",
                    i, record.category
                )));
            }

            let existing = index.get(record.category.as_str()).copied();
            match existing {
                Some(slot) => {
                    if self.aggregation.is_none() {
                        return Err(DashboardError::invalid(format!(
                            "duplicate category '{}' and no aggregation supplied",
                            record.category
                        )));
                    }
                    groups[slot].1.push(record.metric);
                }
                None => {
                    index.insert(record.category.as_str(), groups.len());
                    groups.push((record.category.as_str(), vec![record.metric]));
                }
            }
        }

        let mut categories = Vec::with_capacity(groups.len());
        let mut values = Vec::with_capacity(groups.len());
        for (category, metrics) in groups {
            let value = match self.aggregation {
                Some(aggregation) => aggregation.apply(&metrics),
                None => metrics[0],
            };
            if !value.is_finite() {
                return Err(DashboardError::invalid(format!(
                    "aggregated metric for '{}' is not finite",
                    category
                )));
            }
            categories.push(category.to_string());
            values.push(value);
        }

        let trace = Trace::new(self.kind, self.trace_label(), categories, values);
        ChartSpec::new(
            vec![trace],
            Layout::new(
                self.title.clone(),
                self.x_axis_label.clone(),
                self.y_axis_label.clone(),
            ),
        )
    }

    fn trace_label(&self) -> String {
        match &self.label {
            Some(label) => label.clone(),
            None if !self.y_axis_label.is_empty() => self.y_axis_label.clone(),
            None => self.title.clone(),
        }
    }
}
