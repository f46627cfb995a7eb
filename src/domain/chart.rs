// Chart specification domain models
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::error::DashboardError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Line,
    Scatter,
}

/// One renderable series: index-aligned category/value pairs plus a display kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    pub kind: ChartKind,
    pub label: String,
    pub categories: Vec<String>,
    pub values: Vec<f64>,
}

impl Trace {
    pub fn new(kind: ChartKind, label: String, categories: Vec<String>, values: Vec<f64>) -> Self {
        Self {
            kind,
            label,
            categories,
            values,
        }
    }

    pub fn validate(&self) -> Result<(), DashboardError> {
        if self.categories.len() != self.values.len() {
            return Err(DashboardError::invalid(format!(
                "trace '{}' has {} categories but {} values",
                self.label,
                self.categories.len(),
                self.values.len()
            )));
        }

        let mut seen = HashSet::with_capacity(self.categories.len());
        for category in &self.categories {
            if category.is_empty() {
                return Err(DashboardError::invalid(format!(
                    "trace '{}' contains an empty category",
                    self.label
                )));
            }
            if !seen.insert(category.as_str()) {
                return Err(DashboardError::invalid(format!(
                    "trace '{}' repeats category '{}'",
                    self.label, category
                )));
            }
        }

        if let Some(i) = self.values.iter().position(|v| !v.is_finite()) {
            return Err(DashboardError::invalid(format!(
                "trace '{}' has a non-finite value for '{}'",
                self.label, self.categories[i]
            )));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub x_axis_label: String,
    #[serde(default)]
    pub y_axis_label: String,
}

impl Layout {
    pub fn new(
        title: impl Into<String>,
        x_axis_label: impl Into<String>,
        y_axis_label: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            x_axis_label: x_axis_label.into(),
            y_axis_label: y_axis_label.into(),
        }
    }
}

/// Declarative description of one chart, independent of any rendering technology.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub traces: Vec<Trace>,
    pub layout: Layout,
}

impl ChartSpec {
    pub fn new(traces: Vec<Trace>, layout: Layout) -> Result<Self, DashboardError> {
        let spec = Self { traces, layout };
        spec.validate()?;
        Ok(spec)
    }

    /// Checks every trace invariant. Specs arriving from outside the builder
    /// (e.g. deserialized request bodies) must pass this before display.
    pub fn validate(&self) -> Result<(), DashboardError> {
        if self.traces.is_empty() {
            return Err(DashboardError::invalid(format!(
                "chart '{}' has no traces",
                self.layout.title
            )));
        }
        self.traces.iter().try_for_each(Trace::validate)
    }
}
