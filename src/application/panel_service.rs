// Panel service - Resolves configured panels into chart specifications
use crate::application::result_source::ResultSource;
use crate::domain::chart::ChartSpec;
use crate::domain::error::DashboardError;
use crate::domain::result::{records_from_rows, ResultRecord};
use crate::infrastructure::config::PanelConfig;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PanelError {
    #[error(transparent)]
    Dashboard(#[from] DashboardError),

    #[error("failed to load dataset '{dataset}': {error:#}")]
    Source { dataset: String, error: anyhow::Error },
}

#[derive(Clone)]
pub struct PanelService {
    source: Arc<dyn ResultSource>,
}

impl PanelService {
    pub fn new(source: Arc<dyn ResultSource>) -> Self {
        Self { source }
    }

    pub async fn list_datasets(&self) -> anyhow::Result<Vec<String>> {
        self.source.list_datasets().await
    }

    /// Build every configured panel, skipping the ones that fail.
    pub async fn build_panels(&self, panels: &[PanelConfig]) -> Vec<ChartSpec> {
        let mut specs = Vec::with_capacity(panels.len());

        for panel in panels {
            match self.build_panel(panel).await {
                Ok(spec) => {
                    tracing::debug!("Built panel {}", panel.id);
                    specs.push(spec);
                }
                Err(e) => {
                    tracing::warn!("Skipping panel {}: {}", panel.id, e);
                }
            }
        }

        specs
    }

    pub async fn build_panel(&self, panel: &PanelConfig) -> Result<ChartSpec, PanelError> {
        let records = self.resolve_records(panel).await?;
        Ok(panel.chart.build(&records)?)
    }

    async fn resolve_records(&self, panel: &PanelConfig) -> Result<Vec<ResultRecord>, PanelError> {
        // Inline records take precedence over a dataset
        if !panel.records.is_empty() {
            return Ok(panel.records.clone());
        }

        let Some(dataset) = &panel.dataset else {
            return Err(DashboardError::invalid(format!(
                "panel '{}' has neither records nor a dataset",
                panel.id
            ))
            .into());
        };
        let Some(metric_field) = &panel.metric_field else {
            return Err(DashboardError::invalid(format!(
                "panel '{}' reads dataset '{}' but names no metric_field",
                panel.id, dataset
            ))
            .into());
        };

        let rows = self
            .source
            .fetch_rows(dataset)
            .await
            .map_err(|error| PanelError::Source {
                dataset: dataset.clone(),
                error,
            })?;

        tracing::debug!("Dataset {} returned {} rows for panel {}", dataset, rows.len(), panel.id);

        Ok(records_from_rows(&rows, &panel.category_field, metric_field)?)
    }
}
