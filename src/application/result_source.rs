// Source trait for materialized simulation result datasets
use crate::domain::result::ResultRow;
use async_trait::async_trait;

#[async_trait]
pub trait ResultSource: Send + Sync {
    /// Fetch every row of a named summary table (e.g. `strategy_performance`)
    async fn fetch_rows(&self, dataset: &str) -> anyhow::Result<Vec<ResultRow>>;

    /// List the dataset names this source can serve
    async fn list_datasets(&self) -> anyhow::Result<Vec<String>>;
}
