// JSON file adapter for simulation result datasets
use crate::application::result_source::ResultSource;
use crate::domain::result::ResultRow;
use anyhow::Context;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Reads `<directory>/<dataset>.json`, each file a JSON array of summary rows.
pub struct FileResultSource {
    directory: PathBuf,
}

impl FileResultSource {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    fn dataset_path(&self, dataset: &str) -> anyhow::Result<PathBuf> {
        if !is_dataset_name(dataset) {
            anyhow::bail!("invalid dataset name '{}'", dataset);
        }
        Ok(self.directory.join(format!("{}.json", dataset)))
    }
}

#[async_trait]
impl ResultSource for FileResultSource {
    async fn fetch_rows(&self, dataset: &str) -> anyhow::Result<Vec<ResultRow>> {
        let path = self.dataset_path(dataset)?;
        let contents = tokio::fs::read(&path)
            .await
            .with_context(|| format!("reading {}", path.display()))?;
        let rows: Vec<ResultRow> = serde_json::from_slice(&contents)
            .with_context(|| format!("parsing {}", path.display()))?;

        tracing::debug!("Loaded {} rows from {}", rows.len(), path.display());
        Ok(rows)
    }

    async fn list_datasets(&self) -> anyhow::Result<Vec<String>> {
        let mut entries = tokio::fs::read_dir(&self.directory)
            .await
            .with_context(|| format!("listing {}", self.directory.display()))?;

        let mut datasets = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if let Some(name) = dataset_name(&entry.path()) {
                datasets.push(name);
            }
        }
        datasets.sort();
        Ok(datasets)
    }
}

fn dataset_name(path: &Path) -> Option<String> {
    if path.extension()? != "json" {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    is_dataset_name(stem).then(|| stem.to_string())
}

// Keeps dataset lookups inside the data directory
fn is_dataset_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
