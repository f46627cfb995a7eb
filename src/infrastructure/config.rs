use crate::application::chart_builder::ChartSpecBuilder;
use crate::domain::result::ResultRecord;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    pub server: ServerSettings,
    pub data: DataSettings,
    #[serde(default)]
    pub panels: Vec<PanelConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_title")]
    pub title: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DataSettings {
    pub directory: String,
}

/// One chart on the dashboard: either inline records or a column pair of a dataset.
#[derive(Debug, Deserialize, Clone)]
pub struct PanelConfig {
    pub id: String,
    #[serde(default)]
    pub dataset: Option<String>,
    #[serde(default)]
    pub records: Vec<ResultRecord>,
    #[serde(default = "default_category_field")]
    pub category_field: String,
    #[serde(default)]
    pub metric_field: Option<String>,
    pub chart: ChartSpecBuilder,
}

fn default_bind_address() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_title() -> String {
    "CrapsSim Analytics Dashboard".to_string()
}

fn default_category_field() -> String {
    "Strategy_Name".to_string()
}

pub fn load_dashboard_config() -> anyhow::Result<DashboardConfig> {
    dashboard_config_from(config::File::with_name("config/dashboard"))
}

pub fn dashboard_config_from<S>(source: S) -> anyhow::Result<DashboardConfig>
where
    S: config::Source + Send + Sync + 'static,
{
    let settings = config::Config::builder().add_source(source).build()?;

    Ok(settings.try_deserialize()?)
}
