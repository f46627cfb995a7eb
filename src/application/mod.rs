// Application layer - Chart building, dashboard rendering and use cases
pub mod chart_builder;
pub mod dashboard_renderer;
pub mod dashboard_service;
pub mod panel_service;
pub mod result_source;
