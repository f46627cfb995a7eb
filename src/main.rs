// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use tracing_subscriber::EnvFilter;

use crate::application::dashboard_renderer::DashboardRenderer;
use crate::application::dashboard_service::DashboardService;
use crate::application::panel_service::PanelService;
use crate::infrastructure::config::load_dashboard_config;
use crate::infrastructure::file_source::FileResultSource;
use crate::infrastructure::html_surface::HtmlSurface;
use crate::presentation::app_state::AppState;
use crate::presentation::routes::router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_dashboard_config()?;

    // Create result source (infrastructure layer)
    let source = Arc::new(FileResultSource::new(config.data.directory.clone()));

    // Create services (application layer)
    let panel_service = PanelService::new(source);
    let initial_specs = panel_service.build_panels(&config.panels).await;

    let mut renderer = DashboardRenderer::new(HtmlSurface::new(config.server.title.clone()));
    renderer.initialize(initial_specs)?;
    let dashboard = DashboardService::spawn(renderer);

    // Create application state
    let state = Arc::new(AppState {
        dashboard,
        panel_service,
    });

    // Build router (presentation layer)
    let app = router(state);

    // Start server
    let addr: SocketAddr = config.server.bind_address.parse()?;
    tracing::info!("Starting strategy dashboard on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;

    Ok(())
}
