// Application state for HTTP handlers
use crate::application::dashboard_service::DashboardService;
use crate::application::panel_service::PanelService;

#[derive(Clone)]
pub struct AppState {
    pub dashboard: DashboardService,
    pub panel_service: PanelService,
}
