use crate::application::dashboard_service::SessionError;
use crate::application::panel_service::PanelError;
use crate::domain::error::DashboardError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Panel(#[from] PanelError),
    #[error("Dataset listing failed: {0:#}")]
    Datasets(anyhow::Error),
}

impl From<DashboardError> for AppError {
    fn from(error: DashboardError) -> Self {
        AppError::Session(SessionError::Dashboard(error))
    }
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Session(SessionError::Dashboard(e)) | AppError::Panel(PanelError::Dashboard(e)) => {
                dashboard_status(e)
            }
            AppError::Session(SessionError::Closed) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Panel(PanelError::Source { .. }) => StatusCode::BAD_GATEWAY,
            AppError::Datasets(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

fn dashboard_status(error: &DashboardError) -> StatusCode {
    match error {
        DashboardError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        DashboardError::IndexOutOfRange { .. } => StatusCode::NOT_FOUND,
        DashboardError::Uninitialized => StatusCode::CONFLICT,
    }
}

/// Converts `AppError` into a JSON error response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed.");
        } else {
            tracing::debug!(error = %self, "Request rejected.");
        }

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
