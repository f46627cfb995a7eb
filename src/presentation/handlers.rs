// HTTP request handlers
use crate::domain::chart::ChartSpec;
use crate::domain::error::DashboardError;
use crate::infrastructure::config::PanelConfig;
use crate::infrastructure::http_response::{accepts_brotli, json_response};
use crate::presentation::app_state::AppState;
use crate::presentation::error::AppError;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::{HeaderMap, StatusCode},
    response::{
        sse::{Event, KeepAlive, Sse},
        Html, IntoResponse, Response,
    },
    Json,
};
use futures::Stream;
use std::convert::Infallible;
use std::sync::Arc;

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// # GET /
pub async fn dashboard_page(State(state): State<Arc<AppState>>) -> Result<Html<String>, AppError> {
    let snapshot = state.dashboard.snapshot().await?;
    Ok(Html(snapshot.page))
}

/// # GET /api/dashboard
/// Current specs, their Plotly figures and any pending error message.
pub async fn get_dashboard(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response, AppError> {
    let snapshot = state.dashboard.snapshot().await?;

    Ok(match json_response(&snapshot, accepts_brotli(&headers)).await {
        Ok(response) => response.into_response(),
        Err(status) => status.into_response(),
    })
}

/// # PUT /api/dashboard/specs
pub async fn set_specs(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Vec<ChartSpec>>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let Json(specs) = accept(&state, "set_specs", body.map_err(|r| r.body_text())).await?;
    state.dashboard.set_specs(specs).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// # POST /api/dashboard/specs
pub async fn add_spec(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ChartSpec>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let Json(spec) = accept(&state, "add_spec", body.map_err(|r| r.body_text())).await?;
    state.dashboard.add_spec(spec).await?;
    Ok(StatusCode::CREATED)
}

/// # POST /api/dashboard/panels
/// Builds a chart from inline records or a dataset, then appends it.
pub async fn add_panel(
    State(state): State<Arc<AppState>>,
    body: Result<Json<PanelConfig>, JsonRejection>,
) -> Result<(StatusCode, Json<ChartSpec>), AppError> {
    let Json(panel) = accept(&state, "add_panel", body.map_err(|r| r.body_text())).await?;
    let spec = match state.panel_service.build_panel(&panel).await {
        Ok(spec) => spec,
        Err(e) => return Err(rejected(&state, "add_panel", e.into()).await),
    };
    state.dashboard.add_spec(spec.clone()).await?;
    tracing::info!("Panel {} added", panel.id);
    Ok((StatusCode::CREATED, Json(spec)))
}

/// # DELETE /api/dashboard/specs/:index
pub async fn remove_spec(
    State(state): State<Arc<AppState>>,
    index: Result<Path<usize>, PathRejection>,
) -> Result<Json<ChartSpec>, AppError> {
    let Path(index) = accept(&state, "remove_spec", index.map_err(|r| r.body_text())).await?;
    let removed = state.dashboard.remove_spec(index).await?;
    Ok(Json(removed))
}

/// # GET /api/datasets
pub async fn list_datasets(State(state): State<Arc<AppState>>) -> Result<Json<Vec<String>>, AppError> {
    let datasets = state
        .panel_service
        .list_datasets()
        .await
        .map_err(AppError::Datasets)?;
    Ok(Json(datasets))
}

/// # GET /api/dashboard/events
/// Emits the current revision on connect and again after every mutation.
pub async fn dashboard_events(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let mut revisions = state.dashboard.subscribe();

    let stream = async_stream::stream! {
        loop {
            let revision = *revisions.borrow_and_update();
            yield Ok::<_, Infallible>(Event::default().event("revision").data(revision.to_string()));
            if revisions.changed().await.is_err() {
                break;
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}

// Malformed requests count as invalid input
async fn accept<T>(
    state: &AppState,
    operation: &'static str,
    extracted: Result<T, String>,
) -> Result<T, AppError> {
    match extracted {
        Ok(value) => Ok(value),
        Err(message) => Err(rejected(state, operation, DashboardError::invalid(message).into()).await),
    }
}

/// Puts a failure that never reached the renderer on the dashboard page.
async fn rejected(state: &AppState, operation: &'static str, error: AppError) -> AppError {
    match state.dashboard.report_error(operation, error.to_string()).await {
        Ok(()) => error,
        Err(closed) => closed.into(),
    }
}
