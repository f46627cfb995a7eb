// Dashboard service - Single-task session owning the renderer and its HTML surface
use crate::application::dashboard_renderer::DashboardRenderer;
use crate::domain::chart::ChartSpec;
use crate::domain::error::DashboardError;
use crate::infrastructure::html_surface::HtmlSurface;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot, watch};

const COMMAND_BUFFER: usize = 100;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Dashboard(#[from] DashboardError),

    #[error("dashboard session is no longer running")]
    Closed,
}

/// Point-in-time view of the dashboard as the surface currently shows it.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub revision: u64,
    pub specs: Vec<ChartSpec>,
    pub figures: Vec<Value>,
    pub error: Option<String>,
    #[serde(skip)]
    pub page: String,
}

enum Command {
    Snapshot {
        reply: oneshot::Sender<DashboardSnapshot>,
    },
    SetSpecs {
        specs: Vec<ChartSpec>,
        reply: oneshot::Sender<Result<(), DashboardError>>,
    },
    AddSpec {
        spec: ChartSpec,
        reply: oneshot::Sender<Result<(), DashboardError>>,
    },
    RemoveSpec {
        index: usize,
        reply: oneshot::Sender<Result<ChartSpec, DashboardError>>,
    },
    ReportError {
        operation: &'static str,
        message: String,
        reply: oneshot::Sender<()>,
    },
}

/// Cloneable handle to the dashboard session.
///
/// Every command is handled by one task in arrival order, so each mutation is
/// rendered before the next one starts.
#[derive(Clone)]
pub struct DashboardService {
    commands: mpsc::Sender<Command>,
    revisions: watch::Receiver<u64>,
}

impl DashboardService {
    pub fn spawn(renderer: DashboardRenderer<HtmlSurface>) -> Self {
        let (tx, rx) = mpsc::channel(COMMAND_BUFFER);
        let (revision_tx, revision_rx) = watch::channel(0u64);

        tokio::spawn(run_session(renderer, rx, revision_tx));

        Self {
            commands: tx,
            revisions: revision_rx,
        }
    }

    /// Receiver that observes a new revision after every mutation attempt.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revisions.clone()
    }

    pub async fn snapshot(&self) -> Result<DashboardSnapshot, SessionError> {
        self.request(|reply| Command::Snapshot { reply }).await
    }

    pub async fn set_specs(&self, specs: Vec<ChartSpec>) -> Result<(), SessionError> {
        Ok(self.request(|reply| Command::SetSpecs { specs, reply }).await??)
    }

    pub async fn add_spec(&self, spec: ChartSpec) -> Result<(), SessionError> {
        Ok(self.request(|reply| Command::AddSpec { spec, reply }).await??)
    }

    pub async fn remove_spec(&self, index: usize) -> Result<ChartSpec, SessionError> {
        Ok(self.request(|reply| Command::RemoveSpec { index, reply }).await??)
    }

    /// Show a rejection that never reached the renderer, such as a malformed
    /// request body, on the surface.
    pub async fn report_error(
        &self,
        operation: &'static str,
        message: impl Into<String>,
    ) -> Result<(), SessionError> {
        let message = message.into();
        self.request(|reply| Command::ReportError {
            operation,
            message,
            reply,
        })
        .await
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T, SessionError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.commands
            .send(command(reply_tx))
            .await
            .map_err(|_| SessionError::Closed)?;
        reply_rx.await.map_err(|_| SessionError::Closed)
    }
}

async fn run_session(
    mut renderer: DashboardRenderer<HtmlSurface>,
    mut commands: mpsc::Receiver<Command>,
    revisions: watch::Sender<u64>,
) {
    while let Some(command) = commands.recv().await {
        match command {
            Command::Snapshot { reply } => {
                let _ = reply.send(snapshot(&renderer, *revisions.borrow()));
            }
            Command::SetSpecs { specs, reply } => {
                let result = renderer.set_specs(specs);
                revisions.send_modify(|r| *r += 1);
                let _ = reply.send(result);
            }
            Command::AddSpec { spec, reply } => {
                let result = renderer.add_spec(spec);
                revisions.send_modify(|r| *r += 1);
                let _ = reply.send(result);
            }
            Command::RemoveSpec { index, reply } => {
                let result = renderer.remove_spec(index);
                revisions.send_modify(|r| *r += 1);
                let _ = reply.send(result);
            }
            Command::ReportError {
                operation,
                message,
                reply,
            } => {
                renderer.report_error(operation, &message);
                revisions.send_modify(|r| *r += 1);
                let _ = reply.send(());
            }
        }
    }

    tracing::debug!("Dashboard session closed");
}

fn snapshot(renderer: &DashboardRenderer<HtmlSurface>, revision: u64) -> DashboardSnapshot {
    let surface = renderer.surface();
    DashboardSnapshot {
        revision,
        specs: renderer.specs().to_vec(),
        figures: surface.figures().to_vec(),
        error: surface.error().map(str::to_string),
        page: surface.page(revision),
    }
}
