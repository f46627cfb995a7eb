// Dashboard error taxonomy
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DashboardError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("chart index {index} is out of range (dashboard holds {len} charts)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("dashboard has not been initialized")]
    Uninitialized,
}

impl DashboardError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}
