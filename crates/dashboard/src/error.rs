use thiserror::Error;

use partuniverse_core::DomainError;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown dashboard item: {0}")]
    UnknownItem(String),
}
