//! Error types for nerfdash-core.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown field: {0}")]
    UnknownField(String),

    #[error("unknown metric: {0}")]
    UnknownMetric(String),

    #[error("unknown category: {0}")]
    UnknownCategory(String),

    #[error("experiment not found: {0}")]
    RecordNotFound(u64),
}

pub type Result<T> = std::result::Result<T, DashError>;
