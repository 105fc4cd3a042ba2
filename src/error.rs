//! Error taxonomy shared by the scanning engine and the tool surface.

use std::path::PathBuf;

use thiserror::Error;

pub type AnalystResult<T> = std::result::Result<T, AnalystError>;

#[derive(Debug, Error)]
pub enum AnalystError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Access denied: {} is outside the data directory", .0.display())]
    AccessDenied(PathBuf),

    #[error("{0}")]
    InvalidArgument(String),

    #[error("Failed to decode {context} as {encoding}")]
    Decode {
        context: String,
        encoding: &'static str,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AnalystError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        AnalystError::InvalidArgument(message.into())
    }

    /// Stable short name used when reporting errors to tool callers.
    pub fn kind(&self) -> &'static str {
        match self {
            AnalystError::NotFound(_) => "NotFound",
            AnalystError::AccessDenied(_) => "AccessDenied",
            AnalystError::InvalidArgument(_) => "InvalidArgument",
            AnalystError::Decode { .. } => "Decode",
            AnalystError::Io(_) => "Io",
            AnalystError::Csv(_) => "Csv",
            AnalystError::Json(_) => "Json",
        }
    }
}
