use std::path::PathBuf;
use thiserror::Error;

/// Failures that abort the current view computation
#[derive(Debug, Error)]
pub enum IiveError {
    /// The statistics service answered with a non-success status
    #[error("Failed to fetch data: HTTP {status}")]
    Fetch { status: u16 },

    /// The request never produced a response
    #[error("Request to statistics service failed")]
    Request(#[from] reqwest::Error),

    /// The query payload could not be serialized
    #[error("Failed to encode query")]
    Encode(#[source] serde_json::Error),

    #[error("Unexpected response format: {0}")]
    DataFormat(String),

    #[error("Failed to load regions from {path:?}: {reason}")]
    GeometryLoad { path: PathBuf, reason: String },

    /// The table lacks a gender value column, or a joined county lacks
    /// its male or female value
    #[error("Missing required columns: {0}")]
    MissingColumns(String),
}

impl IiveError {
    pub(crate) fn data_format(message: impl Into<String>) -> Self {
        IiveError::DataFormat(message.into())
    }

    pub(crate) fn geometry(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        IiveError::GeometryLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, IiveError>;
