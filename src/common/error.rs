use crate::common::response::ApiError;
use axum::http::StatusCode;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{error, warn};

/// Failure of any stage of an upload. Every variant aborts the remaining
/// stages; none of them is retried.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Forbidden(String),
    /// An external media tool exited unsuccessfully.
    #[error("{tool} error: {diagnostics}")]
    Tool {
        tool: &'static str,
        diagnostics: String,
    },
    /// A media tool could not be run or produced output we cannot use.
    #[error("{0}")]
    Processing(String),
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to store object {key}: {message}")]
    Storage { key: String, message: String },
    #[error("video metadata store failed: {0}")]
    Persistence(#[source] anyhow::Error),
}

impl UploadError {
    pub fn status(&self) -> StatusCode {
        match self {
            UploadError::BadRequest(_) => StatusCode::BAD_REQUEST,
            UploadError::NotFound(_) => StatusCode::NOT_FOUND,
            UploadError::Forbidden(_) => StatusCode::FORBIDDEN,
            UploadError::Tool { .. }
            | UploadError::Processing(_)
            | UploadError::Io { .. }
            | UploadError::Storage { .. }
            | UploadError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<UploadError> for ApiError {
    fn from(err: UploadError) -> Self {
        let status = err.status();
        if status.is_server_error() {
            error!(error = %err, "upload failed");
        } else {
            warn!(error = %err, status = status.as_u16(), "upload rejected");
        }
        ApiError(err.to_string(), status)
    }
}
