use thiserror::Error;

use shared_models::error::AppError;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Could not reach booking backend: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success status from the backend; `message` carries the upstream
    /// error body verbatim when one was provided.
    #[error("Backend rejected request ({status}): {message}")]
    Status { status: u16, message: String },

    #[error("Invalid backend response: {0}")]
    Decode(String),
}

impl From<BackendError> for AppError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Transport(_) => {
                AppError::Backend("Could not reach booking backend".to_string())
            }
            BackendError::Status { status, message } => AppError::Upstream { status, message },
            BackendError::Decode(msg) => AppError::Internal(msg),
        }
    }
}
