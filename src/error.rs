use std::time::Duration;
use thiserror::Error;

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    #[error("Insufficient data: need {required} bars, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),

    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl AppError {
    /// Network-side faults expected to clear on their own. Payloads the
    /// parser could not read are not transient and are logged louder.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            AppError::ExternalApi(_) | AppError::Timeout(_) | AppError::Reqwest(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
