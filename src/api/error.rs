use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Prayer API failed: {status}")]
    Status { status: u16 },

    #[error("Invalid data structure from prayer API")]
    InvalidResponse,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
