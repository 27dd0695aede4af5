use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors
///
/// The first four variants describe why a call to the recommendation backend
/// failed. They never leave the client: every public client method collapses
/// them into an empty or `false` value after logging.
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(reqwest::Error),

    #[error("Request timed out: {0}")]
    Timeout(reqwest::Error),

    #[error("Backend returned status {status}: {body}")]
    NonSuccessStatus {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Not signed in")]
    Unauthenticated,

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            AppError::Timeout(e)
        } else if e.is_decode() {
            AppError::MalformedResponse(e.to_string())
        } else {
            AppError::Network(e)
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::MalformedResponse(e.to_string())
    }
}

impl AppError {
    /// Short label used as a structured logging field
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Network(_) => "network",
            AppError::Timeout(_) => "timeout",
            AppError::NonSuccessStatus { .. } => "non_success_status",
            AppError::MalformedResponse(_) => "malformed_response",
            AppError::Unauthenticated => "unauthenticated",
            AppError::InvalidInput(_) => "invalid_input",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Unauthenticated => (StatusCode::UNAUTHORIZED, self.to_string()),
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Network(_)
            | AppError::Timeout(_)
            | AppError::NonSuccessStatus { .. }
            | AppError::MalformedResponse(_) => (StatusCode::BAD_GATEWAY, self.to_string()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
