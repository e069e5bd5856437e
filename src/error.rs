use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Message shown to users when any outbound call fails
pub const GENERIC_FAILURE_MESSAGE: &str = "An error occurred. Please try again.";

/// Input problems the user can fix locally
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a valid 6-digit lobby ID")]
    InvalidLobbyId(String),

    #[error("Please select at least {minimum} interests (likes or dislikes)")]
    TooFewPreferences { minimum: usize, selected: usize },

    #[error("{0} cannot be empty")]
    BlankName(&'static str),

    #[error("\"{0}\" is not one of the available interests")]
    UnknownTag(String),
}

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("{service} returned status {status}: {message}")]
    Upstream {
        service: &'static str,
        status: reqwest::StatusCode,
        message: String,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether a retry of the same request could plausibly succeed
    pub fn is_transient(&self) -> bool {
        match self {
            AppError::HttpClient(e) => e.is_timeout() || e.is_connect(),
            AppError::Upstream { status, .. } => {
                status.is_server_error() || *status == reqwest::StatusCode::TOO_MANY_REQUESTS
            }
            _ => false,
        }
    }

    /// Text safe to show in the UI. Missing resources and network-class
    /// failures collapse to one generic message; the detail only goes to the
    /// log.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(e) => e.to_string(),
            AppError::NotFound(_)
            | AppError::HttpClient(_)
            | AppError::Upstream { .. }
            | AppError::Internal(_) => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::HttpClient(_) | AppError::Upstream { .. } => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else if status == StatusCode::NOT_FOUND {
            tracing::debug!(error = %self, "Resource not found");
        }

        let body = Json(json!({
            "error": self.user_message()
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
