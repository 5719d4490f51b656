//! WebServer-specific error types
//!
//! Every failure reaching a handler is turned into `{ "error": string }`
//! with a 400 or 500 status.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use orchestrator::OrchestratorError;
use shared::{ErrorResponse, SharedError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WebServerError {
    #[error("{message}")]
    BadRequest { message: String },

    #[error(transparent)]
    Acquisition(#[from] OrchestratorError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Server startup error: {0}")]
    ServerStartup(String),

    #[error("Response building error: {0}")]
    ResponseError(String),
}

impl WebServerError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest { message: message.into() }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Acquisition(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<SharedError> for WebServerError {
    fn from(err: SharedError) -> Self {
        Self::Acquisition(err.into())
    }
}

impl IntoResponse for WebServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

pub type WebServerResult<T> = Result<T, WebServerError>;
