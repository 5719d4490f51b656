//! Download endpoint request/response bodies

use serde::{Deserialize, Serialize};

use crate::errors::{SharedError, SharedResult};
use crate::types::DownloadRequest;

/// Raw `POST /download` body as sent by the browser.
///
/// `url` is optional here so that a missing field is reported as a
/// validation error rather than a deserialization failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DownloadBody {
    #[serde(default)]
    pub url: Option<String>,
}

impl DownloadBody {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: Some(url.into()) }
    }

    /// Validate the body into a [`DownloadRequest`]
    pub fn into_request(self) -> SharedResult<DownloadRequest> {
        match self.url {
            Some(url) => DownloadRequest::new(url),
            None => Err(SharedError::InvalidRequest {
                message: "No URL was provided".to_string(),
            }),
        }
    }
}

/// JSON error shape returned for every failed request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into() }
    }
}

/// `GET /health` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_seconds: u64,
    pub active_downloads: u32,
}
