//! Core shared types and identifiers

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::errors::{SharedError, SharedResult};

/// Correlation identifier attached to every log line of one inbound request
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated download request.
///
/// The only way to obtain one is through [`DownloadRequest::new`], which
/// rejects missing or blank URLs. Code holding a `DownloadRequest` can
/// therefore rely on a non-empty URL.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DownloadRequest {
    url: String,
}

impl DownloadRequest {
    pub fn new(url: impl AsRef<str>) -> SharedResult<Self> {
        let url = url.as_ref().trim();
        if url.is_empty() {
            return Err(SharedError::InvalidRequest {
                message: "url must not be empty".to_string(),
            });
        }
        if url.chars().any(char::is_control) {
            return Err(SharedError::InvalidRequest {
                message: "url contains control characters".to_string(),
            });
        }

        Ok(Self { url: url.to_string() })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for DownloadRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}
