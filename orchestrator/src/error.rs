//! Orchestrator-specific error types

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use shared::SharedError;

#[derive(Error, Debug)]
pub enum OrchestratorError {
    /// Caller supplied an unusable request
    #[error("{message}")]
    Validation { message: String },

    /// The external tool binary could not be launched
    #[error("Download tool '{program}' could not be started: {source}")]
    ToolNotFound {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The external tool ran and exited unsuccessfully
    #[error("{stderr}")]
    ToolExecution { exit_code: i32, stderr: String },

    #[error("Download tool did not finish within {}s", timeout.as_secs())]
    ToolTimeout { timeout: Duration },

    /// The tool reported success but no produced file could be located
    #[error("Downloaded file could not be located: {reason}")]
    ArtifactNotFound { reason: String },

    #[error("Storage operation '{operation}' failed on {}: {source}", path.display())]
    Storage {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {field}")]
    Configuration { field: String },
}

impl OrchestratorError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation { message: message.into() }
    }

    pub fn storage(operation: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Storage {
            operation,
            path: path.into(),
            source,
        }
    }

    pub fn artifact_not_found(reason: impl Into<String>) -> Self {
        Self::ArtifactNotFound { reason: reason.into() }
    }

    pub fn config(field: impl Into<String>) -> Self {
        Self::Configuration { field: field.into() }
    }

    /// True for failures caused by the caller rather than the relay or the tool
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Short machine-friendly label used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation",
            Self::ToolNotFound { .. } => "tool_not_found",
            Self::ToolExecution { .. } => "tool_execution",
            Self::ToolTimeout { .. } => "tool_timeout",
            Self::ArtifactNotFound { .. } => "artifact_not_found",
            Self::Storage { .. } => "storage",
            Self::Configuration { .. } => "configuration",
        }
    }
}

impl From<SharedError> for OrchestratorError {
    fn from(err: SharedError) -> Self {
        match err {
            SharedError::InvalidRequest { message } => Self::Validation { message },
        }
    }
}

pub type OrchestratorResult<T> = Result<T, OrchestratorError>;
