//! Trait definitions with mockall annotations for testing
//!
//! The two I/O seams of the acquisition pipeline: the scratch filesystem and
//! the external download tool. Output parsing has its own strategy trait in
//! [`crate::parsing`].

use crate::error::OrchestratorResult;
use crate::types::{ProcessResult, Workspace};

/// Per-request workspace lifecycle
///
/// `release` is synchronous so it can run from `Drop` on every exit path,
/// including cancellation of the request future.
#[mockall::automock]
#[async_trait::async_trait]
pub trait WorkspaceManager: Send + Sync {
    /// Create a fresh, uniquely named directory under the download root
    async fn allocate(&self) -> OrchestratorResult<Workspace>;

    /// Recursively delete a workspace; removing a missing directory is not an error
    fn release(&self, workspace: &Workspace) -> OrchestratorResult<()>;
}

/// External download tool execution
#[mockall::automock]
#[async_trait::async_trait]
pub trait ProcessInvoker: Send + Sync {
    /// Run the tool for `url` with all output landing inside `workspace`
    ///
    /// # Returns
    /// The captured output of a successful run. Non-zero exit, launch
    /// failure and timeout are reported as errors.
    async fn run(&self, url: &str, workspace: &Workspace) -> OrchestratorResult<ProcessResult>;
}
