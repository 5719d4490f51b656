//! Real workspace management service implementation
//!
//! Creates one uniquely named directory per request under the download root
//! and removes it again. [`WorkspaceGuard`] ties the removal to scope so it
//! happens exactly once on every exit path.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;

use crate::error::{OrchestratorError, OrchestratorResult};
use crate::traits::WorkspaceManager;
use crate::types::{Workspace, WorkspaceId};
use shared::{RequestId, request_debug, request_warn};

/// Real workspace manager backed by the local filesystem
#[derive(Debug, Clone)]
pub struct RealWorkspaceManager {
    /// Base directory all workspaces live under
    root: PathBuf,
}

impl RealWorkspaceManager {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Ensure the root exists and return its canonical absolute path
    async fn prepare_root(&self) -> OrchestratorResult<PathBuf> {
        fs::create_dir_all(&self.root)
            .await
            .map_err(|e| OrchestratorError::storage("create download root", &self.root, e))?;

        fs::canonicalize(&self.root)
            .await
            .map_err(|e| OrchestratorError::storage("resolve download root", &self.root, e))
    }

    /// Remove workspace directories left behind by a previous run.
    ///
    /// Only UUID-named directories directly under the root are touched.
    pub async fn sweep_stale(&self) -> OrchestratorResult<usize> {
        let root = self.prepare_root().await?;
        let mut entries = fs::read_dir(&root)
            .await
            .map_err(|e| OrchestratorError::storage("list download root", &root, e))?;

        let mut removed = 0;
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| OrchestratorError::storage("list download root", &root, e))?
        {
            let is_dir = entry.file_type().await.map(|t| t.is_dir()).unwrap_or(false);
            let name = entry.file_name();
            let Some(id) = name.to_str().and_then(WorkspaceId::parse) else {
                continue;
            };
            if !is_dir {
                continue;
            }

            self.release(&Workspace::new(id, entry.path()))?;
            removed += 1;
        }

        Ok(removed)
    }
}

#[async_trait]
impl WorkspaceManager for RealWorkspaceManager {
    async fn allocate(&self) -> OrchestratorResult<Workspace> {
        let root = self.prepare_root().await?;
        let id = WorkspaceId::new();
        let path = root.join(id.to_string());

        // create_dir (not create_dir_all) so an id collision surfaces as an error
        fs::create_dir(&path)
            .await
            .map_err(|e| OrchestratorError::storage("create workspace", &path, e))?;

        Ok(Workspace::new(id, path))
    }

    // Blocking removal: guards release from Drop, which cannot await.
    // A workspace holds a single download, so this stays brief.
    fn release(&self, workspace: &Workspace) -> OrchestratorResult<()> {
        match std::fs::remove_dir_all(&workspace.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(OrchestratorError::storage("remove workspace", &workspace.path, e)),
        }
    }
}

/// Scoped ownership of an allocated workspace.
///
/// The workspace is released when [`WorkspaceGuard::release`] is called or,
/// failing that, when the guard is dropped. Release happens at most once.
pub struct WorkspaceGuard {
    request_id: RequestId,
    workspace: Workspace,
    manager: Arc<dyn WorkspaceManager>,
    released: bool,
}

impl WorkspaceGuard {
    pub fn new(request_id: RequestId, workspace: Workspace, manager: Arc<dyn WorkspaceManager>) -> Self {
        Self {
            request_id,
            workspace,
            manager,
            released: false,
        }
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Release now and report the outcome
    pub fn release(mut self) -> OrchestratorResult<()> {
        self.release_once()
    }

    fn release_once(&mut self) -> OrchestratorResult<()> {
        if self.released {
            return Ok(());
        }
        self.released = true;

        let result = self.manager.release(&self.workspace);
        match &result {
            Ok(()) => request_debug!(
                self.request_id,
                "🗑️ Removed workspace {}",
                self.workspace.path.display()
            ),
            Err(e) => request_warn!(
                self.request_id,
                "⚠️ Failed to remove workspace {}: {}",
                self.workspace.path.display(),
                e
            ),
        }
        result
    }
}

impl Drop for WorkspaceGuard {
    fn drop(&mut self) {
        // Errors are already logged by release_once
        let _ = self.release_once();
    }
}

impl std::fmt::Debug for WorkspaceGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkspaceGuard")
            .field("request_id", &self.request_id)
            .field("workspace", &self.workspace)
            .field("released", &self.released)
            .finish()
    }
}
