//! Main acquisition orchestrator implementation
//!
//! Drives one request through the pipeline using dependency injection:
//! allocate a workspace, run the tool, resolve the artifact, hand back a
//! stream. The workspace guard travels with the request from allocation
//! onward, so any early return or cancellation releases it.

use std::sync::Arc;

use shared::{DownloadRequest, RequestId, request_debug, request_info, request_warn};

use crate::config::AcquisitionConfig;
use crate::error::OrchestratorResult;
use crate::services::{
    ArtifactResolver, Delivery, RealProcessInvoker, RealWorkspaceManager, TransferCoordinator, WorkspaceGuard,
};
use crate::traits::{ProcessInvoker, WorkspaceManager};

/// Orchestrator wired with the production services
pub type RealAcquisitionOrchestrator = AcquisitionOrchestrator<RealWorkspaceManager, RealProcessInvoker>;

/// Coordinates workspace, tool invocation, resolution and transfer
pub struct AcquisitionOrchestrator<W, P>
where
    W: WorkspaceManager + 'static,
    P: ProcessInvoker + 'static,
{
    /// Injected services
    workspace_manager: Arc<W>,
    process_invoker: P,
    resolver: ArtifactResolver,
    transfer: TransferCoordinator,
}

impl<W, P> AcquisitionOrchestrator<W, P>
where
    W: WorkspaceManager + 'static,
    P: ProcessInvoker + 'static,
{
    /// Create new orchestrator with injected dependencies
    pub fn new(workspace_manager: W, process_invoker: P, resolver: ArtifactResolver) -> Self {
        Self {
            workspace_manager: Arc::new(workspace_manager),
            process_invoker,
            resolver,
            transfer: TransferCoordinator::new(),
        }
    }

    pub fn workspace_manager(&self) -> &W {
        &self.workspace_manager
    }

    /// Run the full pipeline for one validated request
    pub async fn acquire(&self, request_id: RequestId, request: &DownloadRequest) -> OrchestratorResult<Delivery> {
        let workspace = self.workspace_manager.allocate().await?;
        request_debug!(request_id, "📁 Allocated workspace {}", workspace.path.display());

        let manager: Arc<dyn WorkspaceManager> = self.workspace_manager.clone();
        let guard = WorkspaceGuard::new(request_id, workspace, manager);

        request_info!(request_id, "⬇️ Downloading {}", request.url());
        let result = self.process_invoker.run(request.url(), guard.workspace()).await?;

        let artifact = self.resolver.resolve(&result, guard.workspace()).await?;
        if artifact.title.is_none() {
            request_warn!(request_id, "🏷️ No title reported, using {}", artifact.display_name);
        }
        request_info!(
            request_id,
            "🎯 Resolved {} as {}",
            artifact.absolute_path.display(),
            artifact.display_name
        );

        self.transfer.deliver(artifact, guard).await
    }
}

impl RealAcquisitionOrchestrator {
    /// Build the production pipeline from configuration
    pub fn from_config(config: &AcquisitionConfig) -> OrchestratorResult<Self> {
        config.validate()?;

        let workspace_manager = RealWorkspaceManager::new(config.download_root.clone());
        let process_invoker = RealProcessInvoker::new(config.tool.clone()).with_error_limit(config.error_limit);
        let resolver = ArtifactResolver::with_policy(config.fallback_policy);

        Ok(Self::new(workspace_manager, process_invoker, resolver))
    }
}
