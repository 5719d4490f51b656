//! Acquisition orchestrator library
//!
//! Everything between a validated download request and a byte stream:
//! per-request workspaces, supervised execution of the external download
//! tool, artifact resolution from its output, and streaming with guaranteed
//! workspace cleanup.

pub mod config;
pub mod core;
pub mod error;
pub mod orchestrator;
pub mod parsing;
pub mod services;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use config::{AcquisitionConfig, FallbackPolicy, ToolConfig};
pub use error::{OrchestratorError, OrchestratorResult};
pub use orchestrator::{AcquisitionOrchestrator, RealAcquisitionOrchestrator};
pub use services::{
    ArtifactResolver, Delivery, DeliveryStream, RealProcessInvoker, RealWorkspaceManager, TransferCoordinator,
    WorkspaceGuard,
};
pub use traits::{MockProcessInvoker, MockWorkspaceManager, ProcessInvoker, WorkspaceManager};
pub use types::{ProcessResult, ResolvedArtifact, VideoMetadata, Workspace, WorkspaceId};
