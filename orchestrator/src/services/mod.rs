//! Service implementations
//!
//! This module contains real implementations of the service traits plus the
//! resolver and transfer coordinator built on top of them.

pub mod artifact_resolver;
pub mod process_invoker;
pub mod process_output_handler;
pub mod transfer;
pub mod workspace_manager;

#[cfg(test)]
mod tests;

// Re-export all service implementations
pub use artifact_resolver::ArtifactResolver;
pub use process_invoker::RealProcessInvoker;
pub use transfer::{Delivery, DeliveryStream, TransferCoordinator};
pub use workspace_manager::{RealWorkspaceManager, WorkspaceGuard};
