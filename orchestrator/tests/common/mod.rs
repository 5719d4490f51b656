//! Common test utilities and infrastructure
//!
//! This module provides shared test utilities, fixtures, and helpers
//! used across the orchestrator integration suites.

pub mod fixtures;
pub mod helpers;

// Re-export commonly used items for convenience
pub use fixtures::{TestFixtures, ToolReport};
pub use helpers::{OrchestratorBuilder, TestHelpers};
