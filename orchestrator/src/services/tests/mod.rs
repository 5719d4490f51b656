//! Service-specific tests
//!
//! Each service has its own test file. Tests that need a real child process
//! stand in for the download tool with a small shell script.

#[cfg(test)]
mod transfer;

// Common test utilities for services
#[cfg(test)]
pub mod common {
    use std::path::{Path, PathBuf};
    use std::time::Duration;

    use crate::config::ToolConfig;
    use crate::services::RealWorkspaceManager;
    use crate::traits::WorkspaceManager;
    use crate::types::Workspace;

    /// Generous bound for child processes in tests
    pub const TEST_TOOL_TIMEOUT: Duration = Duration::from_secs(20);

    /// Write an executable `sh` script standing in for the download tool
    pub fn write_tool_script(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("fake-tool.sh");
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write tool script");
        path
    }

    /// Tool configuration that runs `script` through `/bin/sh`
    pub fn script_config(script: &Path) -> ToolConfig {
        ToolConfig::default()
            .with_program("/bin/sh", vec![script.display().to_string()])
            .with_timeout(TEST_TOOL_TIMEOUT)
    }

    /// Allocate a real workspace under `root`
    pub async fn allocate_in(root: &Path) -> (RealWorkspaceManager, Workspace) {
        let manager = RealWorkspaceManager::new(root);
        let workspace = manager.allocate().await.expect("allocate workspace");
        (manager, workspace)
    }
}
