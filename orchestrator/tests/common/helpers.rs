//! Test helpers and builder patterns for orchestrator tests
//!
//! The process invoker is mocked; its expectation writes the artifact into
//! the real workspace it is handed, exactly as the external tool would.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures_util::StreamExt;
use ::orchestrator::*;

use super::fixtures::{TestFixtures, ToolReport};

/// Builder for orchestrators over a real workspace root and a mocked tool
pub struct OrchestratorBuilder {
    root: PathBuf,
    invoker: MockProcessInvoker,
}

impl OrchestratorBuilder {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            invoker: MockProcessInvoker::new(),
        }
    }

    /// Tool writes `file_name` with `content` and reports it via `report`
    pub fn tool_produces(mut self, file_name: &str, content: Vec<u8>, report: ToolReport) -> Self {
        let file_name = file_name.to_string();
        self.invoker.expect_run().times(1).returning(move |_url, workspace| {
            let file = workspace.path.join(&file_name);
            std::fs::write(&file, &content).unwrap();
            let (stdout, stderr) = TestFixtures::tool_output(report, TestFixtures::VIDEO_TITLE, &file);
            Ok(ProcessResult {
                exit_code: 0,
                stdout,
                stderr,
            })
        });
        self
    }

    /// Tool writes one file per request whose content is the URL itself
    pub fn tool_echoes_url(mut self) -> Self {
        self.invoker.expect_run().returning(|url, workspace| {
            let file = workspace.path.join("echo.mp4");
            std::fs::write(&file, url.as_bytes()).unwrap();
            let (stdout, stderr) = TestFixtures::tool_output(ToolReport::Json, url, &file);
            Ok(ProcessResult {
                exit_code: 0,
                stdout,
                stderr,
            })
        });
        self
    }

    /// Tool exits successfully without writing anything
    pub fn tool_produces_nothing(mut self) -> Self {
        self.invoker.expect_run().times(1).returning(|_, _| {
            Ok(ProcessResult {
                exit_code: 0,
                stdout: String::new(),
                stderr: String::new(),
            })
        });
        self
    }

    /// Tool leaves a partial file behind and then fails
    pub fn tool_fails(mut self, exit_code: i32, stderr: &str) -> Self {
        let stderr = stderr.to_string();
        self.invoker.expect_run().times(1).returning(move |_, workspace| {
            std::fs::write(workspace.path.join("partial.mp4.part"), b"half").unwrap();
            Err(OrchestratorError::ToolExecution {
                exit_code,
                stderr: stderr.clone(),
            })
        });
        self
    }

    pub fn build(self) -> AcquisitionOrchestrator<RealWorkspaceManager, MockProcessInvoker> {
        AcquisitionOrchestrator::new(
            RealWorkspaceManager::new(self.root),
            self.invoker,
            ArtifactResolver::default(),
        )
    }
}

/// Common test helper functions
pub struct TestHelpers;

impl TestHelpers {
    /// Drain a delivery into memory
    pub async fn collect(mut delivery: Delivery) -> Vec<u8> {
        let mut body = Vec::new();
        while let Some(chunk) = delivery.stream.next().await {
            body.extend_from_slice(&chunk.unwrap());
        }
        body
    }

    /// Number of entries left under the download root
    pub fn root_entries(root: &Path) -> usize {
        std::fs::read_dir(root).map(|entries| entries.count()).unwrap_or(0)
    }

    /// Mock workspace manager handing out one real directory and
    /// expecting exactly one release of it
    pub fn counting_manager(root: &Path) -> (MockWorkspaceManager, Arc<std::sync::atomic::AtomicUsize>) {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let released = Arc::new(AtomicUsize::new(0));
        let mut manager = MockWorkspaceManager::new();

        let root = root.to_path_buf();
        manager.expect_allocate().times(1).returning(move || {
            let id = WorkspaceId::new();
            let path = root.join(id.to_string());
            std::fs::create_dir(&path).unwrap();
            Ok(Workspace::new(id, path))
        });

        let counter = released.clone();
        manager.expect_release().times(1).returning(move |workspace| {
            counter.fetch_add(1, Ordering::SeqCst);
            std::fs::remove_dir_all(&workspace.path).unwrap();
            Ok(())
        });

        (manager, released)
    }
}
