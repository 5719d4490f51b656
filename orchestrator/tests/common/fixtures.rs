//! Test fixtures and data for orchestrator tests
//!
//! Canned tool output in the shapes the resolver understands.

use std::path::Path;

use shared::{DownloadRequest, RequestId};

/// How the simulated tool reports the file it produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolReport {
    /// One JSON metadata line on stdout
    Json,
    /// Only a `[download] Destination:` progress line on stderr
    Marker,
    /// Nothing usable; the resolver has to scan the workspace
    Silent,
}

/// Standard test data and fixtures
pub struct TestFixtures;

impl TestFixtures {
    pub const VIDEO_URL: &'static str = "https://www.example.com/watch?v=abc123";
    pub const VIDEO_TITLE: &'static str = "Sunset Over Kyoto";
    pub const VIDEO_FILE: &'static str = "Sunset_Over_Kyoto.mp4";
    pub const DISPLAY_NAME: &'static str = "Sunset_Over_Kyoto.mp4";
    pub const UNSUPPORTED_STDERR: &'static str = "ERROR: [generic] Unsupported URL: https://nope.invalid";

    pub fn request() -> DownloadRequest {
        DownloadRequest::new(Self::VIDEO_URL).unwrap()
    }

    pub fn request_for(url: &str) -> DownloadRequest {
        DownloadRequest::new(url).unwrap()
    }

    pub fn request_id() -> RequestId {
        RequestId::new()
    }

    /// Deterministic media bytes, distinct per `seed`
    pub fn media_bytes(seed: u8, len: usize) -> Vec<u8> {
        (0..len).map(|i| (i as u8).wrapping_mul(31).wrapping_add(seed)).collect()
    }

    /// Stdout/stderr the tool would print after writing `file`
    pub fn tool_output(report: ToolReport, title: &str, file: &Path) -> (String, String) {
        match report {
            ToolReport::Json => {
                let line = serde_json::json!({
                    "id": "abc123",
                    "title": title,
                    "ext": "mp4",
                    "_filename": file.display().to_string(),
                });
                (format!("{line}\n"), "[debug] Command-line config: [...]\n".to_string())
            }
            ToolReport::Marker => (
                String::new(),
                format!(
                    "[youtube] abc123: Downloading webpage\n[download] Destination: {}\n[download] 100% of 1.00MiB\n",
                    file.display()
                ),
            ),
            ToolReport::Silent => (String::new(), "[download] 100% of 1.00MiB\n".to_string()),
        }
    }
}
