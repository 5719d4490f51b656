//! Data model of one acquisition

use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Opaque identifier naming a workspace directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WorkspaceId(Uuid);

impl WorkspaceId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a directory name back into an id
    pub fn parse(name: &str) -> Option<Self> {
        Uuid::parse_str(name).ok().map(Self)
    }
}

impl Default for WorkspaceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for WorkspaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-request scratch directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    pub id: WorkspaceId,
    /// Absolute directory path
    pub path: PathBuf,
}

impl Workspace {
    pub fn new(id: WorkspaceId, path: PathBuf) -> Self {
        Self { id, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Captured outcome of one tool run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessResult {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// File entry reported under `requested_downloads`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RequestedDownload {
    #[serde(default)]
    pub filepath: Option<String>,
}

/// Subset of the per-video JSON object printed by the tool
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct VideoMetadata {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, rename = "_filename")]
    pub internal_filename: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub requested_downloads: Vec<RequestedDownload>,
}

impl VideoMetadata {
    /// Output paths the tool announced, most specific first
    pub fn reported_paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self
            .requested_downloads
            .iter()
            .filter_map(|d| d.filepath.as_deref())
            .map(PathBuf::from)
            .collect();

        for name in [&self.filename, &self.internal_filename].into_iter().flatten() {
            let path = PathBuf::from(name);
            if !paths.contains(&path) {
                paths.push(path);
            }
        }

        paths
    }

    /// Title with surrounding whitespace removed, if non-empty
    pub fn clean_title(&self) -> Option<&str> {
        self.title.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }
}

/// Output of one parsing strategy
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedOutput {
    pub metadata: Option<VideoMetadata>,
    /// Candidate artifact paths in preference order
    pub candidates: Vec<PathBuf>,
}

impl ParsedOutput {
    pub fn is_empty(&self) -> bool {
        self.metadata.is_none() && self.candidates.is_empty()
    }
}

/// The file chosen to be streamed back
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedArtifact {
    pub absolute_path: PathBuf,
    /// Sanitized ASCII filename for Content-Disposition
    pub display_name: String,
    /// Raw title reported by the tool, if any
    pub title: Option<String>,
}
