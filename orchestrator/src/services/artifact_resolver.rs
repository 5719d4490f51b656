//! Artifact resolution
//!
//! Decides which file inside a workspace the tool actually produced. The
//! structured stage asks each [`OutputParser`] in turn for metadata and
//! candidate paths; the first candidate that is an existing regular file
//! inside the workspace wins. When none qualifies the filesystem fallback
//! lists the workspace and applies the configured [`FallbackPolicy`].

use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tokio::fs;
use tracing::debug;

use crate::config::FallbackPolicy;
use crate::core::display_name;
use crate::error::{OrchestratorError, OrchestratorResult};
use crate::parsing::{OutputParser, default_parsers};
use crate::types::{ParsedOutput, ProcessResult, ResolvedArtifact, VideoMetadata, Workspace};

/// Suffixes of partially downloaded or intermediate files
const PARTIAL_SUFFIXES: &[&str] = &[".part", ".ytdl", ".temp", ".tmp"];

pub struct ArtifactResolver {
    parsers: Vec<Box<dyn OutputParser>>,
    fallback_policy: FallbackPolicy,
}

impl Default for ArtifactResolver {
    fn default() -> Self {
        Self::new(default_parsers(), FallbackPolicy::default())
    }
}

impl ArtifactResolver {
    pub fn new(parsers: Vec<Box<dyn OutputParser>>, fallback_policy: FallbackPolicy) -> Self {
        Self {
            parsers,
            fallback_policy,
        }
    }

    /// Default parsers with the given fallback policy
    pub fn with_policy(fallback_policy: FallbackPolicy) -> Self {
        Self::new(default_parsers(), fallback_policy)
    }

    /// Append a strategy after the existing ones (fluent API)
    pub fn with_parser(mut self, parser: Box<dyn OutputParser>) -> Self {
        self.parsers.push(parser);
        self
    }

    pub async fn resolve(&self, result: &ProcessResult, workspace: &Workspace) -> OrchestratorResult<ResolvedArtifact> {
        let root = fs::canonicalize(&workspace.path)
            .await
            .map_err(|e| OrchestratorError::storage("resolve workspace", &workspace.path, e))?;

        let parsed = self.run_parsers(result);
        let title = parsed.metadata.as_ref().and_then(VideoMetadata::clean_title).map(str::to_string);

        let absolute_path = match self.first_existing(&parsed.candidates, &root).await {
            Some(path) => path,
            None => {
                debug!(
                    workspace = %workspace.id,
                    candidates = parsed.candidates.len(),
                    "📂 No reported path usable, scanning workspace"
                );
                self.newest_in_workspace(&root).await?
            }
        };

        Ok(ResolvedArtifact {
            absolute_path,
            display_name: display_name(title.as_deref()),
            title,
        })
    }

    /// Merge all strategies: first metadata wins, candidates keep parser order
    fn run_parsers(&self, result: &ProcessResult) -> ParsedOutput {
        let mut merged = ParsedOutput::default();

        for parser in &self.parsers {
            let parsed = parser.parse(result);
            debug!(
                parser = parser.name(),
                has_metadata = parsed.metadata.is_some(),
                candidates = parsed.candidates.len(),
                "🔎 Parsed tool output"
            );

            if merged.metadata.is_none() {
                merged.metadata = parsed.metadata;
            }
            for candidate in parsed.candidates {
                if !merged.candidates.contains(&candidate) {
                    merged.candidates.push(candidate);
                }
            }
        }

        merged
    }

    async fn first_existing(&self, candidates: &[PathBuf], root: &Path) -> Option<PathBuf> {
        for candidate in candidates {
            let joined = if candidate.is_absolute() {
                candidate.clone()
            } else {
                root.join(candidate)
            };

            let Ok(canonical) = fs::canonicalize(&joined).await else {
                continue;
            };
            if !canonical.starts_with(root) {
                debug!(path = %canonical.display(), "🚫 Reported path lies outside the workspace");
                continue;
            }
            if is_regular_file(&canonical).await {
                return Some(canonical);
            }
        }
        None
    }

    async fn newest_in_workspace(&self, root: &Path) -> OrchestratorResult<PathBuf> {
        let mut entries = fs::read_dir(root)
            .await
            .map_err(|e| OrchestratorError::storage("list workspace", root, e))?;

        let mut files: Vec<(SystemTime, PathBuf)> = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| OrchestratorError::storage("list workspace", root, e))?
        {
            let Ok(metadata) = entry.metadata().await else {
                continue;
            };
            if !metadata.is_file() || is_partial(&entry.file_name().to_string_lossy()) {
                continue;
            }
            let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
            files.push((modified, entry.path()));
        }

        if files.len() > 1 && self.fallback_policy == FallbackPolicy::Strict {
            return Err(OrchestratorError::artifact_not_found(format!(
                "{} candidate files in workspace and none was reported by the tool",
                files.len()
            )));
        }

        files
            .into_iter()
            .max()
            .map(|(_, path)| path)
            .ok_or_else(|| OrchestratorError::artifact_not_found("workspace contains no downloaded file"))
    }
}

async fn is_regular_file(path: &Path) -> bool {
    fs::metadata(path).await.map(|m| m.is_file()).unwrap_or(false)
}

fn is_partial(file_name: &str) -> bool {
    PARTIAL_SUFFIXES.iter().any(|suffix| file_name.ends_with(suffix)) || file_name.contains(".part-Frag")
}
