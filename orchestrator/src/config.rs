//! Static acquisition configuration
//!
//! Built once at startup and handed to the services at construction.
//! Nothing in the orchestrator reads the process environment at call time.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::OrchestratorError;

pub const DEFAULT_FORMAT_SELECTOR: &str = "bestvideo[ext=mp4]+bestaudio[ext=m4a]/best[ext=mp4]/best";
pub const DEFAULT_GEO_BYPASS_COUNTRY: &str = "JP";
pub const DEFAULT_TOOL_PROGRAM: &str = "yt-dlp";
pub const DEFAULT_TOOL_TIMEOUT: Duration = Duration::from_secs(900);
pub const DEFAULT_DOWNLOAD_ROOT: &str = "downloads";
pub const DEFAULT_ERROR_LIMIT: usize = 4000;

/// Output filename template appended to the workspace directory
pub const OUTPUT_TEMPLATE: &str = "%(title)s.%(ext)s";

/// How the external download tool is launched
#[derive(Debug, Clone)]
pub struct ToolConfig {
    /// Program to execute (e.g. `yt-dlp`, or a Python interpreter)
    pub program: String,
    /// Arguments placed before the generated ones (e.g. `-m yt_dlp`)
    pub program_args: Vec<String>,
    pub format_selector: String,
    pub geo_bypass_country: String,
    pub proxy_url: Option<String>,
    pub verbose: bool,
    pub timeout: Duration,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_TOOL_PROGRAM.to_string(),
            program_args: Vec::new(),
            format_selector: DEFAULT_FORMAT_SELECTOR.to_string(),
            geo_bypass_country: DEFAULT_GEO_BYPASS_COUNTRY.to_string(),
            proxy_url: None,
            verbose: true,
            timeout: DEFAULT_TOOL_TIMEOUT,
        }
    }
}

impl ToolConfig {
    /// Configure program and leading arguments (fluent API)
    pub fn with_program(mut self, program: impl Into<String>, program_args: Vec<String>) -> Self {
        self.program = program.into();
        self.program_args = program_args;
        self
    }

    /// Configure proxy (fluent API)
    pub fn with_proxy(mut self, proxy_url: Option<String>) -> Self {
        self.proxy_url = proxy_url.filter(|p| !p.trim().is_empty());
        self
    }

    /// Configure timeout (fluent API)
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn validate(&self) -> Result<(), OrchestratorError> {
        if self.program.trim().is_empty() {
            return Err(OrchestratorError::config("tool program must not be empty"));
        }
        if self.timeout.is_zero() {
            return Err(OrchestratorError::config("tool timeout must be greater than zero"));
        }
        let country = &self.geo_bypass_country;
        if country.len() != 2 || !country.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(OrchestratorError::config(format!(
                "geo bypass country must be a two-letter code, got '{country}'"
            )));
        }
        Ok(())
    }
}

/// What to do when the filesystem fallback finds several candidate files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackPolicy {
    /// Pick the most recently modified file
    #[default]
    Newest,
    /// Refuse to guess when more than one file is present
    Strict,
}

impl FromStr for FallbackPolicy {
    type Err = OrchestratorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "newest" => Ok(Self::Newest),
            "strict" => Ok(Self::Strict),
            other => Err(OrchestratorError::config(format!(
                "unknown fallback policy '{other}' (expected newest or strict)"
            ))),
        }
    }
}

/// Complete configuration of the acquisition pipeline
#[derive(Debug, Clone)]
pub struct AcquisitionConfig {
    pub download_root: PathBuf,
    pub tool: ToolConfig,
    pub fallback_policy: FallbackPolicy,
    /// Maximum number of characters of tool stderr surfaced to callers
    pub error_limit: usize,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            download_root: PathBuf::from(DEFAULT_DOWNLOAD_ROOT),
            tool: ToolConfig::default(),
            fallback_policy: FallbackPolicy::default(),
            error_limit: DEFAULT_ERROR_LIMIT,
        }
    }
}

impl AcquisitionConfig {
    pub fn validate(&self) -> Result<(), OrchestratorError> {
        if self.download_root.as_os_str().is_empty() {
            return Err(OrchestratorError::config("download root must not be empty"));
        }
        if self.error_limit == 0 {
            return Err(OrchestratorError::config("error limit must be greater than zero"));
        }
        self.tool.validate()
    }
}
