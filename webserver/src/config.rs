//! Command line and environment configuration
//!
//! Parsed once at startup; the resulting [`AcquisitionConfig`] is handed to
//! the orchestrator and never re-read.

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use orchestrator::config::{
    DEFAULT_ERROR_LIMIT, DEFAULT_FORMAT_SELECTOR, DEFAULT_GEO_BYPASS_COUNTRY, DEFAULT_TOOL_PROGRAM,
};
use orchestrator::{AcquisitionConfig, FallbackPolicy, ToolConfig};

use crate::error::{WebServerError, WebServerResult};

/// Video download relay
#[derive(Parser, Debug, Clone)]
#[command(name = "webserver")]
#[command(about = "HTTP relay that downloads videos with yt-dlp and streams them back")]
pub struct Args {
    /// Interface to bind
    #[arg(long, env = "RELAY_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port for HTTP server
    #[arg(long, env = "RELAY_PORT", default_value_t = 5000)]
    pub port: u16,

    /// Directory under which per-request workspaces are created
    #[arg(long, env = "DOWNLOAD_DIR", default_value = "downloads")]
    pub download_dir: PathBuf,

    /// Proxy passed to the download tool
    #[arg(long, env = "PROXY_URL")]
    pub proxy_url: Option<String>,

    /// Download tool executable
    #[arg(long, env = "YT_DLP_BIN", default_value = DEFAULT_TOOL_PROGRAM)]
    pub tool_bin: String,

    /// Extra leading argument for the tool (repeatable, e.g. `-m yt_dlp`)
    #[arg(long = "tool-arg", allow_hyphen_values = true)]
    pub tool_args: Vec<String>,

    /// Seconds before a running download is killed
    #[arg(long, env = "YT_DLP_TIMEOUT_SECS", default_value_t = 900)]
    pub tool_timeout_secs: u64,

    #[arg(long, default_value = DEFAULT_GEO_BYPASS_COUNTRY)]
    pub geo_bypass_country: String,

    /// Format selector passed with `-f`
    #[arg(long, default_value = DEFAULT_FORMAT_SELECTOR)]
    pub format: String,

    /// Do not pass `--verbose` to the tool
    #[arg(long)]
    pub no_tool_verbose: bool,

    /// Filesystem fallback when the tool reports no usable path (newest, strict)
    #[arg(long, default_value = "newest")]
    pub fallback_policy: FallbackPolicy,

    /// Maximum characters of tool stderr returned to clients
    #[arg(long, default_value_t = DEFAULT_ERROR_LIMIT)]
    pub error_limit: usize,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Tracing endpoint URL (if set, traces will be sent here)
    #[arg(long)]
    pub trace_ep: Option<String>,
}

impl Args {
    pub fn bind_address(&self) -> WebServerResult<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| WebServerError::config(format!("Invalid bind address {}:{}: {}", self.host, self.port, e)))
    }

    /// Build the acquisition configuration from parsed arguments
    pub fn acquisition_config(&self) -> WebServerResult<AcquisitionConfig> {
        let mut tool = ToolConfig::default()
            .with_program(self.tool_bin.clone(), self.tool_args.clone())
            .with_proxy(self.proxy_url.clone())
            .with_timeout(Duration::from_secs(self.tool_timeout_secs));
        tool.format_selector = self.format.clone();
        tool.geo_bypass_country = self.geo_bypass_country.to_ascii_uppercase();
        tool.verbose = !self.no_tool_verbose;

        let config = AcquisitionConfig {
            download_root: self.download_dir.clone(),
            tool,
            fallback_policy: self.fallback_policy,
            error_limit: self.error_limit,
        };
        config.validate()?;
        Ok(config)
    }
}
