//! Real process invocation service implementation
//!
//! Launches the external download tool with a fixed argument vector, drains
//! its output, and bounds the run with a timeout. The child is placed in its
//! own process group so a timeout or a dropped request also takes down any
//! helper processes it started (e.g. ffmpeg for merging).

use async_trait::async_trait;
use std::ffi::OsString;
use std::io::ErrorKind;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

use super::process_output_handler::{display_stderr, join_output, spawn_output_collector};
use crate::config::{DEFAULT_ERROR_LIMIT, OUTPUT_TEMPLATE, ToolConfig};
use crate::error::{OrchestratorError, OrchestratorResult};
use crate::traits::ProcessInvoker;
use crate::types::{ProcessResult, Workspace};

/// How long to wait for pipes to close after the tool has exited
const OUTPUT_DRAIN_GRACE: Duration = Duration::from_secs(5);

/// Real process invoker implementation
#[derive(Debug, Clone)]
pub struct RealProcessInvoker {
    config: ToolConfig,
    error_limit: usize,
}

impl RealProcessInvoker {
    pub fn new(config: ToolConfig) -> Self {
        Self {
            config,
            error_limit: DEFAULT_ERROR_LIMIT,
        }
    }

    /// Configure how much stderr is surfaced on failure (fluent API)
    pub fn with_error_limit(mut self, error_limit: usize) -> Self {
        self.error_limit = error_limit;
        self
    }

    pub fn config(&self) -> &ToolConfig {
        &self.config
    }

    /// Build the full argument vector (excluding the program itself).
    ///
    /// The URL always comes last, after `--`, as a single argument.
    pub fn build_args(&self, url: &str, workspace: &Workspace) -> Vec<OsString> {
        let template = workspace.path.join(OUTPUT_TEMPLATE);

        let mut args: Vec<OsString> = self.config.program_args.iter().map(OsString::from).collect();
        args.push("-f".into());
        args.push(self.config.format_selector.clone().into());
        args.push("-o".into());
        args.push(template.into_os_string());
        args.push("--restrict-filenames".into());
        args.push("--no-playlist".into());
        args.push("--print-json".into());
        args.push("--no-check-certificate".into());
        args.push("--geo-bypass-country".into());
        args.push(self.config.geo_bypass_country.clone().into());

        if self.config.verbose {
            args.push("--verbose".into());
        }

        if let Some(ref proxy) = self.config.proxy_url {
            args.push("--proxy".into());
            args.push(proxy.into());
        }

        args.push("--".into());
        args.push(url.into());
        args
    }

    fn command(&self, url: &str, workspace: &Workspace) -> Command {
        let mut std_cmd = std::process::Command::new(&self.config.program);
        std_cmd
            .args(self.build_args(url, workspace))
            .current_dir(&workspace.path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            std_cmd.process_group(0);
        }

        let mut cmd = Command::from(std_cmd);
        cmd.kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl ProcessInvoker for RealProcessInvoker {
    async fn run(&self, url: &str, workspace: &Workspace) -> OrchestratorResult<ProcessResult> {
        let mut child = self
            .command(url, workspace)
            .spawn()
            .map_err(|source| match source.kind() {
                ErrorKind::NotFound => OrchestratorError::ToolNotFound {
                    program: self.config.program.clone(),
                    source,
                },
                _ => OrchestratorError::storage("launch download tool", &self.config.program, source),
            })?;

        let mut group = ProcessGroupGuard::new(child.id());
        debug!(
            workspace = %workspace.id,
            pid = child.id().unwrap_or(0),
            "🎬 Spawned {}",
            self.config.program
        );

        let stdout = spawn_output_collector(child.stdout.take());
        let stderr = spawn_output_collector(child.stderr.take());

        let status = match tokio::time::timeout(self.config.timeout, child.wait()).await {
            Ok(Ok(status)) => status,
            Ok(Err(e)) => {
                group.kill();
                stdout.abort();
                stderr.abort();
                return Err(OrchestratorError::ToolExecution {
                    exit_code: -1,
                    stderr: format!("failed to wait for {}: {e}", self.config.program),
                });
            }
            Err(_) => {
                warn!(
                    workspace = %workspace.id,
                    "⏱️ {} exceeded {}s, killing",
                    self.config.program,
                    self.config.timeout.as_secs()
                );
                group.kill();
                let _ = child.kill().await;
                stdout.abort();
                stderr.abort();
                return Err(OrchestratorError::ToolTimeout {
                    timeout: self.config.timeout,
                });
            }
        };
        group.disarm();

        let (stdout, stderr) = tokio::join!(
            tokio::time::timeout(OUTPUT_DRAIN_GRACE, join_output(stdout)),
            tokio::time::timeout(OUTPUT_DRAIN_GRACE, join_output(stderr)),
        );
        let result = ProcessResult {
            // Killed by a signal
            exit_code: status.code().unwrap_or(-1),
            stdout: stdout.unwrap_or_default(),
            stderr: stderr.unwrap_or_default(),
        };

        debug!(
            workspace = %workspace.id,
            exit_code = result.exit_code,
            stdout_bytes = result.stdout.len(),
            stderr_bytes = result.stderr.len(),
            "🏁 {} finished",
            self.config.program
        );

        if !result.success() {
            return Err(OrchestratorError::ToolExecution {
                exit_code: result.exit_code,
                stderr: display_stderr(&result.stderr, result.exit_code, self.error_limit),
            });
        }

        Ok(result)
    }
}

/// Kills the child's process group unless disarmed.
///
/// Dropping an armed guard (the request future was cancelled) kills the
/// group as well.
struct ProcessGroupGuard {
    pgid: Option<u32>,
}

impl ProcessGroupGuard {
    fn new(pgid: Option<u32>) -> Self {
        Self { pgid }
    }

    fn kill(&mut self) {
        if let Some(pgid) = self.pgid.take() {
            kill_process_group(pgid);
        }
    }

    fn disarm(&mut self) {
        self.pgid = None;
    }
}

impl Drop for ProcessGroupGuard {
    fn drop(&mut self) {
        self.kill();
    }
}

#[cfg(unix)]
fn kill_process_group(pgid: u32) {
    use nix::sys::signal::{Signal, killpg};
    use nix::unistd::Pid;

    if let Ok(raw) = i32::try_from(pgid) {
        let _ = killpg(Pid::from_raw(raw), Signal::SIGKILL);
    }
}

#[cfg(not(unix))]
fn kill_process_group(_pgid: u32) {}
