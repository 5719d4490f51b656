//! Helpers to handle child process stdout/stderr output
//!
//! Both pipes are drained concurrently so the child can never block on a
//! full pipe, and the collected bytes are decoded lossily once the child
//! exits.

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::task::JoinHandle;

/// Spawn a task that reads `pipe` to the end and returns the decoded text
pub fn spawn_output_collector<R>(pipe: Option<R>) -> JoinHandle<String>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let Some(mut pipe) = pipe else {
            return String::new();
        };

        let mut buffer = Vec::new();
        // A read error midway keeps whatever was collected so far
        let _ = pipe.read_to_end(&mut buffer).await;
        String::from_utf8_lossy(&buffer).into_owned()
    })
}

/// Await a collector, treating a panicked or cancelled task as empty output
pub async fn join_output(handle: JoinHandle<String>) -> String {
    handle.await.unwrap_or_default()
}

/// Text shown to the caller when the tool fails.
///
/// Keeps the tail of long output since the tool prints its `ERROR:` line
/// last.
pub fn display_stderr(stderr: &str, exit_code: i32, limit: usize) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        return format!("yt-dlp exited with status {exit_code}");
    }

    let char_count = trimmed.chars().count();
    if char_count <= limit {
        return trimmed.to_string();
    }

    let tail: String = trimmed.chars().skip(char_count - limit).collect();
    format!("…{tail}")
}
