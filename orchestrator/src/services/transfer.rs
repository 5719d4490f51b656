//! Transfer & cleanup coordination
//!
//! Opens the resolved artifact and hands back a byte stream that owns the
//! request's [`WorkspaceGuard`]. The workspace is released exactly once:
//! as soon as the last expected byte has been yielded, on the first read
//! error, or when the stream is dropped before completion (client went away).
//! Length-delimited bodies are dropped by the server right after the last
//! byte, so completion cannot wait for a trailing end-of-stream poll.

use bytes::Bytes;
use futures_util::Stream;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::fs::File;
use tokio_util::io::ReaderStream;

use super::workspace_manager::WorkspaceGuard;
use crate::error::{OrchestratorError, OrchestratorResult};
use crate::types::ResolvedArtifact;
use shared::{request_debug, request_error, request_info, request_warn};

/// Read chunk size for streaming artifacts
const CHUNK_SIZE: usize = 64 * 1024;

/// A resolved artifact ready to be sent
#[derive(Debug)]
pub struct Delivery {
    pub artifact: ResolvedArtifact,
    pub content_length: u64,
    pub stream: DeliveryStream,
}

/// Stateless coordinator turning an artifact into a [`Delivery`]
#[derive(Debug, Clone, Copy, Default)]
pub struct TransferCoordinator;

impl TransferCoordinator {
    pub fn new() -> Self {
        Self
    }

    /// Open `artifact` and bind the workspace lifetime to the returned stream.
    ///
    /// On failure the guard is dropped here, which releases the workspace.
    pub async fn deliver(&self, artifact: ResolvedArtifact, guard: WorkspaceGuard) -> OrchestratorResult<Delivery> {
        let file = File::open(&artifact.absolute_path)
            .await
            .map_err(|e| OrchestratorError::storage("open artifact", &artifact.absolute_path, e))?;
        let content_length = file
            .metadata()
            .await
            .map_err(|e| OrchestratorError::storage("stat artifact", &artifact.absolute_path, e))?
            .len();

        request_debug!(
            guard.request_id(),
            "📤 Streaming {} ({} bytes) as {}",
            artifact.absolute_path.display(),
            content_length,
            artifact.display_name
        );

        Ok(Delivery {
            artifact,
            content_length,
            stream: DeliveryStream::new(file, content_length, guard),
        })
    }
}

/// File byte stream that releases its workspace when finished or dropped
pub struct DeliveryStream {
    inner: ReaderStream<File>,
    guard: Option<WorkspaceGuard>,
    expected: u64,
    sent: u64,
}

impl DeliveryStream {
    fn new(file: File, expected: u64, guard: WorkspaceGuard) -> Self {
        Self {
            inner: ReaderStream::with_capacity(file, CHUNK_SIZE),
            guard: Some(guard),
            expected,
            sent: 0,
        }
    }

    pub fn bytes_sent(&self) -> u64 {
        self.sent
    }

    /// True once the workspace has been handed back
    pub fn is_finished(&self) -> bool {
        self.guard.is_none()
    }

    fn complete(&mut self) {
        if let Some(guard) = self.guard.as_ref() {
            request_info!(guard.request_id(), "✅ Delivered {} bytes", self.sent);
        }
        self.finish();
    }

    fn finish(&mut self) {
        if let Some(guard) = self.guard.take() {
            // Failures are logged inside the guard
            let _ = guard.release();
        }
    }
}

impl Stream for DeliveryStream {
    type Item = io::Result<Bytes>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.guard.is_none() {
            return Poll::Ready(None);
        }

        match Pin::new(&mut this.inner).poll_next(cx) {
            Poll::Ready(Some(Ok(chunk))) => {
                this.sent += chunk.len() as u64;
                if this.sent >= this.expected {
                    this.complete();
                }
                Poll::Ready(Some(Ok(chunk)))
            }
            Poll::Ready(Some(Err(e))) => {
                if let Some(guard) = this.guard.as_ref() {
                    request_error!(
                        guard.request_id(),
                        "⚠️ Read error after {} of {} bytes: {}",
                        this.sent,
                        this.expected,
                        e
                    );
                }
                this.finish();
                Poll::Ready(Some(Err(e)))
            }
            Poll::Ready(None) => {
                this.complete();
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl Drop for DeliveryStream {
    fn drop(&mut self) {
        if let Some(guard) = self.guard.as_ref() {
            request_warn!(
                guard.request_id(),
                "🔌 Transfer aborted after {} of {} bytes",
                self.sent,
                self.expected
            );
        }
        self.finish();
    }
}

impl std::fmt::Debug for DeliveryStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeliveryStream")
            .field("expected", &self.expected)
            .field("sent", &self.sent)
            .field("finished", &self.is_finished())
            .finish()
    }
}
