//! Webserver state management
//!
//! Shared by every request: the acquisition pipeline plus a couple of
//! counters for the health endpoint.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Instant;

use orchestrator::{AcquisitionOrchestrator, ProcessInvoker, WorkspaceManager};

/// Core webserver state
pub struct WebServerState<W, P>
where
    W: WorkspaceManager + 'static,
    P: ProcessInvoker + 'static,
{
    pub orchestrator: AcquisitionOrchestrator<W, P>,
    pub server_start_time: Instant,
    active_downloads: Arc<AtomicU32>,
}

impl<W, P> WebServerState<W, P>
where
    W: WorkspaceManager + 'static,
    P: ProcessInvoker + 'static,
{
    pub fn new(orchestrator: AcquisitionOrchestrator<W, P>) -> Self {
        Self {
            orchestrator,
            server_start_time: Instant::now(),
            active_downloads: Arc::new(AtomicU32::new(0)),
        }
    }

    /// Get server uptime in seconds
    pub fn get_uptime_seconds(&self) -> u64 {
        self.server_start_time.elapsed().as_secs()
    }

    pub fn active_downloads(&self) -> u32 {
        self.active_downloads.load(Ordering::Relaxed)
    }

    /// Count a download as in flight until the returned guard is dropped
    pub fn begin_download(&self) -> InFlightDownload {
        self.active_downloads.fetch_add(1, Ordering::Relaxed);
        InFlightDownload {
            counter: self.active_downloads.clone(),
        }
    }
}

/// Decrements the in-flight counter on drop
#[derive(Debug)]
pub struct InFlightDownload {
    counter: Arc<AtomicU32>,
}

impl Drop for InFlightDownload {
    fn drop(&mut self) {
        self.counter.fetch_sub(1, Ordering::Relaxed);
    }
}
