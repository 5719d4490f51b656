//! Test helper utilities for webserver integration tests

use std::io::Write;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, Response, header};
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tower::ServiceExt;
use tracing_subscriber::fmt::MakeWriter;

use orchestrator::{
    AcquisitionOrchestrator, ArtifactResolver, MockProcessInvoker, MockWorkspaceManager, RealAcquisitionOrchestrator,
    RealProcessInvoker, RealWorkspaceManager, ToolConfig,
};
use webserver::WebServer;

/// A server whose download tool is a shell script
pub struct ScriptedServer {
    pub router: Router,
    pub root: PathBuf,
    _tool_dir: TempDir,
    _root_dir: TempDir,
}

impl ScriptedServer {
    pub fn new(script_body: &str) -> Self {
        let tool_dir = TempDir::new().unwrap();
        let script = tool_dir.path().join("fake-yt-dlp.sh");
        std::fs::write(&script, format!("#!/bin/sh\n{script_body}\n")).unwrap();

        let tool = ToolConfig::default()
            .with_program("/bin/sh", vec![script.display().to_string()])
            .with_timeout(Duration::from_secs(20));
        Self::with_tool(tool, tool_dir)
    }

    /// Server whose tool binary does not exist
    pub fn missing_tool() -> Self {
        let tool = ToolConfig::default().with_program("/nonexistent/yt-dlp", Vec::new());
        Self::with_tool(tool, TempDir::new().unwrap())
    }

    fn with_tool(tool: ToolConfig, tool_dir: TempDir) -> Self {
        let root_dir = TempDir::new().unwrap();
        let root = root_dir.path().join("downloads");

        let orchestrator: RealAcquisitionOrchestrator = AcquisitionOrchestrator::new(
            RealWorkspaceManager::new(&root),
            RealProcessInvoker::new(tool),
            ArtifactResolver::default(),
        );

        Self {
            router: WebServer::new(orchestrator).build_router(),
            root,
            _tool_dir: tool_dir,
            _root_dir: root_dir,
        }
    }

    /// Workspaces currently present under the download root
    pub fn workspace_count(&self) -> usize {
        workspace_count(&self.root)
    }
}

pub fn workspace_count(root: &Path) -> usize {
    std::fs::read_dir(root).map(|entries| entries.count()).unwrap_or(0)
}

/// Router over mocks that fail the test if anything is allocated or run
pub fn untouchable_router() -> Router {
    let mut manager = MockWorkspaceManager::new();
    manager.expect_allocate().times(0);
    manager.expect_release().times(0);
    let mut invoker = MockProcessInvoker::new();
    invoker.expect_run().times(0);

    WebServer::new(AcquisitionOrchestrator::new(manager, invoker, ArtifactResolver::default())).build_router()
}

pub async fn post_download(router: Router, body: &str) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri("/download")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    router.oneshot(request).await.unwrap()
}

pub async fn get(router: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    router.oneshot(request).await.unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec()
}

/// The `error` field of a JSON error body
pub async fn error_message(response: Response<Body>) -> String {
    let body: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    body["error"].as_str().unwrap().to_string()
}

/// Serve `router` on an ephemeral local port
pub async fn serve(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, router).await });
    addr
}

/// Send a raw HTTP/1.1 POST and read until the server closes the connection
pub async fn raw_post_download(addr: SocketAddr, body: &str) -> (String, Vec<u8>) {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let request = format!(
        "POST /download HTTP/1.1\r\nHost: {addr}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut raw = Vec::new();
    stream.read_to_end(&mut raw).await.unwrap();
    let split = raw.windows(4).position(|w| w == b"\r\n\r\n").expect("response has a header block");
    let head = String::from_utf8_lossy(&raw[..split]).into_owned();
    (head, raw[split + 4..].to_vec())
}

/// Wait until no workspace is left under `root`
pub async fn wait_for_empty_root(root: &Path) {
    for _ in 0..100 {
        if workspace_count(root) == 0 {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("workspaces left under {}", root.display());
}

/// In-memory log sink for a test-local subscriber
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
