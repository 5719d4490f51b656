//! Main webserver implementation
//!
//! Owns the shared state and builds the axum router around it, using
//! dependency injection the same way the orchestrator does.

use axum::Router;
use axum::routing::{get, post};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use orchestrator::{AcquisitionOrchestrator, ProcessInvoker, WorkspaceManager};
use shared::logging;

use crate::error::{WebServerError, WebServerResult};
use crate::state::WebServerState;
use crate::web::handlers;

/// Main webserver struct with dependency injection
pub struct WebServer<W, P>
where
    W: WorkspaceManager + 'static,
    P: ProcessInvoker + 'static,
{
    state: Arc<WebServerState<W, P>>,
}

impl<W, P> Clone for WebServer<W, P>
where
    W: WorkspaceManager + 'static,
    P: ProcessInvoker + 'static,
{
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}

impl<W, P> WebServer<W, P>
where
    W: WorkspaceManager + 'static,
    P: ProcessInvoker + 'static,
{
    pub fn new(orchestrator: AcquisitionOrchestrator<W, P>) -> Self {
        Self {
            state: Arc::new(WebServerState::new(orchestrator)),
        }
    }

    /// Build the Axum router with all routes
    pub fn build_router(&self) -> Router {
        Router::new()
            .route("/", get(handlers::index))
            .route("/download", post(handlers::download::<W, P>))
            .route("/health", get(handlers::health::<W, P>))
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(CorsLayer::permissive())
                    .into_inner(),
            )
            .with_state(self.state.clone())
    }

    /// Serve until `shutdown` resolves; in-flight responses are allowed to finish
    pub async fn run<F>(&self, addr: SocketAddr, shutdown: F) -> WebServerResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| WebServerError::ServerStartup(format!("Failed to bind to {}: {}", addr, e)))?;

        logging::log_startup(&format!("HTTP server on http://{}", addr));

        axum::serve(listener, self.build_router())
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| WebServerError::ServerStartup(format!("Server error: {}", e)))
    }

    /// Get server state for external access
    pub fn state(&self) -> &Arc<WebServerState<W, P>> {
        &self.state
    }
}
