//! Video download relay entry point

use clap::Parser;
use shared::logging;
use tokio::signal;

use orchestrator::RealAcquisitionOrchestrator;
use webserver::{Args, WebServer, WebServerResult};

#[tokio::main]
async fn main() -> WebServerResult<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    // Initialize tracing with optional endpoint and log level
    let trace_endpoint = args
        .trace_ep
        .as_ref()
        .map(|url| logging::TracingEndpoint::new(url.clone()));
    logging::init_tracing_with_endpoint_and_level("webserver", trace_endpoint, Some(args.log_level.as_str()));

    let addr = args.bind_address()?;
    let config = args.acquisition_config()?;
    let orchestrator = RealAcquisitionOrchestrator::from_config(&config)?;

    match orchestrator.workspace_manager().sweep_stale().await {
        Ok(0) => {}
        Ok(removed) => logging::log_success(&format!("🧹 Removed {} stale workspaces", removed)),
        Err(e) => logging::log_error("Stale workspace sweep", &e),
    }

    tracing::info!(
        tool = %config.tool.program,
        root = %config.download_root.display(),
        timeout_secs = config.tool.timeout.as_secs(),
        "🔧 Acquisition pipeline configured"
    );

    let shutdown = async {
        match signal::ctrl_c().await {
            Ok(()) => logging::log_shutdown("Received Ctrl+C signal"),
            Err(err) => logging::log_error("Signal handling", &err),
        }
    };

    let webserver = WebServer::new(orchestrator);
    webserver.run(addr, shutdown).await?;

    logging::log_success("WebServer stopped gracefully");
    Ok(())
}
