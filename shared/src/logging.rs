//! Shared logging utilities for consistent, request-aware tracing

use crate::types::RequestId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{Event, Subscriber, error, info};
use tracing_subscriber::layer::Context;

/// Name of the running service, recorded on shipped trace events
static SERVICE_NAME: OnceLock<&'static str> = OnceLock::new();

/// Name used when tracing was never initialised (unit tests)
const UNKNOWN_SERVICE: &str = "relay";

/// Crates whose events pass the default filter
const FILTERED_CRATES: &[&str] = &["webserver", "orchestrator", "shared"];

fn service_name() -> &'static str {
    SERVICE_NAME.get().copied().unwrap_or(UNKNOWN_SERVICE)
}

/// Tracing endpoint configuration
#[derive(Debug, Clone)]
pub struct TracingEndpoint {
    pub url: String,
    pub batch_size: usize,
    pub flush_interval: Duration,
}

impl TracingEndpoint {
    pub fn new(url: String) -> Self {
        Self {
            url,
            batch_size: 20,
            flush_interval: Duration::from_millis(500),
        }
    }
}

/// Structured trace event for HTTP endpoint
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TraceEvent {
    pub timestamp: DateTime<Utc>,
    pub level: String,
    pub target: String,
    pub message: String,
    pub service: String,
    pub request: Option<String>,
    pub fields: HashMap<String, serde_json::Value>,
}

/// HTTP tracing layer that ships request-tagged events to a remote collector
pub struct HttpTracingLayer {
    sender: mpsc::UnboundedSender<TraceEvent>,
}

impl HttpTracingLayer {
    /// Must be called from within a tokio runtime
    pub fn new(endpoint: TracingEndpoint) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<TraceEvent>();

        let TracingEndpoint {
            url,
            batch_size,
            flush_interval,
        } = endpoint;

        tokio::spawn(async move {
            let client = reqwest::Client::new();
            let mut buffer = Vec::with_capacity(batch_size);
            let mut flush_timer = tokio::time::interval(flush_interval);

            loop {
                tokio::select! {
                    event = rx.recv() => {
                        match event {
                            Some(event) => {
                                buffer.push(event);
                                if buffer.len() >= batch_size {
                                    Self::send_batch(&client, &url, &mut buffer).await;
                                }
                            }
                            None => {
                                if !buffer.is_empty() {
                                    Self::send_batch(&client, &url, &mut buffer).await;
                                }
                                break;
                            }
                        }
                    }
                    _ = flush_timer.tick() => {
                        if !buffer.is_empty() {
                            Self::send_batch(&client, &url, &mut buffer).await;
                        }
                    }
                }
            }
        });

        HttpTracingLayer { sender: tx }
    }

    async fn send_batch(client: &reqwest::Client, endpoint_url: &str, buffer: &mut Vec<TraceEvent>) {
        let batch = std::mem::take(buffer);

        // Shipping failures go to stderr; logging them through tracing would loop back here
        match client.post(endpoint_url).json(&batch).send().await {
            Ok(response) if !response.status().is_success() => {
                eprintln!("trace shipping failed: HTTP {}", response.status());
            }
            Ok(_) => {}
            Err(e) => {
                eprintln!("trace shipping failed: {e}");
            }
        }
    }
}

impl<S> tracing_subscriber::Layer<S> for HttpTracingLayer
where
    S: Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let mut fields = HashMap::new();
        let mut message = String::new();

        let mut visitor = TraceVisitor {
            message: &mut message,
            fields: &mut fields,
        };
        event.record(&mut visitor);

        // Only events emitted through the request_* macros or log_* helpers are shipped
        if !fields.contains_key("request") && !fields.contains_key("service") {
            return;
        }

        let request = match fields.remove("request") {
            Some(serde_json::Value::String(id)) => Some(id),
            _ => None,
        };

        let trace_event = TraceEvent {
            timestamp: Utc::now(),
            level: metadata.level().to_string(),
            target: metadata.target().to_string(),
            message,
            service: service_name().to_string(),
            request,
            fields,
        };

        let _ = self.sender.send(trace_event);
    }
}

/// Visitor to extract event fields and message
struct TraceVisitor<'a> {
    message: &'a mut String,
    fields: &'a mut HashMap<String, serde_json::Value>,
}

impl<'a> tracing::field::Visit for TraceVisitor<'a> {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message.push_str(&format!("{value:?}"));
        } else {
            self.fields.insert(
                field.name().to_string(),
                serde_json::Value::String(format!("{value:?}")),
            );
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            self.fields
                .insert(field.name().to_string(), serde_json::Value::String(value.to_string()));
        }
    }

    fn record_i64(&mut self, field: &tracing::field::Field, value: i64) {
        self.fields.insert(field.name().to_string(), serde_json::Value::from(value));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.fields.insert(field.name().to_string(), serde_json::Value::from(value));
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.fields.insert(field.name().to_string(), serde_json::Value::Bool(value));
    }
}

/// Build the default filter directive for the relay crates
pub fn filter_directive(log_level: &str) -> String {
    let mut directives: Vec<String> = FILTERED_CRATES
        .iter()
        .map(|krate| format!("{krate}={log_level}"))
        .collect();
    directives.push(format!("tower_http={log_level}"));
    directives.push("axum=warn".to_string());
    directives.push("hyper=warn".to_string());
    directives.join(",")
}

/// Build the subscriber stack without installing it.
///
/// `RUST_LOG`, when set, takes precedence over `log_level`. The HTTP layer
/// is only present when `endpoint` is given and must then be built inside a
/// tokio runtime.
pub fn build_subscriber(
    endpoint: Option<TracingEndpoint>,
    log_level: Option<&str>,
) -> impl Subscriber + Send + Sync + 'static {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let directive = filter_directive(log_level.unwrap_or("info"));
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&directive));

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(endpoint.map(HttpTracingLayer::new))
        .with(fmt_layer)
}

/// Initialize tracing subscriber with optional endpoint and log level
pub fn init_tracing_with_endpoint_and_level(
    service: &'static str,
    endpoint: Option<TracingEndpoint>,
    log_level: Option<&str>,
) {
    use tracing_subscriber::util::SubscriberInitExt;

    let _ = SERVICE_NAME.set(service);

    let endpoint_url = endpoint.as_ref().map(|e| e.url.clone());
    build_subscriber(endpoint, log_level).init();

    if let Some(url) = endpoint_url {
        info!(service = service, "📡 Tracing endpoint configured: {}", url);
    }
    info!(
        service = service,
        "📊 Log filter: {}",
        filter_directive(log_level.unwrap_or("info"))
    );
}

/// Get formatted timestamp for consistent logging
pub fn format_timestamp() -> String {
    let now: DateTime<Utc> = Utc::now();
    now.format("%H:%M:%S%.3f").to_string()
}

/// Macro for request-aware info logging
#[macro_export]
macro_rules! request_info {
    ($request_id:expr, $($arg:tt)*) => {
        $crate::tracing::info!(
            request = %$request_id,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for request-aware warning logging
#[macro_export]
macro_rules! request_warn {
    ($request_id:expr, $($arg:tt)*) => {
        $crate::tracing::warn!(
            request = %$request_id,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for request-aware error logging
#[macro_export]
macro_rules! request_error {
    ($request_id:expr, $($arg:tt)*) => {
        $crate::tracing::error!(
            request = %$request_id,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for request-aware debug logging
#[macro_export]
macro_rules! request_debug {
    ($request_id:expr, $($arg:tt)*) => {
        $crate::tracing::debug!(
            request = %$request_id,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Contextual logging helper for startup messages
pub fn log_startup(details: &str) {
    info!(
        service = service_name(),
        timestamp = format_timestamp(),
        "🚀 Starting {}",
        details
    );
}

/// Contextual logging helper for shutdown messages
pub fn log_shutdown(reason: &str) {
    info!(
        service = service_name(),
        timestamp = format_timestamp(),
        "🛑 Shutting down: {}",
        reason
    );
}

/// Contextual logging helper for error conditions
pub fn log_error(context: &str, error: &dyn std::fmt::Display) {
    error!(
        service = service_name(),
        timestamp = format_timestamp(),
        error = %error,
        "❌ {} failed: {}",
        context,
        error
    );
}

/// Contextual logging helper for request-scoped error conditions
pub fn log_request_error(request_id: &RequestId, context: &str, error: &dyn std::fmt::Display) {
    error!(
        request = %request_id,
        timestamp = format_timestamp(),
        error = %error,
        "❌ {} failed: {}",
        context,
        error
    );
}

/// Contextual logging helper for success conditions
pub fn log_success(message: &str) {
    info!(
        service = service_name(),
        timestamp = format_timestamp(),
        "✅ {}",
        message
    );
}
