//! Shared types for the media relay
//!
//! Contains the request model, wire messages, the shared error type and
//! the tracing setup used by both the orchestrator library and the
//! webserver binary.

pub mod errors;
pub mod logging;
pub mod messages;
pub mod types;

pub use errors::*;
pub use types::*;

pub use messages::{DownloadBody, ErrorResponse, HealthResponse};

// Used by the request_* logging macros
#[doc(hidden)]
pub use tracing;
