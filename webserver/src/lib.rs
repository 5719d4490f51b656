//! Webserver library for the video download relay
//!
//! HTTP surface over the acquisition orchestrator: request validation,
//! error-to-status mapping, and streamed attachment responses.

pub mod config;
pub mod error;
pub mod state;
pub mod web;
pub mod webserver_impl;

// Re-export main types
pub use config::Args;
pub use error::{WebServerError, WebServerResult};
pub use state::WebServerState;
pub use webserver_impl::WebServer;
