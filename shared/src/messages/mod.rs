//! Wire messages exchanged with HTTP clients
//!
//! The HTTP boundary only ever accepts a download body and answers with a
//! byte stream or one of the JSON bodies defined here.

pub mod download;

pub use download::{DownloadBody, ErrorResponse, HealthResponse};
