//! Shared error types for the media relay

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SharedError {
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },
}

pub type SharedResult<T> = Result<T, SharedError>;
