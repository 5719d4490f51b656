//! Core business logic modules
//!
//! Pure functions with no I/O dependencies.

pub mod naming;

pub use naming::{DEFAULT_STEM, MEDIA_EXTENSION, display_name, sanitize_stem};
