//! Tool output parsing
//!
//! Each strategy turns captured process output into an optional
//! [`VideoMetadata`](crate::types::VideoMetadata) and a list of candidate
//! artifact paths. The resolver consults strategies in order, so support
//! for a new tool output format is added by writing a strategy rather than
//! touching the resolver.

pub mod strategies;
pub mod traits;

pub use strategies::{DestinationMarkerParser, MetadataJsonParser, default_parsers};
pub use traits::OutputParser;
