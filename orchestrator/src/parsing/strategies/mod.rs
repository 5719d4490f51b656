//! Concrete output parsing strategies

pub mod destination_marker;
pub mod metadata_json;

pub use destination_marker::DestinationMarkerParser;
pub use metadata_json::MetadataJsonParser;

use super::traits::OutputParser;

/// Strategies in the order the resolver consults them
pub fn default_parsers() -> Vec<Box<dyn OutputParser>> {
    vec![Box::new(MetadataJsonParser::new()), Box::new(DestinationMarkerParser::new())]
}
