//! Per-video JSON metadata strategy
//!
//! The tool prints one JSON object per downloaded item on stdout. The first
//! line that is a complete JSON object is taken as the metadata for this
//! request; it supplies the title and the filename the tool chose.

use crate::parsing::traits::OutputParser;
use crate::types::{ParsedOutput, ProcessResult, VideoMetadata};

#[derive(Debug, Default, Clone)]
pub struct MetadataJsonParser;

impl MetadataJsonParser {
    pub fn new() -> Self {
        Self
    }

    fn find_metadata(stdout: &str) -> Option<VideoMetadata> {
        stdout
            .lines()
            .map(str::trim)
            .filter(|line| line.starts_with('{') && line.ends_with('}'))
            .find_map(|line| serde_json::from_str::<VideoMetadata>(line).ok())
    }
}

impl OutputParser for MetadataJsonParser {
    fn name(&self) -> &'static str {
        "metadata-json"
    }

    fn parse(&self, output: &ProcessResult) -> ParsedOutput {
        match Self::find_metadata(&output.stdout) {
            Some(metadata) => ParsedOutput {
                candidates: metadata.reported_paths(),
                metadata: Some(metadata),
            },
            None => ParsedOutput::default(),
        }
    }
}
