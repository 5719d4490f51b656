//! Destination log line strategy
//!
//! Scrapes the human-readable progress lines the tool writes to stdout and
//! stderr. A merge line names the final file, so it outranks per-stream
//! destination lines; within each kind the latest line wins.

use regex::Regex;
use std::path::PathBuf;
use std::sync::LazyLock;

use crate::parsing::traits::OutputParser;
use crate::types::{ParsedOutput, ProcessResult};

static MERGER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\[Merger\] Merging formats into "(?P<path>.+)"$"#).expect("merger pattern is valid")
});

static ALREADY_DOWNLOADED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[download\] (?P<path>.+?) has already been downloaded(?: and merged)?$")
        .expect("already-downloaded pattern is valid")
});

static DESTINATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[(?:download|ExtractAudio|VideoConvertor|VideoRemuxer)\] Destination: (?P<path>.+)$")
        .expect("destination pattern is valid")
});

#[derive(Debug, Default, Clone)]
pub struct DestinationMarkerParser;

impl DestinationMarkerParser {
    pub fn new() -> Self {
        Self
    }

    /// Paths matched by `pattern`, latest line first
    fn matches(pattern: &Regex, text: &str) -> Vec<PathBuf> {
        let mut found: Vec<PathBuf> = text
            .lines()
            .map(|line| line.trim_end_matches('\r').trim())
            .filter_map(|line| pattern.captures(line))
            .filter_map(|caps| caps.name("path"))
            .map(|m| m.as_str().trim())
            .filter(|path| !path.is_empty())
            .map(PathBuf::from)
            .collect();
        found.reverse();
        found
    }
}

impl OutputParser for DestinationMarkerParser {
    fn name(&self) -> &'static str {
        "destination-marker"
    }

    fn parse(&self, output: &ProcessResult) -> ParsedOutput {
        let mut candidates: Vec<PathBuf> = Vec::new();

        for pattern in [&*MERGER, &*ALREADY_DOWNLOADED, &*DESTINATION] {
            for text in [&output.stdout, &output.stderr] {
                for path in Self::matches(pattern, text) {
                    if !candidates.contains(&path) {
                        candidates.push(path);
                    }
                }
            }
        }

        ParsedOutput {
            metadata: None,
            candidates,
        }
    }
}
