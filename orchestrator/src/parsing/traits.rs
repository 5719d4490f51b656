//! Output parsing strategy trait definition

use crate::types::{ParsedOutput, ProcessResult};

/// A strategy for extracting metadata and artifact paths from tool output.
///
/// Implementations must never fail: unparseable output yields an empty
/// [`ParsedOutput`].
#[mockall::automock]
pub trait OutputParser: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &'static str;

    fn parse(&self, output: &ProcessResult) -> ParsedOutput;
}
