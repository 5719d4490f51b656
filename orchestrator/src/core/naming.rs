//! Display filename derivation
//!
//! Turns an arbitrary tool-reported title into a filename that is safe both
//! on disk and inside a quoted `Content-Disposition` header.

/// Stem used when the title is missing or sanitizes to nothing
pub const DEFAULT_STEM: &str = "video";

/// Extension of every delivered file
pub const MEDIA_EXTENSION: &str = "mp4";

const MAX_STEM_CHARS: usize = 150;

/// Reduce `title` to ASCII letters, digits, `-`, `_` and `.`.
///
/// Whitespace runs become a single `_`, path separators count as
/// whitespace, and leading/trailing `.`/`_` are stripped. May return an
/// empty string.
pub fn sanitize_stem(title: &str) -> String {
    let spaced = title.replace(['/', '\\'], " ");
    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");

    let filtered: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        .collect();

    let trimmed = filtered.trim_matches(|c| c == '.' || c == '_');
    let bounded: String = trimmed.chars().take(MAX_STEM_CHARS).collect();
    bounded.trim_end_matches(|c| c == '.' || c == '_').to_string()
}

/// Filename presented to the client for a given title
pub fn display_name(title: Option<&str>) -> String {
    let stem = title.map(sanitize_stem).filter(|s| !s.is_empty());
    format!("{}.{}", stem.as_deref().unwrap_or(DEFAULT_STEM), MEDIA_EXTENSION)
}
