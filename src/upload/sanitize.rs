//! Filename sanitizing for scratch storage
//!
//! Client file names end up inside scratch paths, so they are reduced to a
//! safe ASCII subset with no path components before use.

/// Name used when nothing of the original name survives sanitizing
const FALLBACK_NAME: &str = "upload";

/// Reduce a client-supplied file name to a safe single path component.
///
/// - path separators become whitespace
/// - whitespace runs become a single `_`
/// - anything outside `[A-Za-z0-9_.-]` is dropped
/// - leading and trailing `.` / `_` are stripped
pub fn secure_filename(filename: &str) -> String {
    let spaced = filename.replace(['/', '\\'], " ");
    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");

    let kept: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();

    let trimmed = kept.trim_matches(|c| c == '.' || c == '_');
    if trimmed.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}
