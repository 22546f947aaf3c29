//! UTF-8–safe string helpers for log previews.
//!
//! Transcript fragments are logged as short previews only. Rust `&str[..n]`
//! panics when `n` falls inside a multi-byte character, so truncation walks
//! back to the nearest char boundary.

/// Default preview length (bytes) for transcript text in log fields.
pub const PREVIEW_BYTES: usize = 80;

/// Truncate a string to at most `max_bytes` bytes at a char boundary.
#[inline]
pub fn truncate_str(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Truncate `s` and append `suffix` if the original exceeds `max_bytes`.
///
/// The returned string is at most `max_bytes` bytes long (including the suffix).
pub fn truncate_with_suffix(s: &str, max_bytes: usize, suffix: &str) -> String {
    if s.len() <= max_bytes {
        return s.to_owned();
    }
    let body_budget = max_bytes.saturating_sub(suffix.len());
    let prefix = truncate_str(s, body_budget);
    format!("{prefix}{suffix}")
}

/// Preview of transcript text for structured log fields.
pub fn preview(s: &str) -> String {
    truncate_with_suffix(s.trim(), PREVIEW_BYTES, "...")
}
