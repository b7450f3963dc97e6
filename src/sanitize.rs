//! Outcome label sanitization.
//!
//! Error messages have unbounded cardinality; metric backends do not.
//! [`sanitize`] turns an arbitrary message into a short `[a-z0-9_]` slug
//! that is safe to use as a label value. Messages that lead with a stable,
//! low-cardinality prefix ("bad request: ...", "quota exceeded: ...") make
//! the best slugs.

/// Whether a character may appear in a label value unchanged.
///
/// Only ASCII word characters qualify; everything else, non-ASCII letters
/// included, is replaced.
fn is_label_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Derive a bounded, low-cardinality label value from `text`.
///
/// Lowercases, replaces each character outside `[A-Za-z0-9_]` with a single
/// `_` (adjacent illegal characters are not collapsed), and keeps at most
/// `max_len` characters. Empty input or `max_len == 0` yields `""`.
pub fn sanitize(text: &str, max_len: u8) -> String {
    if text.is_empty() || max_len == 0 {
        return String::new();
    }
    text.chars()
        .take(usize::from(max_len))
        .map(|c| {
            if is_label_char(c) {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}
