//! Small text helpers shared across the pipeline.

/// Count whitespace-delimited non-empty tokens.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Longest prefix of `text` containing at most `max_chars` characters,
/// sliced on a char boundary.
pub fn char_prefix(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
