//! Character-based token estimation.
//!
//! This is an approximation, not a tokenizer: one token is counted for
//! every four characters of text.

use std::borrow::Cow;

/// Average number of characters per token.
pub const CHARS_PER_TOKEN: u64 = 4;

/// Estimate the token count of a piece of text.
///
/// Counts characters (not bytes), so multi-byte text is not inflated.
pub fn estimate_tokens(text: &str) -> u64 {
    estimate_tokens_from_len(text.chars().count() as u64)
}

/// Estimate tokens from a length when only the length is known.
pub fn estimate_tokens_from_len(len: u64) -> u64 {
    len / CHARS_PER_TOKEN
}

/// Convert `\r\n` and lone `\r` line endings to `\n`.
///
/// Text is measured after this, so a CRLF file estimates the same as its
/// LF copy.
pub fn normalize_newlines(text: &str) -> Cow<'_, str> {
    if !text.contains('\r') {
        return Cow::Borrowed(text);
    }
    Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
}

/// Estimate tokens of file content after line-ending normalisation.
pub fn estimate_text_tokens(text: &str) -> u64 {
    estimate_tokens(&normalize_newlines(text))
}
