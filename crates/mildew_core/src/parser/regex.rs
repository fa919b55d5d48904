//! Regular-expression literal helpers.
//!
//! The lexer hands a whole `/pattern/flags` lexeme to [`extract_regex`] and
//! validates the pieces with [`is_valid_regex`] before emitting a token.
//! Validation compiles the pattern once; the compiled program is discarded —
//! the interpreter compiles regexes again at run time.

use once_cell::sync::Lazy;
use regex::Regex;

/// Flag characters accepted after the closing `/` of a regex literal.
static VALID_FLAGS: Lazy<Vec<char>> = Lazy::new(|| "dgimsuvy".chars().collect());

/// Split a `/pattern/flags` lexeme into `(pattern, flags)`.
///
/// Returns two empty strings when the lexeme is not of that shape (missing
/// closing `/`).  The closing slash is the last `/` in the lexeme; flag
/// characters are alphabetic, so they can never hide a later slash.
pub fn extract_regex(slash_regex: &str) -> (String, String) {
    if !slash_regex.starts_with('/') {
        return (String::new(), String::new());
    }
    match slash_regex.rfind('/') {
        Some(0) | None => (String::new(), String::new()),
        Some(end) => (
            slash_regex[1..end].to_string(),
            slash_regex[end + 1..].to_string(),
        ),
    }
}

/// Returns `true` when `flags` contains only known, non-repeated flag
/// characters and `pattern` compiles.
pub fn is_valid_regex(pattern: &str, flags: &str) -> bool {
    let mut seen = Vec::new();
    for c in flags.chars() {
        if !VALID_FLAGS.contains(&c) || seen.contains(&c) {
            return false;
        }
        seen.push(c);
    }
    Regex::new(pattern).is_ok()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
