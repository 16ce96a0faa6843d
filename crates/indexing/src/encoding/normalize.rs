//! String normalization for matching.

use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

/// Normalize a string value for case- and accent-insensitive matching.
///
/// Lowercases, decomposes (NFKD), removes combining marks, and keeps only
/// alphanumeric characters, so punctuation and whitespace never affect a match.
pub fn normalize_string(input: &str) -> String {
    input
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(|c| c.to_lowercase())
        .filter(|c| c.is_alphanumeric())
        .collect()
}

/// Case-fold a URI-like value while keeping its punctuation.
pub fn casefold(input: &str) -> String {
    input
        .trim()
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(|c| c.to_lowercase())
        .collect()
}
