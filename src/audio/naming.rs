//! Filename normalization
//!
//! Two different normalizations are used across the pipeline:
//! - `sanitize_stem` produces the on-disk name written for the disc writer,
//!   which only accepts plain ASCII file names in a cue sheet.
//! - `match_key` produces the comparison key used to pair downloaded files
//!   with manifest entries.

use unicode_normalization::UnicodeNormalization;

/// Make a file stem safe for the disc writer
///
/// Applies NFKD compatibility decomposition, drops every non-ASCII code point
/// (so accented letters keep their base letter), removes double quotes and
/// trims surrounding whitespace.
pub fn sanitize_stem(stem: &str) -> String {
    stem.nfkd()
        .filter(|c| c.is_ascii() && *c != '"')
        .collect::<String>()
        .trim()
        .to_string()
}

/// Lowercased, alphanumeric-only key for fuzzy comparisons
pub fn match_key(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_keeps_plain_ascii() {
        assert_eq!(sanitize_stem("01 Artist - Title"), "01 Artist - Title");
    }

    #[test]
    fn test_sanitize_strips_accents() {
        assert_eq!(sanitize_stem("03 Beyoncé - Café"), "03 Beyonce - Cafe");
        assert_eq!(sanitize_stem("Motörhead - Ace"), "Motorhead - Ace");
    }

    #[test]
    fn test_sanitize_compatibility_forms() {
        // Full-width digits and ligatures decompose to ASCII
        assert_eq!(sanitize_stem("０１ ﬁve"), "01 five");
    }

    #[test]
    fn test_sanitize_drops_quotes_and_non_latin() {
        assert_eq!(sanitize_stem("04 A - \"Quoted\""), "04 A - Quoted");
        assert_eq!(sanitize_stem("05 坂本龍一 - Merry"), "05  - Merry");
    }

    #[test]
    fn test_sanitize_trims() {
        assert_eq!(sanitize_stem("  06 A - B  "), "06 A - B");
        assert_eq!(sanitize_stem("東京 "), "");
    }

    #[test]
    fn test_match_key() {
        assert_eq!(match_key("The Beatles"), "thebeatles");
        assert_eq!(match_key("AC/DC"), "acdc");
        assert_eq!(match_key("01 A - B"), "01ab");
        assert_eq!(match_key("Café"), "caf");
        assert_eq!(match_key(""), "");
    }
}
