//! Text normalization and tokenization.
//!
//! A token is a maximal run of `[a-z0-9]` in the lowercased text. Every
//! other character, including non-ASCII letters, acts as a delimiter.

/// Lowercase the text with Unicode default case mapping.
///
/// The mapping is locale independent, so the same input always yields the
/// same tokens regardless of the host. It is not an ASCII-only fold: a few
/// non-ASCII letters lowercase into token characters, e.g. KELVIN SIGN
/// (U+212A) becomes `k` and U+0130 becomes `i` followed by a combining dot.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
}

/// Returns true for characters that may appear inside a token.
pub fn is_token_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit()
}

/// Split normalized text into tokens.
pub fn tokens(normalized: &str) -> impl Iterator<Item = &str> {
    normalized
        .split(|c: char| !is_token_char(c))
        .filter(|token| !token.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(text: &str) -> Vec<String> {
        tokens(&normalize(text)).map(String::from).collect()
    }

    #[test]
    fn test_unicode_lowercase_can_produce_ascii() {
        assert_eq!(collect("\u{212A}elvin"), vec!["kelvin"]);
        assert_eq!(collect("\u{0130}stanbul"), vec!["i", "stanbul"]);
        // Other uppercase non-ASCII letters stay non-ASCII and delimit.
        assert_eq!(collect("\u{00C9}t\u{00C9}"), vec!["t"]);
    }

    #[test]
    fn test_lowercases_and_splits() {
        assert_eq!(
            collect("The Quick  BROWN fox"),
            vec!["the", "quick", "brown", "fox"]
        );
    }

    #[test]
    fn test_every_non_alphanumeric_delimits() {
        assert_eq!(collect("a-a a_a a.a"), vec!["a", "a", "a", "a", "a", "a"]);
        assert_eq!(collect("don't"), vec!["don", "t"]);
        assert_eq!(collect("x1y2\tz3\n"), vec!["x1y2", "z3"]);
    }

    #[test]
    fn test_no_tokens_in_punctuation() {
        assert!(collect("!!!@@@###").is_empty());
        assert!(collect("").is_empty());
        assert!(collect("   \t\n").is_empty());
    }

    #[test]
    fn test_non_ascii_letters_are_delimiters() {
        assert_eq!(collect("café naïve"), vec!["caf", "na", "ve"]);
        assert_eq!(collect("日本語abc"), vec!["abc"]);
    }

    #[test]
    fn test_tokens_only_contain_token_chars() {
        let text = "Mixed\u{0}CASE\u{FFFD}bytes 42 and ÄÖÜ-über";
        for token in tokens(&normalize(text)) {
            assert!(!token.is_empty());
            assert!(token.chars().all(is_token_char), "bad token {token:?}");
        }
    }

    #[test]
    fn test_token_count_matches_runs() {
        assert_eq!(
            collect("the Quick brown fox jumps over THE lazy dog the fox").len(),
            10
        );
        assert_eq!(collect("!!!").len(), 0);
    }
}
