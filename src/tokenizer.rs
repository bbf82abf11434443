use once_cell::sync::Lazy;
use regex::Regex;

/// Ordered, lowercase word tokens
pub type TokenList = Vec<String>;

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w+\b").unwrap());

/// Split recognized text into lowercase word tokens.
///
/// A token is a maximal run of word characters (letters, digits and
/// underscore). Single-character tokens are dropped as OCR noise. Order of
/// appearance is kept and duplicates are not removed.
pub fn tokenize(text: &str) -> TokenList {
    let lowered = text.to_lowercase();
    WORD.find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|token| token.chars().count() > 1)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_punctuation_and_lowercases() {
        assert_eq!(tokenize("Hello, World! 123"), vec!["hello", "world", "123"]);
    }

    #[test]
    fn test_drops_single_characters() {
        assert_eq!(tokenize("a b cc"), vec!["cc"]);
    }

    #[test]
    fn test_keeps_duplicates_in_order() {
        assert_eq!(
            tokenize("the cat and THE dog"),
            vec!["the", "cat", "and", "the", "dog"]
        );
    }

    #[test]
    fn test_underscore_is_a_word_character() {
        assert_eq!(tokenize("snake_case-word"), vec!["snake_case", "word"]);
    }

    #[test]
    fn test_unicode_letters() {
        // Length counts characters, not bytes
        assert_eq!(tokenize("Über é ÄÖ"), vec!["über", "äö"]);
    }

    #[test]
    fn test_empty_and_whitespace_only() {
        assert!(tokenize("").is_empty());
        assert!(tokenize(" \n\t ").is_empty());
        assert!(tokenize("- , . !").is_empty());
    }

    #[test]
    fn test_multiline_ocr_output() {
        let text = "INVOICE #42\nTotal: $19.99\n\x0c";
        assert_eq!(tokenize(text), vec!["invoice", "42", "total", "19", "99"]);
    }
}
