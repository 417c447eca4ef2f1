use std::sync::LazyLock;

use regex::Regex;

// "A." / "b.Paris" / "1. Mercury" / "1.Mercury"
static ENUMERATION_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z0-9])\.(\s*)").expect("enumeration prefix pattern is valid")
});

/// Strips one leading list marker such as `A.` or `1.` from `text`.
///
/// A digit marker directly followed by another digit is a decimal, not a
/// marker, so `1.5` is left alone.
pub fn strip_prefix(text: &str) -> &str {
    let text = text.trim_start();
    let Some(captures) = ENUMERATION_PREFIX.captures(text) else {
        return text;
    };
    let (Some(marker), Some(gap)) = (captures.get(1), captures.get(2)) else {
        return text;
    };
    let rest = &text[gap.end()..];
    let decimal = marker.as_str().starts_with(|c: char| c.is_ascii_digit())
        && gap.is_empty()
        && rest.starts_with(|c: char| c.is_ascii_digit());
    if decimal { text } else { rest }
}

/// Canonical form used for every answer comparison.
pub fn normalize_answer(text: &str) -> String {
    strip_prefix(text).trim().to_lowercase()
}

pub fn answers_match(left: &str, right: &str) -> bool {
    normalize_answer(left) == normalize_answer(right)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_letter_and_digit_markers() {
        assert_eq!(normalize_answer("A. Au"), "au");
        assert_eq!(normalize_answer("b.Paris"), "paris");
        assert_eq!(normalize_answer("  3.  Jupiter "), "jupiter");
    }

    #[test]
    fn strips_digit_marker_without_space() {
        assert_eq!(normalize_answer("1.Mercury"), "mercury");
        assert_eq!(normalize_answer("2."), "");
        assert_eq!(normalize_answer("1. 5"), "5");
        assert!(answers_match("1.Mercury", "Mercury"));
    }

    #[test]
    fn keeps_decimal_numbers_intact() {
        assert_eq!(normalize_answer("1.5"), "1.5");
        assert_eq!(normalize_answer("3.14"), "3.14");
        assert!(!answers_match("1.5", "2.5"));
    }

    #[test]
    fn only_first_marker_is_removed() {
        assert_eq!(normalize_answer("a. b. c"), "b. c");
    }

    #[test]
    fn comparison_ignores_case_and_padding() {
        assert!(answers_match("Photosynthesis ", "C. photosynthesis"));
        assert!(!answers_match("Respiration", "Photosynthesis"));
    }
}
