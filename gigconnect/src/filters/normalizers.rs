//! Normalizers for free-text search terms.

/// Characters with special meaning in a regular expression.
const REGEX_METACHARACTERS: &[char] = &['.', '*', '+', '?', '^', '$', '{', '}', '(', ')', '|', '[', ']', '\\'];

/// Trims a raw search term; blank terms count as absent.
pub fn normalize_term(term: Option<&str>) -> Option<&str> {
    term.map(str::trim).filter(|t| !t.is_empty())
}

/// Escapes regex metacharacters so the text only ever matches literally.
///
/// # Examples
///
/// ```
/// use gigconnect::filters::escape_regex;
///
/// assert_eq!(escape_regex("austin"), "austin");
/// assert_eq!(escape_regex("a.b"), "a\\.b");
/// assert_eq!(escape_regex("(c++)"), "\\(c\\+\\+\\)");
/// assert_eq!(escape_regex("$5 [off]"), "\\$5 \\[off\\]");
/// ```
pub fn escape_regex(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if REGEX_METACHARACTERS.contains(&ch) {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Pattern matching exactly `text`, ignoring whitespace around the stored value.
pub fn exact_pattern(text: &str) -> String {
    format!("^\\s*{}\\s*$", escape_regex(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_terms_are_absent() {
        assert_eq!(normalize_term(None), None);
        assert_eq!(normalize_term(Some("")), None);
        assert_eq!(normalize_term(Some("   \t")), None);
        assert_eq!(normalize_term(Some("  paint ")), Some("paint"));
    }

    #[test]
    fn escapes_every_metacharacter() {
        assert_eq!(
            escape_regex(".*+?^${}()|[]\\"),
            "\\.\\*\\+\\?\\^\\$\\{\\}\\(\\)\\|\\[\\]\\\\"
        );
    }

    #[test]
    fn leaves_other_punctuation_alone() {
        assert_eq!(escape_regex("st-louis, mo/us #1"), "st-louis, mo/us #1");
    }

    #[test]
    fn exact_pattern_anchors_and_allows_surrounding_whitespace() {
        assert_eq!(exact_pattern("new york"), "^\\s*new york\\s*$");
        assert_eq!(exact_pattern("a.b"), "^\\s*a\\.b\\s*$");
    }
}
