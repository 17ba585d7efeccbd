//! Markup stripping with an allow-nothing policy.
//!
//! Every tag and attribute is removed and only text survives. Elements whose content is not
//! text (`script`, `style`, ...) are dropped together with their content. A `<` that cannot
//! start a tag (`a < b`) is kept as text.

/// Elements removed along with everything up to their closing tag.
const NON_TEXT_ELEMENTS: &[&str] = &["script", "style", "textarea", "option", "noscript"];

/// Strips all markup from `input`, returning plain text.
///
/// # Examples
///
/// ```
/// use gigconnect::sanitize::strip_markup;
///
/// assert_eq!(strip_markup("<b>Jo</b> Smith"), "Jo Smith");
/// assert_eq!(strip_markup(r#"<a href="x" title="a>b">link</a>"#), "link");
/// assert_eq!(strip_markup("hi<script>alert(1)</script>!"), "hi!");
/// assert_eq!(strip_markup("1 < 2"), "1 < 2");
/// ```
pub fn strip_markup(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let len = chars.len();
    let mut result = String::with_capacity(input.len());
    let mut i = 0;

    while i < len {
        if chars[i] != '<' || !starts_markup(chars.get(i + 1).copied()) {
            result.push(chars[i]);
            i += 1;
            continue;
        }

        if chars[i + 1..].starts_with(&['!', '-', '-']) {
            i = skip_comment(&chars, i + 4);
            continue;
        }

        let (tag_name, closing, next) = read_tag(&chars, i + 1);
        i = next;

        if !closing && NON_TEXT_ELEMENTS.contains(&tag_name.as_str()) {
            i = skip_element_content(&chars, i, &tag_name);
        }
    }

    result
}

fn starts_markup(next: Option<char>) -> bool {
    matches!(next, Some(c) if c.is_ascii_alphabetic() || c == '/' || c == '!' || c == '?')
}

/// Skips past `-->`, or to the end of input for an unclosed comment.
fn skip_comment(chars: &[char], mut i: usize) -> usize {
    while i + 2 < chars.len() {
        if chars[i] == '-' && chars[i + 1] == '-' && chars[i + 2] == '>' {
            return i + 3;
        }
        i += 1;
    }
    chars.len()
}

/// Reads a tag starting after its `<`. Returns the lowercase tag name, whether it is a closing
/// tag, and the index just past the tag's `>` (quoted attribute values may contain `>`).
fn read_tag(chars: &[char], mut i: usize) -> (String, bool, usize) {
    let closing = chars.get(i) == Some(&'/');
    if closing {
        i += 1;
    }

    let mut name = String::new();
    while let Some(&c) = chars.get(i) {
        if c.is_ascii_alphanumeric() || c == '-' {
            name.push(c.to_ascii_lowercase());
            i += 1;
        } else {
            break;
        }
    }

    let mut in_single_quote = false;
    let mut in_double_quote = false;
    while let Some(&c) = chars.get(i) {
        i += 1;
        match c {
            '"' if !in_single_quote => in_double_quote = !in_double_quote,
            '\'' if !in_double_quote => in_single_quote = !in_single_quote,
            '>' if !in_single_quote && !in_double_quote => break,
            _ => {}
        }
    }

    (name, closing, i)
}

/// Skips to just past `</tag_name ...>`, or to the end of input.
fn skip_element_content(chars: &[char], mut i: usize, tag_name: &str) -> usize {
    while i < chars.len() {
        if chars[i] == '<' && chars.get(i + 1) == Some(&'/') {
            let (name, _, next) = read_tag(chars, i + 1);
            if name == tag_name {
                return next;
            }
        }
        i += 1;
    }
    chars.len()
}
