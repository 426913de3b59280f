//! Text cleanup applied to every raw title and summary.

/// Collapse whitespace runs to single spaces, trim the ends, and drop
/// characters that carry no printable meaning (control characters, byte-order
/// marks, replacement characters left over from lossy decoding).
///
/// Idempotent: `clean_text(&clean_text(x)) == clean_text(x)`.
#[must_use]
pub fn clean_text(raw: &str) -> String {
    raw.split_whitespace()
        .map(|word| word.chars().filter(|&c| is_printable(c)).collect::<String>())
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// [`clean_text`] for optional input; absent text becomes an empty string.
#[must_use]
pub fn clean_opt(raw: Option<&str>) -> String {
    raw.map(clean_text).unwrap_or_default()
}

/// Strip HTML tags, leaving the text between them.
///
/// Tags are replaced by a space so adjacent block elements do not fuse words.
#[must_use]
pub fn strip_html(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => {
                in_tag = false;
                out.push(' ');
            }
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out
}

fn is_printable(c: char) -> bool {
    !c.is_control() && !matches!(c, '\u{FEFF}' | '\u{FFFD}' | '\u{200B}')
}
