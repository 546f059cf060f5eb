// ============================================================
// HEADER NORMALIZER
// ============================================================
// Clean display labels from raw survey column headers

use once_cell::sync::Lazy;
use regex::Regex;

static BRACKET_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[(.*?)\]").unwrap());

/// Turn a raw survey header into a display label.
///
/// Grouped-question exports put the actual item in brackets
/// (`Teiginiai [Klasė yra tvarkinga]`); otherwise the instructional
/// `preamble` is removed from the start of the header.
pub fn normalize_header(raw: &str, preamble: &str) -> String {
    if let Some(inner) = BRACKET_PATTERN
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|inner| !inner.is_empty())
    {
        return inner.trim().to_string();
    }

    strip_prefix_ignore_case(raw, preamble)
        .unwrap_or(raw)
        .trim()
        .to_string()
}

fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    if prefix.is_empty() {
        return None;
    }

    let mut text_chars = text.char_indices();
    for expected in prefix.chars() {
        let (_, actual) = text_chars.next()?;
        if !actual.to_lowercase().eq(expected.to_lowercase()) {
            return None;
        }
    }

    let offset = text_chars.next().map(|(idx, _)| idx).unwrap_or(text.len());
    Some(&text[offset..])
}
