//! Label normalization
//!
//! Classification always runs on `normalize`d text. Project details are cut
//! from a separate, case-preserving copy of the label with
//! `strip_prefix_suffix`, so the two never influence each other.

use crate::models::Cell;

/// Separators clerks typed between a classifying token and the details
const SEPARATORS: &[char] = &['/', '-', '+', ':', ','];

/// Trimmed, lowercased label; empty for blank input
pub fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

pub fn normalize_cell(cell: &Cell) -> String {
    normalize(&cell.text())
}

/// Strip `prefix` from the start of `text`, ignoring case
fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let mut chars = text.char_indices();
    for expected in prefix.chars() {
        let (_, actual) = chars.next()?;
        if !actual.to_lowercase().eq(expected.to_lowercase()) {
            return None;
        }
    }
    match chars.next() {
        Some((end, _)) => Some(&text[end..]),
        None => Some(""),
    }
}

/// Strip `suffix` from the end of `text`, ignoring case
fn strip_suffix_ignore_case<'a>(text: &'a str, suffix: &str) -> Option<&'a str> {
    let mut chars = text.char_indices().rev();
    let mut start = text.len();
    for expected in suffix.chars().rev() {
        let (index, actual) = chars.next()?;
        if !actual.to_lowercase().eq(expected.to_lowercase()) {
            return None;
        }
        start = index;
    }
    Some(&text[..start])
}

fn trim_separators_start(text: &str) -> &str {
    let text = text.trim_start();
    match text.strip_prefix(SEPARATORS) {
        Some(rest) => rest.trim_start(),
        None => text,
    }
}

fn trim_separators_end(text: &str) -> &str {
    let text = text.trim_end();
    match text.strip_suffix(SEPARATORS) {
        Some(rest) => rest.trim_end(),
        None => text,
    }
}

/// Remove the classifying token(s) from a label and keep the rest
///
/// Prefixes and suffixes are tried in the order given and matched without
/// regard to case. After a token is removed, one separator (`/`, `-`, `+`,
/// `:` or `,`) next to it is removed as well. Stripping repeats until no
/// token matches, so applying it twice gives the same result as once.
pub fn strip_prefix_suffix(text: &str, prefixes: &[&str], suffixes: &[&str]) -> String {
    let mut rest = text.trim();

    'prefixes: loop {
        for prefix in prefixes {
            if prefix.is_empty() {
                continue;
            }
            if let Some(stripped) = strip_prefix_ignore_case(rest, prefix) {
                rest = trim_separators_start(stripped);
                continue 'prefixes;
            }
        }
        break;
    }

    'suffixes: loop {
        for suffix in suffixes {
            if suffix.is_empty() {
                continue;
            }
            if let Some(stripped) = strip_suffix_ignore_case(rest, suffix) {
                rest = trim_separators_end(stripped);
                continue 'suffixes;
            }
        }
        break;
    }

    rest.trim().to_string()
}
