//! Parsing of user supplied `Name: Value` header entries.
//!
//! Header strings are free-form input, so entries that cannot be split or
//! would not survive on the wire are dropped instead of reported.

use tracing::trace;

/// RFC 9110 `tchar`
fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "!#$%&'*+-.^_`|~".contains(c)
}

/// Visible characters, space and tab; no other control characters
fn is_field_value_char(c: char) -> bool {
    c == '\t' || !c.is_control()
}

/// Split a `Name: Value` entry on its first `:`; both sides are trimmed.
///
/// The name must be a non-empty HTTP token and the value must not contain
/// control characters.
pub fn parse_header_entry(entry: &str) -> Option<(String, String)> {
    let (name, value) = entry.split_once(':')?;
    let name = name.trim();
    if name.is_empty() || !name.chars().all(is_token_char) {
        return None;
    }
    let value = value.trim();
    if !value.chars().all(is_field_value_char) {
        return None;
    }
    Some((name.to_string(), value.to_string()))
}

/// Parse entries in declaration order, skipping malformed ones
pub fn parse_header_entries<I, S>(entries: I) -> Vec<(String, String)>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    entries
        .into_iter()
        .filter_map(|entry| {
            let entry = entry.as_ref();
            let parsed = parse_header_entry(entry);
            if parsed.is_none() {
                trace!(entry, "Skipping malformed header entry");
            }
            parsed
        })
        .collect()
}
