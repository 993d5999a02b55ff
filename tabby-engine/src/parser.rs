//! Placeholder parsing for body templates
//!
//! Placeholders are written `{{type}}` or `{{type:param:param}}`. Scanning is
//! left to right and non-overlapping; delimiters do not nest. Parsing never
//! fails: a placeholder whose type is unknown is resolved (or not) later by
//! the generator registry.

use regex::{CaptureMatches, Regex};
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::sync::OnceLock;

const PLACEHOLDER_PATTERN: &str = r"\{\{([^}]+)\}\}";

fn placeholder_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(PLACEHOLDER_PATTERN).expect("placeholder pattern is valid"))
}

/// A parsed placeholder: type name plus ordered parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placeholder {
    pub type_name: String,
    pub params: Vec<String>,
}

impl Placeholder {
    /// Parse the text between `{{` and `}}`.
    ///
    /// The inner text is trimmed before splitting on `:`. The type name is
    /// trimmed again; parameters are kept exactly as written.
    pub fn from_inner(inner: &str) -> Self {
        let inner = inner.trim_start_matches('{').trim();
        let mut parts = inner.split(':');
        let type_name = parts.next().unwrap_or_default().trim().to_string();
        let params = parts.map(str::to_string).collect();

        Self { type_name, params }
    }
}

/// One placeholder occurrence within a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderMatch<'t> {
    /// Byte span of the full `{{...}}` token
    pub span: Range<usize>,
    /// The full token text as written
    pub raw: &'t str,
    pub placeholder: Placeholder,
}

/// Lazy iterator over placeholder occurrences
pub struct PlaceholderMatches<'t> {
    captures: CaptureMatches<'static, 't>,
}

impl<'t> Iterator for PlaceholderMatches<'t> {
    type Item = PlaceholderMatch<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        let captures = self.captures.next()?;
        let full = captures.get(0)?;
        let inner = captures.get(1).map(|m| m.as_str()).unwrap_or_default();

        Some(PlaceholderMatch {
            span: full.range(),
            raw: full.as_str(),
            placeholder: Placeholder::from_inner(inner),
        })
    }
}

/// Scanner for `{{...}}` placeholders
pub struct PlaceholderParser;

impl PlaceholderParser {
    /// Scan a template for placeholders
    pub fn parse(template: &str) -> PlaceholderMatches<'_> {
        PlaceholderMatches {
            captures: placeholder_regex().captures_iter(template),
        }
    }
}
