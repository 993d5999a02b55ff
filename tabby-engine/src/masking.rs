//! Sensitive header masking for log output.
//!
//! Only log lines are masked; reports shown to the user carry the real values.

use crate::types::HttpHeaders;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Configuration for sensitive header masking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaskingConfig {
    /// Headers that should be masked (lowercase, compared case-insensitively)
    pub sensitive_headers: HashSet<String>,

    /// Replacement string for masked values
    pub mask_replacement: String,

    /// Whether to show the ends of long values
    pub partial_masking: bool,

    /// Number of characters kept at each end when partial masking applies
    pub partial_show_chars: usize,

    pub masking_enabled: bool,
}

impl Default for MaskingConfig {
    fn default() -> Self {
        let sensitive_headers = [
            "authorization",
            "proxy-authorization",
            "authentication",
            "cookie",
            "set-cookie",
            "x-auth-token",
            "x-api-key",
            "x-csrf-token",
            "x-xsrf-token",
        ]
        .into_iter()
        .map(str::to_string)
        .collect();

        Self {
            sensitive_headers,
            mask_replacement: "***MASKED***".to_string(),
            partial_masking: true,
            partial_show_chars: 4,
            masking_enabled: true,
        }
    }
}

impl MaskingConfig {
    pub fn is_sensitive_header(&self, name: &str) -> bool {
        self.sensitive_headers.contains(&name.to_ascii_lowercase())
    }

    /// Mask a single value
    pub fn mask_value(&self, value: &str) -> String {
        if value.is_empty() {
            return String::new();
        }

        let chars: Vec<char> = value.chars().collect();
        let show = self.partial_show_chars;
        if self.partial_masking && chars.len() > show * 2 {
            let prefix: String = chars[..show].iter().collect();
            let suffix: String = chars[chars.len() - show..].iter().collect();
            format!("{}***{}", prefix, suffix)
        } else {
            self.mask_replacement.clone()
        }
    }

    /// Render headers as `Name: value` pairs with sensitive values masked
    pub fn mask_headers(&self, headers: &HttpHeaders) -> String {
        headers
            .iter()
            .map(|(name, value)| {
                if self.masking_enabled && self.is_sensitive_header(name) {
                    format!("{}: {}", name, self.mask_value(value))
                } else {
                    format!("{}: {}", name, value)
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}
