//! Response formatting for iteration reports

use crate::types::{HttpResponseData, IterationResult};
use std::time::Duration;

/// Non-JSON bodies longer than this are cut in loop mode
pub const LOOP_BODY_LIMIT: usize = 200;

const TRUNCATION_MARKER: &str = "... (truncated)";

/// Whether a report belongs to a single request or a loop run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportMode {
    Single,
    Loop,
}

/// Formatted outcome of one successful iteration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IterationReport {
    pub index: u64,
    pub mode: ReportMode,
    /// `HH:MM:SS` local time the response arrived
    pub time: String,
    pub status_line: String,
    pub content_type: String,
    pub body: String,
    pub duration: Duration,
}

impl IterationReport {
    /// Build a report from a successful iteration
    pub fn from_result(result: &IterationResult, mode: ReportMode) -> Self {
        let response = &result.response;

        Self {
            index: result.index,
            mode,
            time: result.timestamp.format("%H:%M:%S").to_string(),
            status_line: response.status_line.clone(),
            content_type: response.content_type().to_string(),
            body: format_body(response, mode),
            duration: result.duration,
        }
    }

    /// Text shown to the user for this iteration
    pub fn render(&self) -> String {
        match self.mode {
            ReportMode::Loop => format!(
                "\n[Request #{}] {}\nStatus: {}\n{}",
                self.index, self.time, self.status_line, self.body
            ),
            ReportMode::Single => format!(
                "Status: {}\nContent-Type: {}\n\n{}",
                self.status_line, self.content_type, self.body
            ),
        }
    }
}

impl std::fmt::Display for IterationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}

/// Pretty-print `body` with two space indentation if it parses as JSON
pub fn pretty_json(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    serde_json::to_string_pretty(&value).ok()
}

/// Format a response body for display.
///
/// JSON content types are pretty-printed when the body parses. Other bodies
/// are shown raw, truncated in loop mode past [`LOOP_BODY_LIMIT`] bytes.
pub fn format_body(response: &HttpResponseData, mode: ReportMode) -> String {
    if response.content_type().contains("application/json") {
        if let Some(pretty) = pretty_json(&response.body) {
            return pretty;
        }
        return String::from_utf8_lossy(&response.body).into_owned();
    }

    if mode == ReportMode::Loop && response.body.len() > LOOP_BODY_LIMIT {
        return format!(
            "{}{}",
            String::from_utf8_lossy(&response.body[..LOOP_BODY_LIMIT]),
            TRUNCATION_MARKER
        );
    }

    String::from_utf8_lossy(&response.body).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn json_response(body: &str) -> HttpResponseData {
        HttpResponseData::new(200, "200 OK")
            .with_header("Content-Type", "application/json; charset=utf-8")
            .with_body(body)
    }

    #[test]
    fn test_pretty_prints_json() {
        let formatted = format_body(&json_response(r#"{"a":1}"#), ReportMode::Single);
        assert_eq!(formatted, "{\n  \"a\": 1\n}");
    }

    #[test]
    fn test_invalid_json_is_shown_raw_even_in_loop_mode() {
        let body = format!("{{not json {}", "x".repeat(300));
        let formatted = format_body(&json_response(&body), ReportMode::Loop);
        assert_eq!(formatted, body);
    }

    #[test]
    fn test_loop_mode_truncates_long_text() {
        let response = HttpResponseData::new(200, "200 OK")
            .with_header("Content-Type", "text/html")
            .with_body("a".repeat(250));

        let looped = format_body(&response, ReportMode::Loop);
        assert_eq!(looped, format!("{}... (truncated)", "a".repeat(200)));

        let single = format_body(&response, ReportMode::Single);
        assert_eq!(single.len(), 250);
    }

    #[test]
    fn test_loop_mode_keeps_exactly_limit_bytes() {
        let response = HttpResponseData::new(200, "200 OK").with_body("b".repeat(200));
        assert_eq!(format_body(&response, ReportMode::Loop), "b".repeat(200));
    }

    #[test]
    fn test_single_report_layout() {
        let result = IterationResult::success(1, Duration::from_millis(5), json_response(r#"{"a":1}"#));
        let report = IterationReport::from_result(&result, ReportMode::Single);

        assert_eq!(
            report.render(),
            "Status: 200 OK\nContent-Type: application/json; charset=utf-8\n\n{\n  \"a\": 1\n}"
        );
    }

    #[test]
    fn test_loop_report_layout() {
        let response = HttpResponseData::new(404, "404 Not Found").with_body("missing");
        let result = IterationResult::success(7, Duration::ZERO, response);
        let report = IterationReport::from_result(&result, ReportMode::Loop);
        let text = report.render();

        assert!(text.starts_with("\n[Request #7] "));
        assert!(text.ends_with("\nStatus: 404 Not Found\nmissing"));
        assert_eq!(report.time.len(), 8);
    }
}
