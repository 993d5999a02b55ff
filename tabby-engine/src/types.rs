//! Core data types for the tabby engine

use crate::error::{TabbyError, TabbyResult};
use crate::headers::parse_header_entries;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// HTTP methods the request loop can issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered HTTP header list.
///
/// Names compare case-insensitively; setting an existing name replaces its
/// value in place so declaration order is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpHeaders {
    pub entries: Vec<(String, String)>,
}

impl HttpHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a header
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();

        match self
            .entries
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(&name))
        {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Get a header value
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, String)> for HttpHeaders {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut headers = HttpHeaders::new();
        for (name, value) in iter {
            headers.set(name, value);
        }
        headers
    }
}

/// Outbound HTTP request handed to the transport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpRequestData {
    pub method: HttpMethod,
    pub url: String,
    pub headers: HttpHeaders,
    pub body: Option<Vec<u8>>,
}

impl HttpRequestData {
    /// Create a new HTTP request
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HttpHeaders::new(),
            body: None,
        }
    }

    /// Add or update a header
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.set(name, value);
    }

    /// Get a header value
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// Set request body from string
    pub fn set_body_string(&mut self, body: String) {
        self.body = Some(body.into_bytes());
    }

    /// Get request body as string, lossily decoded
    pub fn body_as_string(&self) -> Option<String> {
        self.body
            .as_ref()
            .map(|body| String::from_utf8_lossy(body).into_owned())
    }
}

/// Response returned by the transport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpResponseData {
    pub status_code: u16,
    /// Full status line, e.g. `200 OK`
    pub status_line: String,
    pub headers: HttpHeaders,
    pub body: Vec<u8>,
}

impl HttpResponseData {
    pub fn new(status_code: u16, status_line: impl Into<String>) -> Self {
        Self {
            status_code,
            status_line: status_line.into(),
            headers: HttpHeaders::new(),
            body: Vec::new(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.set(name, value);
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// `Content-Type` header value, empty when absent
    pub fn content_type(&self) -> &str {
        self.headers.get("Content-Type").unwrap_or("")
    }

    /// Get response body length
    pub fn body_length(&self) -> usize {
        self.body.len()
    }
}

/// Where the request body comes from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodySource {
    None,
    /// Inline data, may contain placeholders
    Literal(String),
    /// Template file read and rendered on every iteration
    TemplateFile(PathBuf),
}

/// How many iterations a run may execute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IterationBudget {
    Single,
    Finite(u64),
    Unbounded,
}

impl IterationBudget {
    /// True once `completed` iterations use up the budget
    pub fn is_exhausted(&self, completed: u64) -> bool {
        match self {
            IterationBudget::Single => completed >= 1,
            IterationBudget::Finite(count) => completed >= *count,
            IterationBudget::Unbounded => false,
        }
    }
}

/// Immutable configuration for one run of the request loop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoopConfig {
    pub url: String,
    pub method: HttpMethod,
    pub content_type: String,
    pub headers: Vec<(String, String)>,
    pub body_source: BodySource,
    pub loop_enabled: bool,
    /// Iterations in loop mode; zero or negative means run until stopped
    pub count: i64,
    pub interval: Duration,
}

impl LoopConfig {
    pub const DEFAULT_CONTENT_TYPE: &'static str = "application/json";
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

    /// Create a single-shot configuration
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method,
            content_type: Self::DEFAULT_CONTENT_TYPE.to_string(),
            headers: Vec::new(),
            body_source: BodySource::None,
            loop_enabled: false,
            count: 0,
            interval: Self::DEFAULT_INTERVAL,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// Append raw `Name: Value` entries; malformed entries are dropped
    pub fn with_header_entries<I, S>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.headers.extend(parse_header_entries(entries));
        self
    }

    pub fn with_body(mut self, body_source: BodySource) -> Self {
        self.body_source = body_source;
        self
    }

    /// Enable loop mode with the given count and interval
    pub fn looped(mut self, count: i64, interval: Duration) -> Self {
        self.loop_enabled = true;
        self.count = count;
        self.interval = interval;
        self
    }

    pub fn iteration_budget(&self) -> IterationBudget {
        match (self.loop_enabled, self.count) {
            (false, _) => IterationBudget::Single,
            (true, count) if count > 0 => IterationBudget::Finite(count as u64),
            (true, _) => IterationBudget::Unbounded,
        }
    }

    /// Reject configurations the loop cannot run
    pub fn validate(&self) -> TabbyResult<()> {
        let url = self.url.trim();
        if url.is_empty() {
            return Err(TabbyError::configuration("url", "URL cannot be empty"));
        }

        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(TabbyError::configuration(
                "url",
                "URL must start with http:// or https://",
            ));
        }

        url::Url::parse(url)
            .map_err(|e| TabbyError::configuration("url", &format!("invalid URL: {}", e)))?;

        if self.method == HttpMethod::Get && self.body_source != BodySource::None {
            return Err(TabbyError::configuration(
                "body",
                "GET requests cannot carry a body",
            ));
        }

        Ok(())
    }
}

/// Successful iteration, discarded after it is reported.
///
/// Failed iterations never produce one; their error goes straight to
/// [`crate::Reporter::report_failure`] or aborts the run.
#[derive(Debug, Clone)]
pub struct IterationResult {
    /// 1-based request number
    pub index: u64,
    pub timestamp: chrono::DateTime<chrono::Local>,
    pub duration: Duration,
    pub response: HttpResponseData,
}

impl IterationResult {
    pub fn success(index: u64, duration: Duration, response: HttpResponseData) -> Self {
        Self {
            index,
            timestamp: chrono::Local::now(),
            duration,
            response,
        }
    }
}

/// Totals for a finished run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Requests attempted, failed ones included
    pub requests_sent: u64,
    /// False when the run was stopped externally
    pub completed: bool,
}
