//! reqwest backed transport for the request loop

use async_trait::async_trait;
use std::time::Duration;
use tabby_engine::{
    HttpMethod, HttpRequestData, HttpResponseData, TabbyError, TabbyResult, Transport,
};
use tracing::debug;

/// Settings for the HTTP client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub timeout: Duration,
    /// Accept invalid TLS certificates
    pub insecure: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            insecure: false,
        }
    }
}

/// Sends requests through a shared `reqwest::Client`
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    timeout: Duration,
}

impl ReqwestTransport {
    pub fn new(config: &ClientConfig) -> TabbyResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .danger_accept_invalid_certs(config.insecure)
            .build()
            .map_err(|e| TabbyError::configuration("http client", &e.to_string()))?;

        Ok(Self {
            client,
            timeout: config.timeout,
        })
    }

    fn map_send_error(&self, error: reqwest::Error) -> TabbyError {
        if error.is_timeout() {
            TabbyError::timeout("send request", self.timeout.as_millis() as u64)
        } else if error.is_builder() {
            TabbyError::configuration("request", &error.to_string())
        } else {
            TabbyError::transport(error)
        }
    }
}

/// Status line as `<code> <reason>`, e.g. `404 Not Found`
pub fn status_line(status: reqwest::StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {}", status.as_u16(), reason),
        None => status.as_u16().to_string(),
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequestData) -> TabbyResult<HttpResponseData> {
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
        };

        let mut builder = self.client.request(method, &request.url);
        for (name, value) in request.headers.iter() {
            builder = builder.header(name, value);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let resp = builder.send().await.map_err(|e| self.map_send_error(e))?;

        let status = resp.status();
        let mut response = HttpResponseData::new(status.as_u16(), status_line(status));
        for (name, value) in resp.headers() {
            // First value wins for repeated headers
            if response.headers.get(name.as_str()).is_none() {
                response
                    .headers
                    .set(name.as_str(), value.to_str().unwrap_or_default());
            }
        }

        let body = resp.bytes().await.map_err(|e| {
            if e.is_timeout() {
                TabbyError::timeout("read response", self.timeout.as_millis() as u64)
            } else {
                TabbyError::response_read(e)
            }
        })?;
        response.body = body.to_vec();

        debug!(
            status = response.status_code,
            body_bytes = response.body.len(),
            "HTTP exchange complete"
        );

        Ok(response)
    }
}
