//! HTTP client adapter.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use super::AdapterError;

/// An outbound HTTP request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// HTTP method (GET, POST, ...).
    pub method: String,
    /// Target URL, already substituted.
    pub url: String,
    /// Request headers.
    pub headers: BTreeMap<String, String>,
    /// JSON body, if any.
    pub body: Option<Value>,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl HttpRequest {
    /// Create a GET request with the default 15 s timeout.
    #[must_use]
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: "GET".into(),
            url: url.into(),
            headers: BTreeMap::new(),
            body: None,
            timeout: Duration::from_secs(15),
        }
    }
}

/// An HTTP response as seen by handlers.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// Status code.
    pub status: u16,
    /// Response headers.
    pub headers: BTreeMap<String, String>,
    /// Response body: JSON when the payload parses, a string otherwise.
    pub body: Value,
}

impl HttpResponse {
    /// Whether the status is in the 2xx range.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Outbound HTTP, as consumed by the `Action` handler.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Perform a request.
    ///
    /// Transport failures (connect, timeout, invalid URL) are adapter
    /// errors; a served non-2xx response is returned as a response and
    /// left to the caller's policy.
    async fn request(&self, request: HttpRequest) -> Result<HttpResponse, AdapterError>;
}

/// The reqwest-backed HTTP client.
#[derive(Debug, Clone, Default)]
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    /// Create a client with reqwest defaults; per-request timeouts come
    /// from each [`HttpRequest`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn request(&self, request: HttpRequest) -> Result<HttpResponse, AdapterError> {
        let method: reqwest::Method = request
            .method
            .to_uppercase()
            .parse()
            .map_err(|_| AdapterError::new(format!("invalid HTTP method `{}`", request.method)))?;

        let mut builder = self
            .client
            .request(method, &request.url)
            .timeout(request.timeout);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|err| AdapterError::new(format!("http request failed: {err}")))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_owned(), v.to_owned()))
            })
            .collect();

        let text = response
            .text()
            .await
            .map_err(|err| AdapterError::new(format!("http body read failed: {err}")))?;
        let body = serde_json::from_str(&text).unwrap_or(Value::String(text));

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
