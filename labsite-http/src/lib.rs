//! Minimal HTTP GET client for page scraping with safe logging.
//!
//! - One request per call: no retries, no backoff, no caching
//! - Per-client timeout and identifying `User-Agent`
//! - Sensitive query params are redacted in every log line
//! - Optional *raw* response logging via `LABSITE_HTTP_RAW=1`
//!
//! Example (no_run):
//! ```no_run
//! # async fn demo() -> Result<(), labsite_http::HttpError> {
//! let client = labsite_http::HttpClient::new()?;
//! let html = client.get_text("https://example.com/paper").await?;
//! assert!(!html.is_empty());
//! # Ok(()) }
//! ```
//!
//! Observability: structured `tracing` events are emitted for request start,
//! response headers, body snippets (truncated), final errors, and optionally
//! the raw response (target `http.raw`).

use reqwest::header::USER_AGENT;
use reqwest::{Client, StatusCode, Url};
use std::env;
use std::time::{Duration, Instant};
use thiserror::Error;

const RAW_ENV: &str = "LABSITE_HTTP_RAW";
const RAW_MAX_BODY: usize = 64 * 1024;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub use labsite_common::DEFAULT_USER_AGENT;

fn raw_enabled() -> bool {
    matches!(
        env::var(RAW_ENV).as_deref(),
        Ok("1") | Ok("true") | Ok("yes")
    )
}

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("invalid URL: {0}")]
    Url(String),
    #[error("request build failed: {0}")]
    Build(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("server returned {status} for {url}")]
    Status { status: StatusCode, url: String },
}

#[derive(Clone, Debug)]
pub struct HttpClient {
    inner: Client,
    pub default_timeout: Duration,
    pub user_agent: String,
}

impl HttpClient {
    /// Construct a client with the default timeout and user agent.
    ///
    /// ```no_run
    /// use labsite_http::{HttpClient, HttpError};
    /// use std::time::Duration;
    ///
    /// let client = HttpClient::new()?;
    /// assert_eq!(client.default_timeout, Duration::from_secs(10));
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn new() -> Result<Self, HttpError> {
        let inner = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| HttpError::Build(e.to_string()))?;
        Ok(Self {
            inner,
            default_timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        })
    }

    pub fn with_timeout(mut self, dur: Duration) -> Self {
        self.default_timeout = dur;
        self
    }

    pub fn with_user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = ua.into();
        self
    }

    /// GET `url` and return the decoded body. Non-2xx statuses are errors.
    pub async fn get_text(&self, url: &str) -> Result<String, HttpError> {
        let url = Url::parse(url).map_err(|e| HttpError::Url(e.to_string()))?;
        let (host_path, redacted_q) = redact_query(&url);
        let req_id = next_request_id();

        tracing::debug!(
            req_id=%req_id,
            method="GET",
            host_path=%host_path,
            query=?redacted_q,
            timeout_ms=self.default_timeout.as_millis() as u64,
            "http.request.start"
        );

        let t0 = Instant::now();
        let resp = self
            .inner
            .get(url.clone())
            .timeout(self.default_timeout)
            .header(USER_AGENT, self.user_agent.as_str())
            .send()
            .await
            .map_err(|err| {
                tracing::warn!(req_id=%req_id, host_path=%host_path, message=%err, "http.network_error.send");
                HttpError::Network(err.to_string())
            })?;

        let status = resp.status();
        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-")
            .to_string();

        let body = resp.text().await.map_err(|err| {
            tracing::warn!(req_id=%req_id, host_path=%host_path, message=%err, "http.network_error.body");
            HttpError::Network(err.to_string())
        })?;

        tracing::debug!(
            req_id=%req_id,
            %status,
            duration_ms=t0.elapsed().as_millis() as u64,
            body_len=body.len(),
            content_type=%content_type,
            "http.response.headers"
        );

        if raw_enabled() {
            let mut text = body.clone();
            let truncated = text.len() > RAW_MAX_BODY;
            if truncated {
                truncate_on_char_boundary(&mut text, RAW_MAX_BODY);
            }
            tracing::info!(target: "http.raw", %req_id, %status, body=%text, truncated);
        }

        if !status.is_success() {
            tracing::warn!(
                req_id=%req_id,
                %status,
                host_path=%host_path,
                body_snippet=%snip_body(&body),
                "http.error"
            );
            return Err(HttpError::Status {
                status,
                url: url.to_string(),
            });
        }

        Ok(body)
    }
}

fn next_request_id() -> String {
    format!(
        "r{:x}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    )
}

fn is_secret_param(name: &str) -> bool {
    matches!(
        name.to_ascii_lowercase().as_str(),
        "access_token"
            | "authorization"
            | "auth"
            | "key"
            | "api_key"
            | "token"
            | "secret"
            | "client_secret"
            | "bearer"
    )
}

/// Return "host + path" and the redacted query list for logging.
fn redact_query(url: &Url) -> (String, Vec<(String, String)>) {
    let host_path = format!("{}{}", url.host_str().unwrap_or("-"), url.path());
    let redacted = url
        .query_pairs()
        .map(|(k, v)| {
            let k = k.to_string();
            let v = if is_secret_param(&k) {
                "<redacted>".to_string()
            } else {
                v.to_string()
            };
            (k, v)
        })
        .collect();
    (host_path, redacted)
}

fn truncate_on_char_boundary(s: &mut String, max: usize) {
    let mut cut = max.min(s.len());
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    s.truncate(cut);
}

fn snip_body(body: &str) -> String {
    let mut snip = body.to_string();
    if snip.len() > 500 {
        truncate_on_char_boundary(&mut snip, 500);
        snip.push_str("...");
    }
    snip
}
