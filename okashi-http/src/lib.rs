//! Minimal JSON-over-HTTP GET client with safe logging.
//!
//! - One request per call: no retries, no implicit timeout
//! - Redacts secret query params (`apikey`, `token`, ...) in every log line
//! - Optional *raw* request/response logging via `OKASHI_HTTP_RAW=1`
//!
//! Example (no_run):
//! ```rust
//! # async fn demo() -> Result<(), okashi_http::HttpError> {
//! let client = okashi_http::HttpClient::new()?;
//! let url = okashi_http::Url::parse("https://api.example.com/v1/items").unwrap();
//! let got: serde_json::Value = client
//!     .get_json(&url)
//!     .await?;
//! # Ok(()) }
//! ```
//!
//! Observability: structured `tracing` events are emitted for request start,
//! response headers, body snippets (truncated), decode failures, and
//! (optionally) raw request/response lines (target `http.raw`).

use reqwest::header::HeaderMap;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::env;
use std::time::{Duration, Instant};
use thiserror::Error;

pub use reqwest::Url;

// ==============================
// Raw logging toggles
// ==============================

const RAW_ENV: &str = "OKASHI_HTTP_RAW";
const RAW_MAX_BODY: usize = 64 * 1024; // cap raw body logs (64 KiB)
const SNIPPET_MAX: usize = 500;
const REDACTED: &str = "<redacted>";

fn raw_enabled() -> bool {
    matches!(
        env::var(RAW_ENV).as_deref(),
        Ok("1") | Ok("true") | Ok("yes")
    )
}

fn is_secret_param(name: &str) -> bool {
    matches!(
        name.to_ascii_lowercase().as_str(),
        "apikey"
            | "api_key"
            | "key"
            | "access_token"
            | "token"
            | "auth"
            | "authorization"
            | "secret"
            | "client_secret"
    )
}

/// Copy of `url` with secret query values replaced, safe to log or print.
pub fn redacted_url(url: &Url) -> Url {
    if url.query().is_none() {
        return url.clone();
    }
    let pairs: Vec<(String, String)> = redact_query(url);
    let mut out = url.clone();
    out.query_pairs_mut().clear().extend_pairs(pairs);
    out
}

/// Render a best-effort curl command for repro/debug, with secrets redacted.
fn make_curl(url: &Url) -> String {
    format!("curl -XGET '{}'", redacted_url(url).as_str())
}

// ==============================
// Errors
// ==============================

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("invalid URL: {0}")]
    Url(String),
    #[error("request build failed: {0}")]
    Build(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("decode error: {0}, body_snippet: {1}")]
    Decode(String, String),
    #[error("server returned error {status}: {message}")]
    Api { status: StatusCode, message: String },
}

// ==============================
// Client
// ==============================

#[derive(Clone)]
pub struct HttpClient {
    inner: Client,
    pub default_timeout: Option<Duration>,
}

impl HttpClient {
    /// Construct a client that leaves connect/read timeouts to the transport.
    ///
    /// ```no_run
    /// use okashi_http::{HttpClient, HttpError};
    ///
    /// let client = HttpClient::new()?;
    /// assert!(client.default_timeout.is_none());
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn new() -> Result<Self, HttpError> {
        let inner = Client::builder()
            .build()
            .map_err(|e| HttpError::Build(e.to_string()))?;
        Ok(Self {
            inner,
            default_timeout: None,
        })
    }

    /// Apply a whole-request timeout to every call.
    ///
    /// ```no_run
    /// use okashi_http::{HttpClient, HttpError};
    /// use std::time::Duration;
    ///
    /// let client = HttpClient::new()?.with_timeout(Duration::from_secs(2));
    /// assert_eq!(client.default_timeout, Some(Duration::from_secs(2)));
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn with_timeout(mut self, dur: Duration) -> Self {
        self.default_timeout = Some(dur);
        self
    }

    /// GET `url` and decode the body as JSON.
    ///
    /// Non-2xx responses become [`HttpError::Api`]; the body is never decoded
    /// into `T` in that case.
    pub async fn get_json<T>(&self, url: &Url) -> Result<T, HttpError>
    where
        T: DeserializeOwned,
    {
        match url.scheme() {
            "http" | "https" => {}
            other => return Err(HttpError::Url(format!("unsupported scheme: {other}"))),
        }

        // ----- Build request -----
        let mut rb = self.inner.get(url.clone());

        let timeout = self.default_timeout;
        if let Some(t) = timeout {
            rb = rb.timeout(t);
        }

        // ----- Safe request logging (pre-send) -----
        let req_id = uuid::Uuid::new_v4().simple().to_string();
        let (host_path, redacted_q) = host_path_and_query(url);

        tracing::debug!(
            req_id=%req_id,
            method="GET",
            host_path=%host_path,
            query=?redacted_q,
            timeout_ms=?timeout.map(|t| t.as_millis() as u64),
            "http.request.start"
        );

        if raw_enabled() {
            let curl = make_curl(url);
            tracing::debug!(target: "http.raw", %req_id, %curl, "request");
        }

        // ----- Send -----
        let t0 = Instant::now();
        let resp = rb.send().await.map_err(|err| {
            let message = err.to_string();
            tracing::warn!(
                req_id=%req_id,
                is_connect=err.is_connect(),
                is_timeout=err.is_timeout(),
                message=%message,
                "http.network_error.send"
            );
            HttpError::Network(message)
        })?;

        let status = resp.status();
        let headers = resp.headers().clone();
        let bytes = resp.bytes().await.map_err(|err| {
            let message = err.to_string();
            tracing::warn!(req_id=%req_id, message=%message, "http.network_error.body");
            HttpError::Network(message)
        })?;
        let dur_ms = t0.elapsed().as_millis() as u64;

        let content_type = headers
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-");

        tracing::debug!(
            req_id=%req_id,
            %status,
            duration_ms=dur_ms,
            body_len=bytes.len(),
            content_type=%content_type,
            "http.response.headers"
        );

        if raw_enabled() {
            let hdrs = redact_headers(&headers);
            let truncated = bytes.len() > RAW_MAX_BODY;
            let text = String::from_utf8_lossy(&bytes[..bytes.len().min(RAW_MAX_BODY)]);
            tracing::info!(
                target:"http.raw",
                %req_id,
                status=%status,
                duration_ms=dur_ms,
                headers=?hdrs,
                body=%text,
                truncated
            );
        }

        let snippet = snip_body(&bytes);
        tracing::trace!(req_id=%req_id, body_snippet=%snippet, "http.response.body_snippet");

        // ----- Success path -----
        if status.is_success() {
            return serde_json::from_slice::<T>(&bytes).map_err(|e| {
                tracing::warn!(
                    req_id=%req_id,
                    serde_line=%e.line(),
                    serde_col=%e.column(),
                    serde_err=%e.to_string(),
                    body_snippet=%snippet,
                    "http.response.decode_error"
                );
                HttpError::Decode(e.to_string(), snippet)
            });
        }

        let message = extract_error_message(&bytes);
        tracing::warn!(
            req_id=%req_id,
            %status,
            message=%message,
            body_snippet=%snippet,
            "http.error"
        );
        Err(HttpError::Api { status, message })
    }
}

// ==============================
// Helpers
// ==============================

fn extract_error_message(body: &[u8]) -> String {
    // Generic: {"message":"..."} or {"detail":"..."} or {"error":"..."}
    #[derive(Deserialize)]
    struct Msg {
        #[serde(default)]
        message: String,
        #[serde(default)]
        detail: String,
        #[serde(default)]
        error: String,
    }

    if let Ok(m) = serde_json::from_slice::<Msg>(body) {
        for candidate in [m.message, m.detail, m.error] {
            if !candidate.is_empty() {
                return candidate;
            }
        }
    }
    snip_body(body)
}

fn snip_body(body: &[u8]) -> String {
    let mut snip = String::from_utf8_lossy(body).to_string();
    if snip.len() > SNIPPET_MAX {
        let mut cut = SNIPPET_MAX;
        while !snip.is_char_boundary(cut) {
            cut -= 1;
        }
        snip.truncate(cut);
        snip.push_str("...");
    }
    snip
}

/// Redact sensitive headers for logging
fn redact_headers(h: &HeaderMap) -> Vec<(String, String)> {
    h.iter()
        .map(|(k, v)| {
            let key = k.as_str().to_string();
            let mut val = v.to_str().unwrap_or("").to_string();
            if key.eq_ignore_ascii_case("authorization") || key.eq_ignore_ascii_case("set-cookie")
            {
                val = REDACTED.into();
            }
            (key, val)
        })
        .collect()
}

fn redact_query(url: &Url) -> Vec<(String, String)> {
    url.query_pairs()
        .map(|(k, v)| {
            let k = k.to_string();
            let v = if is_secret_param(&k) {
                REDACTED.to_string()
            } else {
                v.to_string()
            };
            (k, v)
        })
        .collect()
}

fn host_path_and_query(url: &Url) -> (String, Vec<(String, String)>) {
    let host_path = format!("{}{}", url.host_str().unwrap_or("-"), url.path());
    (host_path, redact_query(url))
}
