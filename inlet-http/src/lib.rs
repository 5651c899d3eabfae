//! HTTP client shared by the acquisition tools.
//!
//! - Per-request options: headers, [`Auth`], query params, timeout, retries
//! - Retries network errors and 429/5xx with exponential backoff, honoring
//!   `Retry-After`
//! - Structured `tracing` events for request start, response, retries, and
//!   final errors; Authorization values and known secret query params are
//!   always redacted
//! - JSON, text, and raw-byte response helpers over one retry core
//!
//! Example (no_run):
//! ```rust
//! # async fn demo() -> Result<(), inlet_http::HttpError> {
//! let client = inlet_http::HttpClient::new("https://api.example.com")?;
//! let got: serde_json::Value = client
//!     .get_json("v1/items", inlet_http::RequestOpts::default())
//!     .await?;
//! # Ok(()) }
//! ```

use reqwest::header::RETRY_AFTER;
use reqwest::{Client, Method, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;
use uuid::Uuid;

pub use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
pub use reqwest::StatusCode;

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
// Auth & request options
// ==============================

/// Authentication strategies supported by the client helpers.
#[derive(Clone, Debug)]
pub enum Auth<'a> {
    /// `Authorization: Bearer <token>`
    Bearer(&'a str),
    /// Custom header (e.g., Brave's `X-Subscription-Token`)
    Header {
        name: HeaderName,
        value: HeaderValue,
    },
    /// Auth via query param
    Query { name: &'a str, value: Cow<'a, str> },
    None,
}

/// Per-request tuning knobs.
///
/// ```
/// use inlet_http::RequestOpts;
/// use std::time::Duration;
///
/// let opts = RequestOpts {
///     timeout: Some(Duration::from_secs(30)),
///     retries: Some(1),
///     ..Default::default()
/// };
/// assert_eq!(opts.timeout.unwrap().as_secs(), 30);
/// assert!(!opts.allow_absolute);
/// ```
#[derive(Clone, Debug, Default)]
pub struct RequestOpts<'a> {
    pub timeout: Option<Duration>,
    pub retries: Option<usize>,
    pub auth: Option<Auth<'a>>,
    pub headers: Option<HeaderMap>,
    pub query: Option<Vec<(&'a str, Cow<'a, str>)>>,
    /// If true and `path` is an absolute URL, use it as-is (ignore base).
    pub allow_absolute: bool,
}

// ==============================
// Client
// ==============================

#[derive(Clone)]
pub struct HttpClient {
    base: Url,
    inner: Client,
    pub default_timeout: Duration,
    pub max_retries: usize,
}

impl HttpClient {
    /// Construct a client anchored to a base URL.
    ///
    /// ```no_run
    /// use inlet_http::{HttpClient, HttpError};
    /// use std::time::Duration;
    ///
    /// let client = HttpClient::new("https://api.example.com")?;
    /// assert_eq!(client.default_timeout, Duration::from_secs(15));
    /// assert_eq!(client.max_retries, 2);
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn new(base: &str) -> Result<Self, HttpError> {
        let base = Url::parse(base).map_err(|e| HttpError::Url(e.to_string()))?;
        let inner = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .user_agent(inlet_common::USER_AGENT)
            .build()
            .map_err(|e| HttpError::Build(e.to_string()))?;
        Ok(Self {
            base,
            inner,
            default_timeout: Duration::from_secs(15),
            max_retries: 2,
        })
    }

    /// Override the default timeout.
    pub fn with_timeout(mut self, dur: Duration) -> Self {
        self.default_timeout = dur;
        self
    }

    /// Override the default retry budget.
    pub fn with_retries(mut self, n: usize) -> Self {
        self.max_retries = n;
        self
    }

    /// GET and decode a JSON response.
    pub async fn get_json<T>(&self, path: &str, opts: RequestOpts<'_>) -> Result<T, HttpError>
    where
        T: DeserializeOwned,
    {
        let bytes = self
            .request_bytes::<()>(Method::GET, path, None, opts)
            .await?;
        decode_json(&bytes)
    }

    /// POST a JSON body and decode a JSON response.
    pub async fn post_json<B, T>(
        &self,
        path: &str,
        body: &B,
        opts: RequestOpts<'_>,
    ) -> Result<T, HttpError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let bytes = self
            .request_bytes(Method::POST, path, Some(body), opts)
            .await?;
        decode_json(&bytes)
    }

    /// GET a response body as text (lossy UTF-8).
    pub async fn get_text(&self, path: &str, opts: RequestOpts<'_>) -> Result<String, HttpError> {
        let bytes = self
            .request_bytes::<()>(Method::GET, path, None, opts)
            .await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// POST a JSON body and return the response body as text (lossy UTF-8).
    pub async fn post_text<B>(
        &self,
        path: &str,
        body: &B,
        opts: RequestOpts<'_>,
    ) -> Result<String, HttpError>
    where
        B: Serialize + ?Sized,
    {
        let bytes = self
            .request_bytes(Method::POST, path, Some(body), opts)
            .await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// GET a response body as raw bytes (document downloads).
    pub async fn get_bytes(&self, path: &str, opts: RequestOpts<'_>) -> Result<Vec<u8>, HttpError> {
        self.request_bytes::<()>(Method::GET, path, None, opts)
            .await
    }

    // ==============================
    // Retry core
    // ==============================

    async fn request_bytes<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        mut opts: RequestOpts<'_>,
    ) -> Result<Vec<u8>, HttpError>
    where
        B: Serialize + ?Sized,
    {
        let url = self.resolve_url(path, opts.allow_absolute)?;

        let mut attempt = 0usize;
        let max_retries = opts.retries.unwrap_or(self.max_retries);
        let timeout = opts.timeout.unwrap_or(self.default_timeout);
        let req_id = Uuid::new_v4();

        // Fold query-style auth into the query params once, up front, so
        // retries reuse the same pair set. Bearer tokens are sanitized once
        // for the same reason.
        if let Some(Auth::Query { name, value }) = &opts.auth {
            let mut q = opts.query.take().unwrap_or_default();
            q.push((*name, value.clone()));
            opts.query = Some(q);
        }
        let bearer = match &opts.auth {
            Some(Auth::Bearer(tok)) => Some(sanitize_api_key(tok)?),
            _ => None,
        };

        loop {
            let mut rb = self.inner.request(method.clone(), url.clone()).timeout(timeout);

            if let Some(q) = &opts.query {
                let pairs: Vec<(&str, &str)> = q.iter().map(|(k, v)| (*k, v.as_ref())).collect();
                rb = rb.query(&pairs);
            }
            if let Some(b) = body {
                rb = rb.json(b);
            }
            if let Some(hdrs) = &opts.headers {
                rb = rb.headers(hdrs.clone());
            }

            if let Some(tok) = &bearer {
                rb = rb.bearer_auth(tok);
            }
            if let Some(Auth::Header { name, value }) = &opts.auth {
                rb = rb.header(name, value);
            }

            tracing::debug!(
                req_id = %req_id,
                attempt = attempt + 1,
                max_retries,
                method = %method,
                host_path = %host_path(&url),
                query = ?redacted_query(opts.query.as_deref()),
                timeout_ms = timeout.as_millis() as u64,
                auth_kind = auth_kind(opts.auth.as_ref()),
                has_body = body.is_some(),
                "http.request.start"
            );

            let t0 = std::time::Instant::now();
            let outcome = match rb.send().await {
                Ok(resp) => {
                    let status = resp.status();
                    let headers = resp.headers().clone();
                    match resp.bytes().await {
                        Ok(bytes) => Ok((status, headers, bytes)),
                        Err(err) => Err(err.to_string()),
                    }
                }
                Err(err) => Err(err.to_string()),
            };

            let (status, headers, bytes) = match outcome {
                Ok(parts) => parts,
                Err(message) => {
                    if attempt < max_retries {
                        attempt += 1;
                        let delay = backoff_delay(attempt, false, None);
                        tracing::warn!(
                            req_id = %req_id,
                            attempt,
                            max_retries,
                            backoff_ms = delay.as_millis() as u64,
                            message = %message,
                            "http.retrying.network"
                        );
                        sleep(delay).await;
                        continue;
                    }
                    tracing::warn!(
                        req_id = %req_id,
                        attempt,
                        max_retries,
                        message = %message,
                        "http.network_error"
                    );
                    return Err(HttpError::Network(message));
                }
            };

            tracing::debug!(
                req_id = %req_id,
                %status,
                duration_ms = t0.elapsed().as_millis() as u64,
                body_len = bytes.len(),
                "http.response"
            );

            if status.is_success() {
                return Ok(bytes.to_vec());
            }

            let message = extract_error_message(&bytes);
            let snippet = snip_body(&bytes);
            let is_429 = status == StatusCode::TOO_MANY_REQUESTS;

            if (is_429 || status.is_server_error()) && attempt < max_retries {
                attempt += 1;
                let delay = backoff_delay(attempt, is_429, retry_after_secs(&headers));
                tracing::warn!(
                    req_id = %req_id,
                    %status,
                    attempt,
                    max_retries,
                    backoff_ms = delay.as_millis() as u64,
                    message = %message,
                    body_snippet = %snippet,
                    "http.retrying"
                );
                sleep(delay).await;
                continue;
            }

            tracing::warn!(
                req_id = %req_id,
                %status,
                message = %message,
                body_snippet = %snippet,
                "http.error"
            );
            return Err(HttpError::Api { status, message });
        }
    }

    fn resolve_url(&self, path: &str, allow_absolute: bool) -> Result<Url, HttpError> {
        if allow_absolute {
            if let Ok(abs) = Url::parse(path) {
                return Ok(abs);
            }
        }
        self.base
            .join(path)
            .map_err(|e| HttpError::Url(e.to_string()))
    }
}

// ==============================
// Helpers
// ==============================

fn decode_json<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, HttpError> {
    serde_json::from_slice(bytes).map_err(|e| HttpError::Decode(e.to_string(), snip_body(bytes)))
}

fn backoff_delay(attempt: usize, is_429: bool, retry_after: Option<u64>) -> Duration {
    if let Some(secs) = retry_after {
        return Duration::from_secs(secs);
    }
    let exp = Duration::from_millis(200u64.saturating_mul(1 << (attempt - 1)));
    if is_429 {
        // default floor for 429 when no Retry-After is present
        exp.max(Duration::from_millis(1100))
    } else {
        exp
    }
}

fn retry_after_secs(h: &HeaderMap) -> Option<u64> {
    h.get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())?
        .parse()
        .ok()
}

fn host_path(url: &Url) -> String {
    format!("{}{}", url.domain().unwrap_or("-"), url.path())
}

fn auth_kind(auth: Option<&Auth<'_>>) -> &'static str {
    match auth {
        Some(Auth::Bearer(_)) => "bearer",
        Some(Auth::Header { .. }) => "header",
        Some(Auth::Query { .. }) => "query",
        Some(Auth::None) | None => "none",
    }
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

fn redacted_query(query: Option<&[(&str, Cow<'_, str>)]>) -> Vec<(String, String)> {
    query
        .map(|q| {
            q.iter()
                .map(|(k, v)| {
                    let value = if is_secret_param(k) {
                        "<redacted>".to_string()
                    } else {
                        v.as_ref().to_string()
                    };
                    ((*k).to_string(), value)
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Pull a human-readable message out of common JSON error envelopes:
/// `{"error":{"message":...}}`, `{"errors":[{...}]}`, or flat
/// `{"message"|"detail"|"error": ...}`. Falls back to a body snippet.
fn extract_error_message(body: &[u8]) -> String {
    #[derive(Deserialize)]
    struct Nested {
        error: NestedDetail,
    }
    #[derive(Deserialize)]
    struct NestedDetail {
        message: String,
    }

    #[derive(Deserialize)]
    struct Many {
        errors: Vec<Flat>,
    }

    #[derive(Default, Deserialize)]
    struct Flat {
        #[serde(default)]
        message: String,
        #[serde(default)]
        detail: String,
        #[serde(default)]
        error: String,
    }

    impl Flat {
        fn first_nonempty(self) -> Option<String> {
            [self.message, self.detail, self.error]
                .into_iter()
                .find(|s| !s.is_empty())
        }
    }

    if let Ok(env) = serde_json::from_slice::<Nested>(body) {
        return env.error.message;
    }
    if let Ok(many) = serde_json::from_slice::<Many>(body) {
        if let Some(msg) = many.errors.into_iter().next().and_then(Flat::first_nonempty) {
            return msg;
        }
    }
    if let Ok(flat) = serde_json::from_slice::<Flat>(body) {
        if let Some(msg) = flat.first_nonempty() {
            return msg;
        }
    }
    snip_body(body)
}

fn snip_body(body: &[u8]) -> String {
    let mut snip = String::from_utf8_lossy(body).to_string();
    if snip.len() > 500 {
        snip.truncate(500);
        snip.push_str("...");
    }
    snip
}

fn sanitize_api_key(raw: &str) -> Result<String, HttpError> {
    // 1) Trim outer spaces/quotes
    let mut s = raw
        .trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .to_string();

    // 2) Remove *all* ASCII whitespace (spaces, tabs, newlines, carriage returns)
    s.retain(|ch| !ch.is_ascii_whitespace());

    // 3) Ensure ASCII and no control chars
    if !s.is_ascii() {
        return Err(HttpError::Build("API key contains non-ASCII bytes".into()));
    }
    if s.bytes().any(|b| b < 0x20 || b == 0x7F) {
        return Err(HttpError::Build(
            "API key contains control characters".into(),
        ));
    }

    // 4) Validate header value upfront for clear errors
    HeaderValue::from_str(&format!("Bearer {}", s))
        .map_err(|e| HttpError::Build(format!("invalid Authorization header: {e}")))?;
    Ok(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_quotes_and_whitespace() {
        assert_eq!(sanitize_api_key("  \"abc def\"\n").unwrap(), "abcdef");
        assert_eq!(sanitize_api_key("'tok-123'").unwrap(), "tok-123");
    }

    #[test]
    fn sanitize_rejects_non_ascii() {
        assert!(sanitize_api_key("clé").is_err());
    }

    #[test]
    fn snip_truncates_long_bodies() {
        let long = "x".repeat(600);
        let snip = snip_body(long.as_bytes());
        assert_eq!(snip.len(), 503);
        assert!(snip.ends_with("..."));
    }

    #[test]
    fn error_message_from_nested_envelope() {
        let body = br#"{"error":{"message":"quota exceeded"}}"#;
        assert_eq!(extract_error_message(body), "quota exceeded");
    }

    #[test]
    fn error_message_from_flat_fields() {
        assert_eq!(
            extract_error_message(br#"{"detail":"not found"}"#),
            "not found"
        );
        assert_eq!(
            extract_error_message(br#"{"errors":[{"message":"bad query"}]}"#),
            "bad query"
        );
    }

    #[test]
    fn error_message_falls_back_to_snippet() {
        assert_eq!(extract_error_message(b"plain text"), "plain text");
    }

    #[test]
    fn backoff_grows_and_respects_retry_after() {
        assert_eq!(backoff_delay(1, false, None), Duration::from_millis(200));
        assert_eq!(backoff_delay(2, false, None), Duration::from_millis(400));
        assert_eq!(backoff_delay(1, true, None), Duration::from_millis(1100));
        assert_eq!(backoff_delay(1, false, Some(7)), Duration::from_secs(7));
    }

    #[test]
    fn secret_query_params_are_redacted() {
        let q = vec![
            ("q", Cow::Borrowed("rust")),
            ("api_key", Cow::Borrowed("sk-secret")),
        ];
        let redacted = redacted_query(Some(&q));
        assert_eq!(redacted[0], ("q".into(), "rust".into()));
        assert_eq!(redacted[1], ("api_key".into(), "<redacted>".into()));
    }
}
