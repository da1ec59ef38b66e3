//! Minimal JSON-over-HTTP client with safe logging.
//!
//! - Request options: `Auth`, timeout, absolute-URL passthrough
//! - Never logs secret values; `Authorization` is always redacted
//! - One request per call; retrying is left to the caller
//! - Optional *raw* request/response logging via `HOOK_HTTP_RAW=1`
//!
//! Example (no_run):
//! ```rust
//! # async fn demo() -> Result<(), hook_http::HttpError> {
//! let client = hook_http::HttpClient::new("https://api.example.com/")?;
//! let got: serde_json::Value = client
//!     .post_json_opts("v1/items", &serde_json::json!({"a": 1}), hook_http::RequestOpts::default())
//!     .await?;
//! # Ok(()) }
//! ```
//!
//! Two flavours of POST exist. [`HttpClient::post_json_opts`] decodes a 2xx
//! body and turns anything else into [`HttpError::Api`].
//! [`HttpClient::post_json_status`] hands back the status of any completed
//! response and only fails when no response arrived at all, which lets the
//! caller tell transport failures apart from rejections.

use reqwest::header::{HeaderMap, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::env;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use thiserror::Error;

pub use reqwest::StatusCode;
pub use reqwest::header::HeaderValue;

// ==============================
// Raw logging toggles
// ==============================

const RAW_ENV: &str = "HOOK_HTTP_RAW";
const RAW_MAX_BODY: usize = 64 * 1024; // cap raw body logs (64 KiB)
const SNIPPET_MAX: usize = 500;

static REQUEST_SEQ: AtomicU64 = AtomicU64::new(1);

fn raw_enabled() -> bool {
    matches!(
        env::var(RAW_ENV).as_deref(),
        Ok("1") | Ok("true") | Ok("yes")
    )
}

/// Render a best-effort curl command for repro/debug, with secrets redacted.
fn make_curl(method: &Method, url: &Url, headers: &HeaderMap, body: Option<&[u8]>) -> String {
    let mut parts = vec!["curl".to_string(), format!("-X{}", method)];
    for (name, val) in redact_headers(headers) {
        parts.push(format!("-H '{}: {}'", name, val.replace('\'', r"'\''")));
    }
    if let Some(bytes) = body {
        match std::str::from_utf8(bytes) {
            Ok(s) => {
                let mut s = s.to_string();
                if s.len() > RAW_MAX_BODY {
                    truncate_at_char_boundary(&mut s, RAW_MAX_BODY);
                    s.push_str("...");
                }
                parts.push(format!("-d '{}'", s.replace('\'', r"'\''")));
            }
            Err(_) => parts.push(format!("--data-binary @- # ({} bytes)", bytes.len())),
        }
    }
    parts.push(format!("'{}'", url.as_str()));
    parts.join(" ")
}

/// Redact sensitive headers for logging
fn redact_headers(h: &HeaderMap) -> Vec<(String, String)> {
    h.iter()
        .map(|(k, v)| {
            let key = k.as_str().to_string();
            let val = if k == AUTHORIZATION {
                "<redacted>".to_string()
            } else {
                v.to_str().unwrap_or("").to_string()
            };
            (key, val)
        })
        .collect()
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
    #[error("server returned error {status}: {message}, request_id={request_id}")]
    Api {
        status: StatusCode,
        message: String,
        request_id: String,
    },
}

impl HttpError {
    /// True when no HTTP response was received at all.
    pub fn is_transport(&self) -> bool {
        matches!(self, HttpError::Network(_))
    }
}

// ==============================
// Auth & Request Options
// ==============================

/// Authentication strategies supported by the HTTP client helpers.
///
/// ```
/// use hook_http::Auth;
///
/// let raw = Auth::Raw("token-without-scheme");
/// match raw {
///     Auth::Raw(value) => assert_eq!(value, "token-without-scheme"),
///     _ => unreachable!(),
/// }
/// ```
#[derive(Clone, Debug)]
pub enum Auth<'a> {
    /// Authorization: <value>, passed through untouched
    Raw(&'a str),
    None,
}

impl Auth<'_> {
    fn kind(&self) -> &'static str {
        match self {
            Auth::Raw(_) => "raw",
            Auth::None => "none",
        }
    }
}

/// Per-request tuning knobs for the HTTP client.
///
/// ```
/// use hook_http::{Auth, RequestOpts};
/// use std::time::Duration;
///
/// let opts = RequestOpts {
///     timeout: Some(Duration::from_secs(30)),
///     auth: Some(Auth::Raw("abc")),
///     ..Default::default()
/// };
///
/// assert_eq!(opts.timeout.unwrap().as_secs(), 30);
/// assert!(!opts.allow_absolute);
/// ```
#[derive(Clone, Debug, Default)]
pub struct RequestOpts<'a> {
    pub timeout: Option<Duration>,
    pub auth: Option<Auth<'a>>,
    /// If true and `path` is an absolute URL, use it as-is (ignore base).
    pub allow_absolute: bool,
}

/// A completed HTTP exchange, before any status interpretation.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub request_id: String,
    pub body: Vec<u8>,
}

// ==============================
// Client
// ==============================

#[derive(Clone)]
pub struct HttpClient {
    base: Url,
    inner: Client,
    /// `None` leaves the request timeout to reqwest's default.
    pub default_timeout: Option<Duration>,
}

impl HttpClient {
    /// Construct a client anchored to a base URL.
    ///
    /// ```no_run
    /// use hook_http::{HttpClient, HttpError};
    ///
    /// let client = HttpClient::new("https://api.example.com/hiring/")?;
    /// assert_eq!(client.default_timeout, None);
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn new(base: &str) -> Result<Self, HttpError> {
        let base = Url::parse(base).map_err(|e| HttpError::Url(e.to_string()))?;
        let inner = Client::builder()
            .build()
            .map_err(|e| HttpError::Build(e.to_string()))?;
        Ok(Self {
            base,
            inner,
            default_timeout: None,
        })
    }

    /// Apply a per-request timeout to every call that doesn't set its own.
    ///
    /// ```no_run
    /// use hook_http::{HttpClient, HttpError};
    /// use std::time::Duration;
    ///
    /// let client = HttpClient::new("https://api.example.com")?
    ///     .with_timeout(Duration::from_secs(2));
    /// assert_eq!(client.default_timeout, Some(Duration::from_secs(2)));
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn with_timeout(mut self, dur: Duration) -> Self {
        self.default_timeout = Some(dur);
        self
    }

    /// POST JSON and decode a 2xx body into `T`; any other status is an error.
    pub async fn post_json_opts<B, T>(
        &self,
        path: &str,
        body: &B,
        opts: RequestOpts<'_>,
    ) -> Result<T, HttpError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let resp = self.execute(Method::POST, path, Some(body), opts).await?;
        let snippet = snip_body(&resp.body);

        if resp.status.is_success() {
            return serde_json::from_slice::<T>(&resp.body).map_err(|e| {
                tracing::warn!(
                    req_id=%resp.request_id,
                    serde_line=%e.line(),
                    serde_col=%e.column(),
                    serde_err=%e,
                    body_snippet=%snippet,
                    "http.response.decode_error"
                );
                HttpError::Decode(e.to_string(), snippet)
            });
        }

        let message = extract_error_message(&resp.body);
        tracing::warn!(
            req_id=%resp.request_id,
            status=%resp.status,
            message=%message,
            body_snippet=%snippet,
            "http.error"
        );
        Err(HttpError::Api {
            status: resp.status,
            message,
            request_id: resp.request_id,
        })
    }

    /// POST JSON and report the status of whatever response came back.
    ///
    /// Only failures to obtain a response at all are errors; the body is
    /// read (for logging) and dropped.
    pub async fn post_json_status<B>(
        &self,
        path: &str,
        body: &B,
        opts: RequestOpts<'_>,
    ) -> Result<StatusCode, HttpError>
    where
        B: Serialize + ?Sized,
    {
        let resp = self.execute(Method::POST, path, Some(body), opts).await?;
        Ok(resp.status)
    }

    fn resolve(&self, path: &str, allow_absolute: bool) -> Result<Url, HttpError> {
        if allow_absolute {
            if let Ok(abs) = Url::parse(path) {
                return Ok(abs);
            }
        }
        self.base
            .join(path)
            .map_err(|e| HttpError::Url(e.to_string()))
    }

    // ==============================
    // Core request implementation
    // ==============================

    async fn execute<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        opts: RequestOpts<'_>,
    ) -> Result<HttpResponse, HttpError>
    where
        B: Serialize + ?Sized,
    {
        let url = self.resolve(path, opts.allow_absolute)?;
        let body_bytes = body
            .map(serde_json::to_vec)
            .transpose()
            .map_err(|e| HttpError::Build(format!("body encode failed: {e}")))?;
        let auth_header = match &opts.auth {
            Some(Auth::Raw(value)) => Some(
                HeaderValue::from_str(value)
                    .map_err(|e| HttpError::Build(format!("invalid Authorization header: {e}")))?,
            ),
            Some(Auth::None) | None => None,
        };
        let auth_kind = opts.auth.as_ref().map(Auth::kind).unwrap_or("none");
        let timeout = opts.timeout.or(self.default_timeout);

        // ----- Build request -----
        let mut headers = HeaderMap::new();
        if body_bytes.is_some() {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }
        if let Some(mut value) = auth_header {
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let mut rb = self
            .inner
            .request(method.clone(), url.clone())
            .headers(headers.clone());
        if let Some(timeout) = timeout {
            rb = rb.timeout(timeout);
        }
        if let Some(bytes) = &body_bytes {
            rb = rb.body(bytes.clone());
        }

        let req_id = format!("r{}", REQUEST_SEQ.fetch_add(1, Ordering::Relaxed));
        tracing::debug!(
            req_id=%req_id,
            method=%method,
            host_path=%format!("{}{}", url.host_str().unwrap_or("-"), url.path()),
            timeout_ms=timeout.map(|t| t.as_millis() as u64),
            auth_kind,
            has_body=%body_bytes.is_some(),
            "http.request.start"
        );
        if raw_enabled() {
            let curl = make_curl(&method, &url, &headers, body_bytes.as_deref());
            tracing::debug!(target: "http.raw", %req_id, %curl, "request");
        }

        // ----- Send -----
        let t0 = Instant::now();
        let sent = match rb.send().await {
            Ok(resp) => {
                let status = resp.status();
                let resp_headers = resp.headers().clone();
                resp.bytes()
                    .await
                    .map(|b| (status, resp_headers, b.to_vec()))
            }
            Err(err) => Err(err),
        };
        let (status, resp_headers, bytes) = sent.map_err(|err| {
            let message = err.to_string();
            tracing::warn!(req_id=%req_id, message=%message, "http.network_error");
            HttpError::Network(message)
        })?;
        let dur_ms = t0.elapsed().as_millis() as u64;

        let request_id = resp_headers
            .get("x-request-id")
            .or_else(|| resp_headers.get("x-correlation-id"))
            .and_then(|v| v.to_str().ok())
            .unwrap_or(req_id.as_str())
            .to_string();

        tracing::debug!(
            req_id=%req_id,
            %status,
            duration_ms=dur_ms,
            body_len=bytes.len(),
            x_request_id=%request_id,
            "http.response.headers"
        );
        if raw_enabled() {
            let mut text = String::from_utf8_lossy(&bytes).to_string();
            let truncated = text.len() > RAW_MAX_BODY;
            if truncated {
                truncate_at_char_boundary(&mut text, RAW_MAX_BODY);
            }
            tracing::info!(
                target: "http.raw",
                %req_id,
                status=%status,
                duration_ms=dur_ms,
                headers=?redact_headers(&resp_headers),
                body=%text,
                truncated
            );
        }
        tracing::trace!(
            req_id=%req_id,
            body_snippet=%snip_body(&bytes),
            "http.response.body_snippet"
        );

        Ok(HttpResponse {
            status,
            request_id,
            body: bytes,
        })
    }
}

// ==============================
// Helpers
// ==============================

fn extract_error_message(body: &[u8]) -> String {
    // {"error":{"message":"..."}}
    #[derive(Deserialize)]
    struct Nested {
        error: NestedDetail,
    }
    #[derive(Deserialize)]
    struct NestedDetail {
        message: String,
    }

    // {"message":"..."} or {"detail":"..."} or {"error":"..."}
    #[derive(Deserialize)]
    struct Flat {
        #[serde(default)]
        message: String,
        #[serde(default)]
        detail: String,
        #[serde(default)]
        error: String,
    }

    if let Ok(env) = serde_json::from_slice::<Nested>(body) {
        return env.error.message;
    }
    if let Ok(m) = serde_json::from_slice::<Flat>(body) {
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
        truncate_at_char_boundary(&mut snip, SNIPPET_MAX);
        snip.push_str("...");
    }
    snip
}

fn truncate_at_char_boundary(s: &mut String, max: usize) {
    let mut cut = max.min(s.len());
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    s.truncate(cut);
}
