//! Minimal authenticated client for the OVH API.
//!
//! The client resolves API regions, builds requests signed the way the OVH
//! API expects, and executes them bound to a [`CancellationToken`]. It
//! never retries and never inspects response bodies beyond the server time
//! lookup needed for signing.

mod endpoints;
mod signature;
mod types;

use std::future::Future;
use std::time::Duration;

use chrono::Utc;
use log::debug;
use reqwest::Method;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue, InvalidHeaderValue};
use thiserror::Error;
use tokio::sync::OnceCell;
use tokio_util::sync::CancellationToken;
use url::Url;

use self::signature::sign;

pub use self::endpoints::ApiEndpoint;
pub use self::types::{ApplicationKey, ApplicationSecret, ConsumerKey, Credentials};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(180);

/// Correlation identifier returned by the API for every call.
pub const QUERY_ID_HEADER: &str = "X-Ovh-QueryID";

const AUTH_TIME_PATH: &str = "/auth/time";
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

const X_OVH_APPLICATION: &str = "x-ovh-application";
const X_OVH_CONSUMER: &str = "x-ovh-consumer";
const X_OVH_TIMESTAMP: &str = "x-ovh-timestamp";
const X_OVH_SIGNATURE: &str = "x-ovh-signature";

/// Errors raised while building or executing OVH API requests.
#[derive(Debug, Error)]
pub enum OvhError {
    #[error("unknown endpoint '{0}', use a known endpoint name or a URL")]
    UnknownEndpoint(String),
    #[error("invalid escape sequence in request URL '{0}'")]
    InvalidEscape(String),
    #[error("invalid request URL '{target}': {source}")]
    InvalidUrl {
        target: String,
        #[source]
        source: url::ParseError,
    },
    #[error("request URL '{target}' is not canonical, it would be sent as '{sent}'")]
    NonCanonicalUrl { target: String, sent: String },
    #[error("invalid value for header {name}: {source}")]
    InvalidHeader {
        name: &'static str,
        #[source]
        source: InvalidHeaderValue,
    },
    #[error("failed to encode request body: {0}")]
    EncodeBody(#[source] serde_json::Error),
    #[error("failed to build request: {0}")]
    Build(#[source] reqwest::Error),
    #[error("failed to create HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    #[error("failed to get server time: {0}")]
    ServerTime(String),
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("request cancelled")]
    Cancelled,
    #[error("failed to read response body: {0}")]
    BodyRead(#[source] reqwest::Error),
}

/// A fully built, possibly signed, API request.
#[derive(Debug)]
pub struct ApiRequest(reqwest::Request);

impl ApiRequest {
    #[must_use]
    pub fn url(&self) -> &Url {
        self.0.url()
    }

    /// Header value as text, `None` when absent or not visible ASCII.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.0.headers().get(name).and_then(|v| v.to_str().ok())
    }
}

/// A response whose body has not been read yet.
#[derive(Debug)]
pub struct ApiResponse(reqwest::Response);

impl ApiResponse {
    #[must_use]
    pub fn status(&self) -> u16 {
        self.0.status().as_u16()
    }

    /// Header value as text, `None` when absent or not visible ASCII.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.0.headers().get(name).and_then(|v| v.to_str().ok())
    }

    /// Consume the whole body.
    ///
    /// # Errors
    ///
    /// Returns [`OvhError::Cancelled`] when `cancel` fires first, or
    /// [`OvhError::BodyRead`] when the stream breaks.
    pub async fn bytes(self, cancel: &CancellationToken) -> Result<Vec<u8>, OvhError> {
        let body = until_cancelled(cancel, self.0.bytes())
            .await?
            .map_err(OvhError::BodyRead)?;
        Ok(body.to_vec())
    }
}

/// Client for the OVH API.
///
/// Holds the region base URL, the application credentials and the
/// server time delta, which is fetched once and reused for every signed
/// request.
#[derive(Debug)]
pub struct OvhClient {
    http: reqwest::Client,
    endpoint: ApiEndpoint,
    credentials: Credentials,
    time_delta: OnceCell<i64>,
}

impl OvhClient {
    /// Create a client for `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`OvhError::HttpClient`] if the HTTP client cannot be built.
    pub fn new(
        endpoint: ApiEndpoint,
        credentials: Credentials,
        timeout: Duration,
    ) -> Result<Self, OvhError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(OvhError::HttpClient)?;
        Ok(Self {
            http,
            endpoint,
            credentials,
            time_delta: OnceCell::new(),
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &ApiEndpoint {
        &self.endpoint
    }

    /// Build a request for `path` on this client's endpoint.
    ///
    /// When `need_auth` is set and an application key is configured the
    /// request carries `X-Ovh-Timestamp`, `X-Ovh-Consumer` and
    /// `X-Ovh-Signature`. Computing the timestamp may require one call to
    /// `/auth/time`, bound to `cancel`.
    ///
    /// # Errors
    ///
    /// Returns an [`OvhError`] when the target URL is malformed, a header
    /// value is invalid, the body cannot be encoded or the server time
    /// cannot be fetched.
    pub async fn new_request(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
        need_auth: bool,
        cancel: &CancellationToken,
    ) -> Result<ApiRequest, OvhError> {
        let body = body
            .map(serde_json::to_string)
            .transpose()
            .map_err(OvhError::EncodeBody)?;
        let target = self.endpoint.target(path);
        let url = parse_target(&target)?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if body.is_some() {
            headers.insert(
                CONTENT_TYPE,
                HeaderValue::from_static("application/json;charset=utf-8"),
            );
        }
        let creds = &self.credentials;
        if creds.can_sign() {
            headers.insert(
                X_OVH_APPLICATION,
                header_value("X-Ovh-Application", creds.application_key.as_str())?,
            );
        }
        if need_auth && creds.can_sign() {
            let timestamp = Utc::now().timestamp() - self.time_delta(cancel).await?;
            let signature = sign(
                creds,
                &method,
                &target,
                body.as_deref().unwrap_or_default(),
                timestamp,
            );
            headers.insert(X_OVH_TIMESTAMP, HeaderValue::from(timestamp));
            headers.insert(
                X_OVH_CONSUMER,
                header_value("X-Ovh-Consumer", creds.consumer_key.as_str())?,
            );
            headers.insert(
                X_OVH_SIGNATURE,
                header_value("X-Ovh-Signature", &signature)?,
            );
        }

        let mut builder = self.http.request(method, url).headers(headers);
        if let Some(body) = body {
            builder = builder.body(body);
        }
        builder.build().map(ApiRequest).map_err(OvhError::Build)
    }

    /// Send `request`, aborting it when `cancel` fires.
    ///
    /// Any HTTP status is a successful execution; only transport failures,
    /// timeouts and cancellation are errors.
    ///
    /// # Errors
    ///
    /// Returns [`OvhError::Transport`] or [`OvhError::Cancelled`].
    pub async fn execute(
        &self,
        request: ApiRequest,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse, OvhError> {
        until_cancelled(cancel, self.http.execute(request.0))
            .await?
            .map(ApiResponse)
            .map_err(OvhError::Transport)
    }

    /// Difference between the local clock and the API clock, in seconds.
    ///
    /// # Errors
    ///
    /// Returns [`OvhError::ServerTime`] when `/auth/time` cannot be read, or
    /// [`OvhError::Cancelled`].
    pub async fn time_delta(&self, cancel: &CancellationToken) -> Result<i64, OvhError> {
        self.time_delta
            .get_or_try_init(|| self.fetch_time_delta(cancel))
            .await
            .copied()
    }

    async fn fetch_time_delta(&self, cancel: &CancellationToken) -> Result<i64, OvhError> {
        let url = parse_target(&self.endpoint.target(AUTH_TIME_PATH))?;
        let request = self.http.get(url).header(ACCEPT, "application/json").send();
        let response = until_cancelled(cancel, request)
            .await?
            .map_err(|e| OvhError::ServerTime(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(OvhError::ServerTime(format!("unexpected status {status}")));
        }
        let body = until_cancelled(cancel, response.text())
            .await?
            .map_err(|e| OvhError::ServerTime(e.to_string()))?;
        let server_time: i64 = serde_json::from_str(body.trim())
            .map_err(|e| OvhError::ServerTime(format!("invalid server time: {e}")))?;
        let delta = Utc::now().timestamp() - server_time;
        debug!("OVH server time delta is {delta}s");
        Ok(delta)
    }
}

/// Parse `target` into the exact URL that will be sent and signed.
///
/// Refuses `%` not followed by two hex digits, and any target the parser
/// would rewrite (dot segments, percent-encoded characters, missing root
/// path), since the signature covers `target` verbatim.
fn parse_target(target: &str) -> Result<Url, OvhError> {
    let mut escapes = target.split('%').skip(1);
    if escapes.any(|rest| {
        rest.get(..2)
            .is_none_or(|pair| !pair.bytes().all(|b| b.is_ascii_hexdigit()))
    }) {
        return Err(OvhError::InvalidEscape(target.to_string()));
    }
    let url = Url::parse(target).map_err(|source| OvhError::InvalidUrl {
        target: target.to_string(),
        source,
    })?;
    if url.as_str() != target {
        return Err(OvhError::NonCanonicalUrl {
            target: target.to_string(),
            sent: url.into(),
        });
    }
    Ok(url)
}

fn header_value(name: &'static str, value: &str) -> Result<HeaderValue, OvhError> {
    HeaderValue::from_str(value).map_err(|source| OvhError::InvalidHeader { name, source })
}

/// Drive `fut` to completion unless `cancel` fires first.
#[expect(
    clippy::integer_division_remainder_used,
    reason = "tokio::select! uses % internally"
)]
async fn until_cancelled<F>(cancel: &CancellationToken, fut: F) -> Result<F::Output, OvhError>
where
    F: Future,
{
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(OvhError::Cancelled),
        out = fut => Ok(out),
    }
}
