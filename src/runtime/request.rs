//! Request, response and per-call option values passed through the pipeline

use reqwest::Method;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::runtime::errors::CallError;
use crate::runtime::trace::SpanContext;

/// Outbound HTTP request
///
/// Bodies are fully buffered. The retry layer only ever replays GET requests,
/// which carry no body.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    method: Method,
    url: Url,
    headers: HeaderMap,
    body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// Create a request, failing if `url` does not parse
    pub fn new(method: Method, url: &str) -> Result<Self, CallError> {
        let url = Url::parse(url)
            .map_err(|e| CallError::InvalidRequest(format!("invalid url '{url}': {e}")))?;
        Ok(Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
        })
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    /// Set a header, replacing any previous value
    pub fn header(&mut self, name: &str, value: &str) -> Result<&mut Self, CallError> {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| CallError::InvalidRequest(format!("invalid header name '{name}': {e}")))?;
        let value = HeaderValue::from_str(value).map_err(|e| {
            CallError::InvalidRequest(format!("invalid value for header '{name}': {e}"))
        })?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// Serialise `body` as JSON and set the content type
    pub fn json_body<T: Serialize + ?Sized>(
        &mut self,
        body: &T,
    ) -> Result<&mut Self, serde_json::Error> {
        self.body = Some(serde_json::to_vec(body)?);
        self.headers.insert(
            reqwest::header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        Ok(self)
    }
}

/// Fully-read HTTP response
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    status: u16,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status)
    }
}

/// Per-call options threaded explicitly through every decorator
///
/// The deadline is fixed when the call starts and bounds every attempt.
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    operation: Option<String>,
    deadline: Option<Instant>,
    cancellation: Option<CancellationToken>,
    parent_span: Option<SpanContext>,
}

impl CallOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tag the call with the spec operation identifier
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Deadline `timeout` from now
    pub fn with_timeout(self, timeout: std::time::Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Trace context of the caller; attempt spans become its children
    pub fn with_parent_span(mut self, parent: SpanContext) -> Self {
        self.parent_span = Some(parent);
        self
    }

    pub fn operation(&self) -> Option<&str> {
        self.operation.as_deref()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn cancellation(&self) -> Option<&CancellationToken> {
        self.cancellation.as_ref()
    }

    pub fn parent_span(&self) -> Option<&SpanContext> {
        self.parent_span.as_ref()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }

    /// True once the deadline has passed
    pub fn is_expired(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}
