//! Trace propagation and the tracing decorator
//!
//! The tracer is a capability: it starts spans, injects the active span's
//! context into outbound headers, and extracts an incoming context on the
//! server side. [`W3cTracer`] is the default implementation; it speaks the
//! W3C `traceparent` format and records spans through `tracing`.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use thiserror::Error;
use tracing::Instrument;

use crate::runtime::errors::CallError;
use crate::runtime::executor::Executor;
use crate::runtime::request::{CallOptions, HttpRequest, HttpResponse};

/// Header carrying the W3C trace context
pub const TRACEPARENT_HEADER: &str = "traceparent";

/// Identity of a span as propagated between services
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanContext {
    pub trace_id: String,
    pub span_id: String,
    pub sampled: bool,
}

impl SpanContext {
    /// Fresh root context with random identifiers
    pub fn new_root() -> Self {
        Self {
            trace_id: random_hex(32),
            span_id: random_hex(16),
            sampled: true,
        }
    }

    /// Child of `self`: same trace, new span id
    pub fn child(&self) -> Self {
        Self {
            trace_id: self.trace_id.clone(),
            span_id: random_hex(16),
            sampled: self.sampled,
        }
    }

    /// Render as a `traceparent` header value
    pub fn to_traceparent(&self) -> String {
        let flags = if self.sampled { "01" } else { "00" };
        format!("00-{}-{}-{}", self.trace_id, self.span_id, flags)
    }

    /// Parse a `traceparent` header value
    pub fn from_traceparent(value: &str) -> Option<Self> {
        let mut parts = value.trim().split('-');
        let version = parts.next()?;
        let trace_id = parts.next()?;
        let span_id = parts.next()?;
        let flags = parts.next()?;

        if version.len() != 2 || trace_id.len() != 32 || span_id.len() != 16 || flags.len() != 2 {
            return None;
        }
        let is_hex = |s: &str| s.chars().all(|c| c.is_ascii_hexdigit());
        if !is_hex(trace_id) || !is_hex(span_id) || !is_hex(flags) {
            return None;
        }
        if trace_id.chars().all(|c| c == '0') || span_id.chars().all(|c| c == '0') {
            return None;
        }

        let flags = u8::from_str_radix(flags, 16).ok()?;
        Some(Self {
            trace_id: trace_id.to_ascii_lowercase(),
            span_id: span_id.to_ascii_lowercase(),
            sampled: flags & 0x01 == 0x01,
        })
    }
}

fn random_hex(len: usize) -> String {
    let mut out = uuid::Uuid::new_v4().simple().to_string();
    out.truncate(len);
    out
}

/// Errors raised by a [`Tracer`]
#[derive(Error, Debug)]
pub enum TraceError {
    #[error("cannot encode trace header '{header}': {reason}")]
    Inject { header: String, reason: String },
}

/// A started span; finishing it records its outcome
pub trait ActiveSpan: Send {
    fn context(&self) -> &SpanContext;

    /// Record the attempt outcome: a status code or an error message
    fn record_outcome(&mut self, status: Option<u16>, error: Option<&str>);

    /// Finish the span. Dropping it unfinished also finishes it.
    fn finish(self: Box<Self>);

    /// `tracing` span the attempt runs inside
    fn tracing_span(&self) -> tracing::Span {
        tracing::Span::none()
    }
}

/// Start span / inject context / extract context
pub trait Tracer: Send + Sync {
    fn start_span(&self, name: &str, parent: Option<&SpanContext>) -> Box<dyn ActiveSpan>;

    fn inject(&self, context: &SpanContext, headers: &mut HeaderMap) -> Result<(), TraceError>;

    fn extract(&self, headers: &HeaderMap) -> Option<SpanContext>;
}

/// Default tracer: W3C propagation, spans recorded via `tracing`
#[derive(Debug, Clone, Default)]
pub struct W3cTracer;

impl W3cTracer {
    pub fn new() -> Self {
        Self
    }
}

struct W3cSpan {
    name: String,
    context: SpanContext,
    span: tracing::Span,
    started: Instant,
    status: Option<u16>,
    error: Option<String>,
}

impl ActiveSpan for W3cSpan {
    fn context(&self) -> &SpanContext {
        &self.context
    }

    fn record_outcome(&mut self, status: Option<u16>, error: Option<&str>) {
        self.status = status;
        self.error = error.map(str::to_string);
    }

    fn finish(self: Box<Self>) {}

    fn tracing_span(&self) -> tracing::Span {
        self.span.clone()
    }
}

impl Drop for W3cSpan {
    fn drop(&mut self) {
        if self.status.is_none() && self.error.is_none() {
            self.error = Some(ABANDONED.to_string());
        }
        let _entered = self.span.enter();
        tracing::debug!(
            span = %self.name,
            trace_id = %self.context.trace_id,
            span_id = %self.context.span_id,
            status = ?self.status,
            error = ?self.error,
            elapsed_ms = self.started.elapsed().as_millis() as u64,
            "span finished"
        );
    }
}

/// Outcome recorded for a span dropped before its attempt completed
const ABANDONED: &str = "attempt abandoned before completion";

impl Tracer for W3cTracer {
    fn start_span(&self, name: &str, parent: Option<&SpanContext>) -> Box<dyn ActiveSpan> {
        let context = match parent {
            Some(parent) => parent.child(),
            None => SpanContext::new_root(),
        };
        let span = tracing::debug_span!(
            "client.request",
            otel.name = %name,
            trace_id = %context.trace_id,
            span_id = %context.span_id,
        );
        Box::new(W3cSpan {
            name: name.to_string(),
            context,
            span,
            started: Instant::now(),
            status: None,
            error: None,
        })
    }

    fn inject(&self, context: &SpanContext, headers: &mut HeaderMap) -> Result<(), TraceError> {
        let value = HeaderValue::from_str(&context.to_traceparent()).map_err(|e| {
            TraceError::Inject {
                header: TRACEPARENT_HEADER.to_string(),
                reason: e.to_string(),
            }
        })?;
        headers.insert(TRACEPARENT_HEADER, value);
        Ok(())
    }

    fn extract(&self, headers: &HeaderMap) -> Option<SpanContext> {
        headers
            .get(TRACEPARENT_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(SpanContext::from_traceparent)
    }
}

/// Starts one span per attempt and propagates its context downstream
pub struct TracingDecorator<E> {
    inner: E,
    tracer: Arc<dyn Tracer>,
}

impl<E: Executor> TracingDecorator<E> {
    pub fn new(inner: E, tracer: Arc<dyn Tracer>) -> Self {
        Self { inner, tracer }
    }
}

#[async_trait]
impl<E: Executor> Executor for TracingDecorator<E> {
    async fn execute(
        &self,
        mut request: HttpRequest,
        options: &CallOptions,
    ) -> Result<HttpResponse, CallError> {
        let name = options
            .operation()
            .map(str::to_string)
            .unwrap_or_else(|| request.url().path().to_string());

        let mut span = self.tracer.start_span(&name, options.parent_span());
        if let Err(e) = self
            .tracer
            .inject(span.context(), request.headers_mut())
        {
            span.record_outcome(None, Some(&e.to_string()));
            span.finish();
            return Err(CallError::TraceInjection(e.to_string()));
        }

        let result = self
            .inner
            .execute(request, options)
            .instrument(span.tracing_span())
            .await;
        match &result {
            Ok(response) => span.record_outcome(Some(response.status()), None),
            Err(e) => span.record_outcome(None, Some(&e.to_string())),
        }
        span.finish();
        result
    }
}
