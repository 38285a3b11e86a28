//! Runtime library linked by generated clients and servers
//!
//! Every generated client method funnels into [`Pipeline::execute`]: a chain
//! of base executor, tracing, retry and circuit breaker, built innermost
//! first. The remaining modules hold the helpers emitted code calls for
//! validation, path building, response dispatch and server-side decoding.

pub mod circuit;
pub mod decode;
pub mod defaults;
pub mod dispatch;
pub mod errors;
pub mod executor;
pub mod path;
pub mod pipeline;
pub mod request;
pub mod retry;
pub mod trace;
pub mod validation;

pub use circuit::{
    Circuit, CircuitBreakerDecorator, CircuitMetrics, CircuitRegistry, CircuitSettings,
    CircuitState,
};
pub use defaults::{BadRequest, InternalError};
pub use errors::{CallError, ClientError, Rejection, TransportError};
pub use executor::{BaseExecutor, Executor};
pub use pipeline::{ClientSettings, Pipeline, PipelineBuilder};
pub use request::{CallOptions, HttpRequest, HttpResponse};
pub use retry::{
    BoundedRetryPolicy, ExponentialRetryPolicy, NoRetryPolicy, RetryDecision, RetryDecorator,
    RetryPolicy, SingleRetryPolicy,
};
pub use trace::{ActiveSpan, SpanContext, Tracer, TracingDecorator, W3cTracer};
pub use validation::ValidationError;

pub use reqwest::Method;
pub use reqwest::header::HeaderMap;

/// Header carrying the version of the generator that emitted the client
pub const VERSION_HEADER: &str = "X-Generator-Version";

/// Header carrying the operation identifier of the call
pub const OPERATION_HEADER: &str = "X-Operation-Id";

/// Version stamped into emitted code
pub const GENERATOR_VERSION: &str = env!("CARGO_PKG_VERSION");
