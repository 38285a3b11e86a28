//! Client settings and the assembled execution pipeline
//!
//! The chain is built innermost first and each layer owns the one it wraps:
//!
//! ```text
//! CircuitBreakerDecorator -> RetryDecorator -> TracingDecorator -> BaseExecutor
//! ```
//!
//! The per-call deadline is fixed by [`Pipeline::execute`] before the chain
//! runs and bounds every attempt.

use std::sync::Arc;
use std::time::Duration;

use crate::runtime::circuit::{
    Circuit, CircuitBreakerDecorator, CircuitRegistry, CircuitSettings, circuit_name,
};
use crate::runtime::errors::{CallError, TransportError};
use crate::runtime::executor::{BaseExecutor, Executor};
use crate::runtime::request::{CallOptions, HttpRequest, HttpResponse};
use crate::runtime::retry::{RetryDecorator, RetryPolicy, SingleRetryPolicy};
use crate::runtime::trace::{SpanContext, Tracer, TracingDecorator, W3cTracer};

/// Settings a generated client is constructed with
#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Deadline applied to calls that bring none; zero disables it
    pub timeout: Duration,
    pub retry_policy: Arc<dyn RetryPolicy>,
    pub circuit: CircuitSettings,
    /// Prefix of the circuit name
    pub service_name: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            retry_policy: Arc::new(SingleRetryPolicy::default()),
            circuit: CircuitSettings::default(),
            service_name: "service".to_string(),
        }
    }
}

impl ClientSettings {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry_policy(mut self, policy: impl RetryPolicy + 'static) -> Self {
        self.retry_policy = Arc::new(policy);
        self
    }

    pub fn with_circuit(mut self, circuit: CircuitSettings) -> Self {
        self.circuit = circuit;
        self
    }

    pub fn with_service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = name.into();
        self
    }
}

/// Builder for [`Pipeline`]
pub struct PipelineBuilder {
    base_url: String,
    settings: ClientSettings,
    executor: Option<Box<dyn Executor>>,
    tracer: Option<Arc<dyn Tracer>>,
    registry: Option<Arc<CircuitRegistry>>,
}

impl PipelineBuilder {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            settings: ClientSettings::default(),
            executor: None,
            tracer: None,
            registry: None,
        }
    }

    pub fn settings(mut self, settings: ClientSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Replace the innermost executor (defaults to [`BaseExecutor`])
    pub fn executor(mut self, executor: impl Executor + 'static) -> Self {
        self.executor = Some(Box::new(executor));
        self
    }

    /// Replace the tracer (defaults to [`W3cTracer`])
    pub fn tracer(mut self, tracer: Arc<dyn Tracer>) -> Self {
        self.tracer = Some(tracer);
        self
    }

    /// Share a circuit registry with other pipelines
    pub fn registry(mut self, registry: Arc<CircuitRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn build(self) -> Result<Pipeline, CallError> {
        let base: Box<dyn Executor> = match self.executor {
            Some(executor) => executor,
            None => Box::new(BaseExecutor::with_defaults()?),
        };
        let tracer = self.tracer.unwrap_or_else(|| Arc::new(W3cTracer::new()));
        let registry = self.registry.unwrap_or_default();

        let name = circuit_name(&self.settings.service_name, &self.base_url);
        let circuit = registry.get_or_create(&name, &self.settings.circuit);

        let traced = TracingDecorator::new(base, tracer);
        let retried = RetryDecorator::new(traced, Arc::clone(&self.settings.retry_policy));
        let guarded = CircuitBreakerDecorator::new(retried, Arc::clone(&circuit));

        tracing::debug!(
            base_url = %self.base_url,
            circuit = %name,
            timeout_ms = self.settings.timeout.as_millis() as u64,
            "pipeline built"
        );

        Ok(Pipeline {
            chain: Box::new(guarded),
            circuit,
            registry,
            timeout: self.settings.timeout,
        })
    }
}

/// The assembled decorator chain used by every generated client method
pub struct Pipeline {
    chain: Box<dyn Executor>,
    circuit: Arc<Circuit>,
    registry: Arc<CircuitRegistry>,
    timeout: Duration,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("circuit", &self.circuit.name())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Pipeline {
    pub fn builder(base_url: impl Into<String>) -> PipelineBuilder {
        PipelineBuilder::new(base_url)
    }

    /// Pipeline with default settings over the real HTTP executor
    pub fn new(base_url: &str, settings: ClientSettings) -> Result<Self, CallError> {
        Self::builder(base_url).settings(settings).build()
    }

    pub fn circuit(&self) -> &Arc<Circuit> {
        &self.circuit
    }

    pub fn registry(&self) -> &Arc<CircuitRegistry> {
        &self.registry
    }

    /// Run one logical call through the chain
    ///
    /// Calls without a deadline get the configured default, and calls without
    /// a parent span get a fresh root trace. The deadline and the
    /// cancellation token bound the whole chain, retries included.
    pub async fn execute(
        &self,
        request: HttpRequest,
        options: CallOptions,
    ) -> Result<HttpResponse, CallError> {
        let options = match options.deadline() {
            None if !self.timeout.is_zero() => options.with_timeout(self.timeout),
            _ => options,
        };
        // attempts of one call share a trace even without a caller span
        let options = match options.parent_span() {
            None => options.with_parent_span(SpanContext::new_root()),
            Some(_) => options,
        };
        if options.is_cancelled() {
            return Err(TransportError::Cancelled.into());
        }

        let run = self.chain.execute(request, &options);
        let bounded = async {
            match options.deadline() {
                Some(deadline) => tokio::time::timeout_at(deadline, run)
                    .await
                    .unwrap_or_else(|_| Err(TransportError::DeadlineExceeded.into())),
                None => run.await,
            }
        };

        match options.cancellation() {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => Err(TransportError::Cancelled.into()),
                result = bounded => result,
            },
            None => bounded.await,
        }
    }
}
