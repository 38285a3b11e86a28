//! Retry policies and the retry decorator
//!
//! A policy only decides; the decorator owns the loop. Attempts are strictly
//! sequential and the caller's deadline keeps running across them.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;

use crate::runtime::errors::{CallError, TransportError};
use crate::runtime::executor::Executor;
use crate::runtime::request::{CallOptions, HttpRequest, HttpResponse};

/// What a policy wants after an attempt completed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryDecision {
    pub should_retry: bool,
    pub attempts_remaining: u32,
    /// Pause before the next attempt
    pub backoff: Duration,
}

impl RetryDecision {
    pub fn stop() -> Self {
        Self {
            should_retry: false,
            attempts_remaining: 0,
            backoff: Duration::ZERO,
        }
    }

    pub fn retry(attempts_remaining: u32, backoff: Duration) -> Self {
        Self {
            should_retry: true,
            attempts_remaining,
            backoff,
        }
    }
}

/// Decides whether a completed attempt should be followed by another one
pub trait RetryPolicy: Send + Sync + std::fmt::Debug {
    /// `attempt` is the 1-based number of the attempt that just completed
    fn decide(&self, outcome: &Result<HttpResponse, CallError>, attempt: u32) -> RetryDecision;
}

/// Outcomes worth another attempt: 5xx responses and send failures.
///
/// Deadline, cancellation, circuit and tracing failures are final.
pub fn is_retryable(outcome: &Result<HttpResponse, CallError>) -> bool {
    match outcome {
        Ok(response) => response.is_server_error(),
        Err(CallError::Transport(TransportError::Request(_)))
        | Err(CallError::Transport(TransportError::Connection(_))) => true,
        Err(_) => false,
    }
}

/// Never retries
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRetryPolicy;

impl RetryPolicy for NoRetryPolicy {
    fn decide(&self, _outcome: &Result<HttpResponse, CallError>, _attempt: u32) -> RetryDecision {
        RetryDecision::stop()
    }
}

/// Caps the total number of attempts, no pause between them
#[derive(Debug, Clone, Copy)]
pub struct BoundedRetryPolicy {
    max_attempts: u32,
}

impl BoundedRetryPolicy {
    /// `max_attempts` counts the first attempt; `0` is treated as `1`
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
        }
    }
}

impl RetryPolicy for BoundedRetryPolicy {
    fn decide(&self, outcome: &Result<HttpResponse, CallError>, attempt: u32) -> RetryDecision {
        let remaining = self.max_attempts.saturating_sub(attempt);
        if remaining == 0 || !is_retryable(outcome) {
            return RetryDecision::stop();
        }
        RetryDecision::retry(remaining, Duration::ZERO)
    }
}

/// One extra attempt after a short pause
#[derive(Debug, Clone, Copy)]
pub struct SingleRetryPolicy {
    backoff: Duration,
}

impl SingleRetryPolicy {
    pub fn new(backoff: Duration) -> Self {
        Self { backoff }
    }
}

impl Default for SingleRetryPolicy {
    fn default() -> Self {
        Self::new(Duration::from_millis(100))
    }
}

impl RetryPolicy for SingleRetryPolicy {
    fn decide(&self, outcome: &Result<HttpResponse, CallError>, attempt: u32) -> RetryDecision {
        if attempt >= 2 || !is_retryable(outcome) {
            return RetryDecision::stop();
        }
        RetryDecision::retry(1, self.backoff)
    }
}

/// Bounded attempts with exponentially growing pauses
#[derive(Debug, Clone, Copy)]
pub struct ExponentialRetryPolicy {
    max_attempts: u32,
    initial: Duration,
    multiplier: u32,
    max_backoff: Duration,
}

impl ExponentialRetryPolicy {
    pub fn new(max_attempts: u32, initial: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial,
            multiplier: 2,
            max_backoff: Duration::from_secs(10),
        }
    }

    pub fn with_multiplier(mut self, multiplier: u32) -> Self {
        self.multiplier = multiplier.max(1);
        self
    }

    pub fn with_max_backoff(mut self, max_backoff: Duration) -> Self {
        self.max_backoff = max_backoff;
        self
    }

    /// Pause after the `attempt`-th attempt
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let factor = self
            .multiplier
            .checked_pow(attempt.saturating_sub(1))
            .unwrap_or(u32::MAX);
        self.initial
            .checked_mul(factor)
            .unwrap_or(self.max_backoff)
            .min(self.max_backoff)
    }
}

impl RetryPolicy for ExponentialRetryPolicy {
    fn decide(&self, outcome: &Result<HttpResponse, CallError>, attempt: u32) -> RetryDecision {
        let remaining = self.max_attempts.saturating_sub(attempt);
        if remaining == 0 || !is_retryable(outcome) {
            return RetryDecision::stop();
        }
        RetryDecision::retry(remaining, self.backoff_for(attempt))
    }
}

/// Replays GET requests according to a [`RetryPolicy`]
///
/// Exhausted budgets return the last outcome untouched.
pub struct RetryDecorator<E> {
    inner: E,
    policy: Arc<dyn RetryPolicy>,
}

impl<E: Executor> RetryDecorator<E> {
    pub fn new(inner: E, policy: Arc<dyn RetryPolicy>) -> Self {
        Self { inner, policy }
    }

    /// Wrap `inner` with the default policy: no retries
    pub fn without_retries(inner: E) -> Self {
        Self::new(inner, Arc::new(NoRetryPolicy))
    }
}

#[async_trait]
impl<E: Executor> Executor for RetryDecorator<E> {
    async fn execute(
        &self,
        request: HttpRequest,
        options: &CallOptions,
    ) -> Result<HttpResponse, CallError> {
        if request.method() != Method::GET {
            return self.inner.execute(request, options).await;
        }

        let mut attempt: u32 = 1;
        loop {
            let outcome = self.inner.execute(request.clone(), options).await;
            let decision = self.policy.decide(&outcome, attempt);
            tracing::debug!(
                operation = options.operation().unwrap_or("-"),
                attempt,
                status = outcome.as_ref().ok().map(HttpResponse::status),
                retry = decision.should_retry,
                attempts_remaining = decision.attempts_remaining,
                "attempt completed"
            );

            if !decision.should_retry || options.is_cancelled() || options.is_expired() {
                return outcome;
            }

            if !decision.backoff.is_zero() {
                let pause = tokio::time::sleep(decision.backoff);
                match options.cancellation() {
                    Some(token) => tokio::select! {
                        _ = token.cancelled() => return outcome,
                        _ = pause => {}
                    },
                    None => pause.await,
                }
                if options.is_expired() {
                    return outcome;
                }
            }
            attempt += 1;
        }
    }
}
