//! Error types for the request pipeline and generated clients

use thiserror::Error;

use crate::runtime::validation::ValidationError;

/// Failures raised while moving bytes to and from the remote service.
///
/// These pass through every decorator unchanged.
#[derive(Error, Debug)]
pub enum TransportError {
    /// The HTTP client failed to send the request or read the response
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Connection-level failure reported by a non-reqwest executor
    #[error("connection failed: {0}")]
    Connection(String),

    /// The caller-supplied deadline elapsed before the call completed
    #[error("deadline exceeded")]
    DeadlineExceeded,

    /// The caller cancelled the call
    #[error("call cancelled")]
    Cancelled,
}

/// Why a circuit refused to run a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The circuit is open and the sleep window has not elapsed
    Open,
    /// The circuit is half-open and its single trial request is still running
    TrialInFlight,
    /// Too many requests are already in flight on this circuit
    MaxConcurrency,
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rejection::Open => write!(f, "circuit open"),
            Rejection::TrialInFlight => write!(f, "trial request in flight"),
            Rejection::MaxConcurrency => write!(f, "max concurrency"),
        }
    }
}

/// Errors returned by an [`Executor`](crate::runtime::Executor) chain
#[derive(Error, Debug)]
pub enum CallError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Fast-fail from a circuit breaker; the inner chain was not invoked
    #[error("circuit '{circuit}' rejected the call: {reason}")]
    CircuitOpen { circuit: String, reason: Rejection },

    /// The tracer could not write trace context into the outbound headers
    #[error("failed to inject trace context: {0}")]
    TraceInjection(String),

    /// The request could not be built (bad URL, bad header value, ...)
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl CallError {
    /// True for circuit-breaker fast-fails
    pub fn is_circuit_open(&self) -> bool {
        matches!(self, CallError::CircuitOpen { .. })
    }

    /// True when the caller's deadline expired
    pub fn is_deadline_exceeded(&self) -> bool {
        matches!(self, CallError::Transport(TransportError::DeadlineExceeded))
    }

    /// True when the caller cancelled the call
    pub fn is_cancelled(&self) -> bool {
        matches!(self, CallError::Transport(TransportError::Cancelled))
    }
}

/// Error returned by a generated client method
///
/// `E` is the operation's generated error enum.
#[derive(Error, Debug)]
pub enum ClientError<E>
where
    E: std::error::Error + 'static,
{
    /// `validate()` rejected the input before anything was sent
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The pipeline failed before a response was received
    #[error(transparent)]
    Call(#[from] CallError),

    /// The request body could not be encoded
    #[error("failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),

    /// The service answered with an error-shaped response
    #[error("{0}")]
    Response(E),
}
