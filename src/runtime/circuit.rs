//! Named circuit breakers, their registry, and the breaker decorator
//!
//! A circuit tracks outcomes over a rolling window. Once the window holds at
//! least `request_volume_threshold` outcomes and the error percentage exceeds
//! `error_percent_threshold`, the circuit opens and fast-fails every call.
//! After `sleep_window` one trial call is admitted; its outcome closes or
//! re-opens the circuit.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use crate::runtime::errors::{CallError, Rejection, TransportError};
use crate::runtime::executor::Executor;
use crate::runtime::request::{CallOptions, HttpRequest, HttpResponse};

/// Thresholds for one circuit
#[derive(Debug, Clone, PartialEq)]
pub struct CircuitSettings {
    /// Calls allowed in flight at once before new ones are rejected
    pub max_concurrent_requests: usize,
    /// Outcomes needed in the rolling window before health is evaluated
    pub request_volume_threshold: u32,
    /// Error percentage (0-100) above which the circuit opens
    pub error_percent_threshold: u32,
    /// How long an open circuit waits before admitting a trial call
    pub sleep_window: Duration,
    /// Age after which outcomes drop out of the health calculation
    pub rolling_window: Duration,
    /// Never reject; transitions and metrics are still recorded
    pub debug: bool,
}

impl Default for CircuitSettings {
    fn default() -> Self {
        Self {
            max_concurrent_requests: 100,
            request_volume_threshold: 20,
            error_percent_threshold: 90,
            sleep_window: Duration::from_secs(5),
            rolling_window: Duration::from_secs(10),
            debug: false,
        }
    }
}

impl CircuitSettings {
    pub fn with_max_concurrent_requests(mut self, max: usize) -> Self {
        self.max_concurrent_requests = max;
        self
    }

    pub fn with_request_volume_threshold(mut self, volume: u32) -> Self {
        self.request_volume_threshold = volume;
        self
    }

    pub fn with_error_percent_threshold(mut self, percent: u32) -> Self {
        self.error_percent_threshold = percent.min(100);
        self
    }

    pub fn with_sleep_window(mut self, window: Duration) -> Self {
        self.sleep_window = window;
        self
    }

    pub fn with_rolling_window(mut self, window: Duration) -> Self {
        self.rolling_window = window;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

/// Observable circuit state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

impl std::fmt::Display for CircuitState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CircuitState::Closed => write!(f, "closed"),
            CircuitState::Open => write!(f, "open"),
            CircuitState::HalfOpen => write!(f, "half-open"),
        }
    }
}

/// Point-in-time view of a circuit's counters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CircuitMetrics {
    pub state: CircuitState,
    pub requests: u32,
    pub errors: u32,
    pub in_flight: usize,
    pub rejected: u64,
}

#[derive(Debug)]
enum Phase {
    Closed,
    Open { since: Instant },
    HalfOpen { trial_in_flight: bool },
}

impl Phase {
    fn state(&self) -> CircuitState {
        match self {
            Phase::Closed => CircuitState::Closed,
            Phase::Open { .. } => CircuitState::Open,
            Phase::HalfOpen { .. } => CircuitState::HalfOpen,
        }
    }
}

#[derive(Debug)]
struct Health {
    phase: Phase,
    window: VecDeque<(Instant, bool)>,
}

impl Health {
    fn prune(&mut self, now: Instant, rolling_window: Duration) {
        while let Some((at, _)) = self.window.front() {
            if now.duration_since(*at) > rolling_window {
                self.window.pop_front();
            } else {
                break;
            }
        }
    }

    fn counts(&self) -> (u32, u32) {
        let requests = self.window.len() as u32;
        let errors = self.window.iter().filter(|(_, ok)| !ok).count() as u32;
        (requests, errors)
    }
}

/// One named circuit
#[derive(Debug)]
pub struct Circuit {
    name: String,
    settings: CircuitSettings,
    health: Mutex<Health>,
    in_flight: AtomicUsize,
    rejected: AtomicU64,
}

impl Circuit {
    pub fn new(name: impl Into<String>, settings: CircuitSettings) -> Self {
        Self {
            name: name.into(),
            settings,
            health: Mutex::new(Health {
                phase: Phase::Closed,
                window: VecDeque::new(),
            }),
            in_flight: AtomicUsize::new(0),
            rejected: AtomicU64::new(0),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn settings(&self) -> &CircuitSettings {
        &self.settings
    }

    fn health(&self) -> MutexGuard<'_, Health> {
        self.health.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> CircuitState {
        self.health().phase.state()
    }

    pub fn metrics(&self) -> CircuitMetrics {
        let mut health = self.health();
        health.prune(Instant::now(), self.settings.rolling_window);
        let (requests, errors) = health.counts();
        CircuitMetrics {
            state: health.phase.state(),
            requests,
            errors,
            in_flight: self.in_flight.load(Ordering::SeqCst),
            rejected: self.rejected.load(Ordering::SeqCst),
        }
    }

    /// Ask to run one call. The permit must be given the call's outcome.
    pub fn try_acquire(self: &Arc<Self>) -> Result<CircuitPermit, Rejection> {
        let max = self.settings.max_concurrent_requests;
        let reserved = self
            .in_flight
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
                (n < max).then_some(n + 1)
            })
            .is_ok();
        if !reserved {
            self.note_rejection(Rejection::MaxConcurrency)?;
            self.in_flight.fetch_add(1, Ordering::SeqCst);
        }
        let mut permit = CircuitPermit {
            circuit: Arc::clone(self),
            trial: false,
            settled: false,
        };

        let mut health = self.health();
        let verdict = match health.phase {
            Phase::Closed => Ok(()),
            Phase::Open { since } if since.elapsed() >= self.settings.sleep_window => {
                self.transition(&mut health, Phase::HalfOpen {
                    trial_in_flight: true,
                });
                permit.trial = true;
                Ok(())
            }
            Phase::Open { .. } => Err(Rejection::Open),
            Phase::HalfOpen {
                trial_in_flight: true,
            } => Err(Rejection::TrialInFlight),
            Phase::HalfOpen {
                trial_in_flight: false,
            } => {
                health.phase = Phase::HalfOpen {
                    trial_in_flight: true,
                };
                permit.trial = true;
                Ok(())
            }
        };
        drop(health);

        if let Err(reason) = verdict {
            self.note_rejection(reason)?;
        }
        Ok(permit)
    }

    /// Counts a rejection. In debug mode the call still goes ahead.
    fn note_rejection(&self, reason: Rejection) -> Result<(), Rejection> {
        self.rejected.fetch_add(1, Ordering::SeqCst);
        if self.settings.debug {
            tracing::debug!(circuit = %self.name, %reason, "circuit would reject call (debug mode)");
            return Ok(());
        }
        tracing::warn!(circuit = %self.name, %reason, "circuit rejected call");
        Err(reason)
    }

    fn record(&self, trial: bool, success: bool) {
        let now = Instant::now();
        let mut health = self.health();

        if trial {
            let next = if success {
                health.window.clear();
                Phase::Closed
            } else {
                Phase::Open { since: now }
            };
            self.transition(&mut health, next);
            return;
        }

        health.window.push_back((now, success));
        health.prune(now, self.settings.rolling_window);

        if matches!(health.phase, Phase::Closed) {
            let (requests, errors) = health.counts();
            if requests >= self.settings.request_volume_threshold
                && requests > 0
                && u64::from(errors) * 100
                    > u64::from(self.settings.error_percent_threshold) * u64::from(requests)
            {
                self.transition(&mut health, Phase::Open { since: now });
            }
        }
    }

    fn release_trial(&self) {
        let mut health = self.health();
        if let Phase::HalfOpen { trial_in_flight } = &mut health.phase {
            *trial_in_flight = false;
        }
    }

    fn transition(&self, health: &mut Health, next: Phase) {
        let from = health.phase.state();
        let to = next.state();
        health.phase = next;
        if from == to {
            return;
        }
        let (requests, errors) = health.counts();
        match to {
            CircuitState::Open => tracing::warn!(
                circuit = %self.name, %from, %to, requests, errors,
                "circuit state changed"
            ),
            _ => tracing::info!(circuit = %self.name, %from, %to, "circuit state changed"),
        }
    }
}

/// Admission ticket for one call through a [`Circuit`]
#[derive(Debug)]
pub struct CircuitPermit {
    circuit: Arc<Circuit>,
    trial: bool,
    settled: bool,
}

impl CircuitPermit {
    pub fn is_trial(&self) -> bool {
        self.trial
    }

    /// Record the call outcome against the circuit
    pub fn record(mut self, success: bool) {
        self.settled = true;
        self.circuit.record(self.trial, success);
    }
}

impl Drop for CircuitPermit {
    fn drop(&mut self) {
        self.circuit.in_flight.fetch_sub(1, Ordering::SeqCst);
        if !self.settled && self.trial {
            self.circuit.release_trial();
        }
    }
}

/// Circuit name for a target: service name plus a hash of the base URL
pub fn circuit_name(service: &str, base_url: &str) -> String {
    let digest = Sha256::digest(base_url.as_bytes());
    let hash = hex::encode(digest);
    format!("{service}-{}", &hash[..12])
}

/// Circuits indexed by name, owned by a client instance
#[derive(Debug, Default)]
pub struct CircuitRegistry {
    circuits: Mutex<HashMap<String, Arc<Circuit>>>,
}

impl CircuitRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn circuits(&self) -> MutexGuard<'_, HashMap<String, Arc<Circuit>>> {
        self.circuits.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Existing circuit for `name`, or a new one with `settings`
    pub fn get_or_create(&self, name: &str, settings: &CircuitSettings) -> Arc<Circuit> {
        let mut circuits = self.circuits();
        Arc::clone(
            circuits
                .entry(name.to_string())
                .or_insert_with(|| Arc::new(Circuit::new(name, settings.clone()))),
        )
    }

    pub fn get(&self, name: &str) -> Option<Arc<Circuit>> {
        self.circuits().get(name).cloned()
    }

    /// Sorted circuit names
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.circuits().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn metrics(&self) -> Vec<(String, CircuitMetrics)> {
        let circuits: Vec<Arc<Circuit>> = self.circuits().values().cloned().collect();
        let mut metrics: Vec<(String, CircuitMetrics)> = circuits
            .iter()
            .map(|c| (c.name().to_string(), c.metrics()))
            .collect();
        metrics.sort_by(|a, b| a.0.cmp(&b.0));
        metrics
    }
}

/// Outermost decorator: runs the inner chain inside a named circuit
pub struct CircuitBreakerDecorator<E> {
    inner: E,
    circuit: Arc<Circuit>,
}

impl<E: Executor> CircuitBreakerDecorator<E> {
    pub fn new(inner: E, circuit: Arc<Circuit>) -> Self {
        Self { inner, circuit }
    }

    pub fn circuit(&self) -> &Arc<Circuit> {
        &self.circuit
    }
}

#[async_trait]
impl<E: Executor> Executor for CircuitBreakerDecorator<E> {
    async fn execute(
        &self,
        request: HttpRequest,
        options: &CallOptions,
    ) -> Result<HttpResponse, CallError> {
        let permit = self
            .circuit
            .try_acquire()
            .map_err(|reason| CallError::CircuitOpen {
                circuit: self.circuit.name().to_string(),
                reason,
            })?;

        let result = self.inner.execute(request, options).await;
        match &result {
            Err(CallError::Transport(TransportError::Cancelled)) => drop(permit),
            Err(_) => permit.record(false),
            Ok(response) => permit.record(!response.is_server_error()),
        }
        result
    }
}
