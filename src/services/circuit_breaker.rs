//! Circuit breaker pattern for failure detection and recovery.
//!
//! Wraps a backing store so that a run of transient failures stops further
//! lookups from reaching it for a while. Callers get
//! [`StoreError::CircuitOpen`] immediately instead of waiting on a store
//! that is known to be down.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;

use crate::domain::errors::{StoreError, StoreResult};
use crate::domain::models::CircuitBreakerSettings;
use crate::domain::ports::BackingStore;

/// Upper bound on the open timeout (one year).
const MAX_OPEN_TIMEOUT_SECS: i64 = 365 * 24 * 60 * 60;

/// Configuration for circuit breakers.
#[derive(Debug, Clone)]
pub struct CircuitBreakerConfig {
    /// Consecutive failures before opening the circuit.
    pub failure_threshold: u32,
    /// Duration to keep circuit open before trying half-open.
    pub open_timeout: Duration,
    /// Number of successful calls in half-open state to close circuit.
    pub success_threshold: u32,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self::from(&CircuitBreakerSettings::default())
    }
}

impl From<&CircuitBreakerSettings> for CircuitBreakerConfig {
    fn from(settings: &CircuitBreakerSettings) -> Self {
        Self {
            failure_threshold: settings.failure_threshold.max(1),
            open_timeout: Duration::seconds(
                i64::try_from(settings.open_timeout_secs)
                    .unwrap_or(MAX_OPEN_TIMEOUT_SECS)
                    .min(MAX_OPEN_TIMEOUT_SECS),
            ),
            success_threshold: settings.success_threshold.max(1),
        }
    }
}

impl CircuitBreakerConfig {
    /// Create a more sensitive circuit breaker.
    pub fn sensitive() -> Self {
        Self {
            failure_threshold: 2,
            open_timeout: Duration::seconds(10),
            success_threshold: 1,
        }
    }
}

/// State of a circuit breaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    /// Circuit is closed, requests flow normally.
    Closed,
    /// Circuit is open, requests are blocked.
    Open,
    /// Circuit is testing if the store has recovered.
    HalfOpen,
}

impl CircuitState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::Open => "open",
            Self::HalfOpen => "half_open",
        }
    }
}

/// Individual circuit breaker state.
#[derive(Debug, Clone)]
pub struct CircuitBreaker {
    /// Current state.
    pub state: CircuitState,
    /// Failures since the last success.
    pub consecutive_failures: u32,
    /// Successful calls in half-open state.
    pub half_open_successes: u32,
    /// When the circuit was opened.
    pub opened_at: Option<DateTime<Utc>>,
    /// When the outstanding half-open trial was admitted.
    trial_started_at: Option<DateTime<Utc>>,
    /// Total times circuit opened.
    pub open_count: u32,
}

impl Default for CircuitBreaker {
    fn default() -> Self {
        Self::new()
    }
}

impl CircuitBreaker {
    /// Create a new, closed circuit breaker.
    pub fn new() -> Self {
        Self {
            state: CircuitState::Closed,
            consecutive_failures: 0,
            half_open_successes: 0,
            opened_at: None,
            trial_started_at: None,
            open_count: 0,
        }
    }

    /// Record a failure.
    pub fn record_failure(&mut self, config: &CircuitBreakerConfig) {
        self.consecutive_failures += 1;

        match self.state {
            CircuitState::Closed if self.consecutive_failures >= config.failure_threshold => {
                self.open();
            }
            // Any failure in half-open reopens the circuit
            CircuitState::HalfOpen => self.open(),
            _ => {}
        }
    }

    /// Record a success.
    pub fn record_success(&mut self, config: &CircuitBreakerConfig) {
        self.consecutive_failures = 0;
        if self.state == CircuitState::HalfOpen {
            self.half_open_successes += 1;
            if self.half_open_successes >= config.success_threshold {
                self.close();
            }
        }
    }

    fn open(&mut self) {
        self.state = CircuitState::Open;
        self.opened_at = Some(Utc::now());
        self.trial_started_at = None;
        self.half_open_successes = 0;
        self.open_count += 1;
    }

    fn close(&mut self) {
        self.state = CircuitState::Closed;
        self.opened_at = None;
        self.trial_started_at = None;
        self.half_open_successes = 0;
        self.consecutive_failures = 0;
    }

    fn half_open(&mut self) {
        self.state = CircuitState::HalfOpen;
        self.half_open_successes = 0;
    }

    /// When a rejected request could next be admitted.
    ///
    /// While open this is the end of the open timeout; while half-open it is
    /// when an unfinished trial stops holding the trial slot.
    pub fn retry_after(&self, config: &CircuitBreakerConfig) -> Option<DateTime<Utc>> {
        match self.state {
            CircuitState::Closed => None,
            CircuitState::Open => self.opened_at.map(|opened| opened + config.open_timeout),
            CircuitState::HalfOpen => self.trial_started_at.map(|t| t + config.open_timeout),
        }
    }

    fn trial_slot_free(&self, config: &CircuitBreakerConfig) -> bool {
        // A trial whose outcome never arrives (the caller was cancelled)
        // stops holding the slot after the open timeout.
        self.trial_started_at
            .map_or(true, |started| Utc::now() >= started + config.open_timeout)
    }

    /// Check if the circuit allows a request.
    ///
    /// Half-open admits one trial request at a time; the trial slot is
    /// taken here and released by [`finish_trial`](Self::finish_trial).
    pub fn allows(&mut self, config: &CircuitBreakerConfig) -> bool {
        match self.state {
            CircuitState::Closed => true,
            CircuitState::Open => match self.retry_after(config) {
                Some(retry_after) if Utc::now() >= retry_after => {
                    self.half_open();
                    self.trial_started_at = Some(Utc::now());
                    true
                }
                _ => false,
            },
            CircuitState::HalfOpen => {
                if self.trial_slot_free(config) {
                    self.trial_started_at = Some(Utc::now());
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Release the half-open trial slot.
    pub fn finish_trial(&mut self) {
        self.trial_started_at = None;
    }
}

/// Backing store decorator that fails fast while the store is down.
///
/// Only transient errors count as failures. A store answering "not found"
/// is healthy.
pub struct CircuitBreakerStore<S> {
    inner: S,
    config: CircuitBreakerConfig,
    breaker: Mutex<CircuitBreaker>,
}

impl<S: BackingStore> CircuitBreakerStore<S> {
    pub fn new(inner: S, config: CircuitBreakerConfig) -> Self {
        Self {
            inner,
            config,
            breaker: Mutex::new(CircuitBreaker::new()),
        }
    }

    pub async fn state(&self) -> CircuitState {
        self.breaker.lock().await.state
    }

    /// Admit a request or reject it with `CircuitOpen`.
    ///
    /// Returns whether the admitted request is the half-open trial.
    async fn admit(&self) -> StoreResult<bool> {
        let mut breaker = self.breaker.lock().await;
        let was = breaker.state;
        if breaker.allows(&self.config) {
            let trial = breaker.state == CircuitState::HalfOpen;
            if was == CircuitState::Open {
                tracing::info!("circuit half-open, sending trial store request");
            }
            return Ok(trial);
        }
        let retry_after = breaker
            .retry_after(&self.config)
            .unwrap_or_else(|| Utc::now() + self.config.open_timeout);
        Err(StoreError::CircuitOpen { retry_after })
    }

    async fn record(&self, result: &StoreResult<String>, trial: bool) {
        let mut breaker = self.breaker.lock().await;
        let before = breaker.state;

        if trial {
            breaker.finish_trial();
        }
        match result {
            Err(e) if e.is_transient() => breaker.record_failure(&self.config),
            _ => breaker.record_success(&self.config),
        }

        if breaker.state != before {
            match breaker.state {
                CircuitState::Open => tracing::warn!(
                    from = before.as_str(),
                    open_count = breaker.open_count,
                    "store circuit opened"
                ),
                state => tracing::info!(from = before.as_str(), to = state.as_str(), "store circuit state changed"),
            }
        }
    }
}

#[async_trait]
impl<S: BackingStore> BackingStore for CircuitBreakerStore<S> {
    async fn lookup(&self, id: &str) -> StoreResult<String> {
        let trial = self.admit().await?;
        let result = self.inner.lookup(id).await;
        self.record(&result, trial).await;
        result
    }
}
