//! Client-side pacing for the news API, which tolerates roughly one
//! call per minute. A stale per-symbol response is always preferred
//! over blocking the pipeline on a backoff sleep.

use std::collections::HashMap;
use std::sync::{Mutex, RwLock};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_secs(60);
pub const DEFAULT_BACKOFF_MULTIPLIER: u32 = 2;
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Outcome of a pacing check.
pub enum RateLimitDecision<T> {
    /// Caller may hit the API now.
    Proceed,
    /// Caller should reuse this previously recorded response.
    UseCached(T),
}

struct PacerState {
    last_call: Option<Instant>,
    retry_count: u32,
}

pub struct RateLimiter<T> {
    state: Mutex<PacerState>,
    per_symbol: RwLock<HashMap<String, T>>,
    min_interval: Duration,
    backoff_multiplier: u32,
    max_retries: u32,
}

impl<T: Clone> RateLimiter<T> {
    pub fn new() -> Self {
        Self::with_settings(
            DEFAULT_MIN_INTERVAL,
            DEFAULT_BACKOFF_MULTIPLIER,
            DEFAULT_MAX_RETRIES,
        )
    }

    pub fn with_settings(
        min_interval: Duration,
        backoff_multiplier: u32,
        max_retries: u32,
    ) -> Self {
        Self {
            state: Mutex::new(PacerState {
                last_call: None,
                retry_count: 0,
            }),
            per_symbol: RwLock::new(HashMap::new()),
            min_interval,
            backoff_multiplier,
            max_retries,
        }
    }

    /// Decide whether a call for `symbol` may go out. Inside the
    /// minimum interval this prefers a recorded response; without one
    /// it sleeps out the exponential backoff before proceeding.
    pub async fn acquire(&self, symbol: &str) -> RateLimitDecision<T> {
        let wait_for = {
            let mut state = self.lock_state();
            let elapsed = state.last_call.map(|at| at.elapsed());

            match elapsed {
                Some(elapsed) if elapsed < self.min_interval => {
                    if let Some(cached) = self.recorded(symbol) {
                        debug!(%symbol, "rate limited, using recorded response");
                        return RateLimitDecision::UseCached(cached);
                    }

                    let backoff = self
                        .min_interval
                        .saturating_mul(self.backoff_multiplier.saturating_pow(state.retry_count));
                    if state.retry_count < self.max_retries {
                        state.retry_count += 1;
                    }
                    warn!(%symbol, backoff_secs = backoff.as_secs_f64(), "rate limited, backing off");
                    Some(backoff.saturating_sub(elapsed))
                }
                _ => {
                    state.retry_count = 0;
                    None
                }
            }
        };

        if let Some(wait_for) = wait_for {
            tokio::time::sleep(wait_for).await;
        }

        self.lock_state().last_call = Some(Instant::now());
        RateLimitDecision::Proceed
    }

    /// Record the latest successful response for `symbol` so later
    /// rate-limited callers can reuse it.
    pub fn record(&self, symbol: &str, value: T) {
        let mut per_symbol = match self.per_symbol.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        per_symbol.insert(symbol.to_string(), value);
    }

    pub fn recorded(&self, symbol: &str) -> Option<T> {
        let per_symbol = match self.per_symbol.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        per_symbol.get(symbol).cloned()
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, PacerState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<T: Clone> Default for RateLimiter<T> {
    fn default() -> Self {
        Self::new()
    }
}
