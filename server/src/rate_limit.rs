//! In-memory login throttling.
//!
//! DESIGN
//! ======
//! Sliding-window counters backed by `HashMap<String, VecDeque<Instant>>`,
//! keyed by normalized email. Only failed attempts are recorded; a successful
//! login clears the key.
//!
//! Keys come from unauthenticated input, so a key is dropped as soon as its
//! window empties and every recorded failure sweeps keys that went stale.
//!
//! TRADE-OFFS
//! ==========
//! State is per-process. Several server instances each allow the full budget.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ThrottleError {
    #[error("too many failed login attempts, retry in {retry_after_secs}s")]
    TooManyAttempts { retry_after_secs: u64 },
}

#[derive(Clone)]
pub struct LoginThrottle {
    failures: Arc<Mutex<HashMap<String, VecDeque<Instant>>>>,
    max_attempts: usize,
    window: Duration,
}

impl LoginThrottle {
    #[must_use]
    pub fn new(max_attempts: usize, window: Duration) -> Self {
        Self { failures: Arc::new(Mutex::new(HashMap::new())), max_attempts, window }
    }

    /// Reject the attempt if `key` already used up its failure budget.
    ///
    /// # Errors
    ///
    /// Returns [`ThrottleError::TooManyAttempts`] with the seconds until the
    /// oldest failure leaves the window.
    pub fn check(&self, key: &str) -> Result<(), ThrottleError> {
        self.check_at(key, Instant::now())
    }

    fn check_at(&self, key: &str, now: Instant) -> Result<(), ThrottleError> {
        let mut failures = self.failures.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(deque) = failures.get_mut(key) else {
            return Ok(());
        };
        prune_window(deque, now, self.window);
        if deque.is_empty() {
            failures.remove(key);
            return Ok(());
        }
        if deque.len() < self.max_attempts {
            return Ok(());
        }
        let oldest = deque.front().copied().unwrap_or(now);
        let remaining = self.window.saturating_sub(now.duration_since(oldest));
        Err(ThrottleError::TooManyAttempts { retry_after_secs: remaining.as_secs().max(1) })
    }

    pub fn record_failure(&self, key: &str) {
        self.record_failure_at(key, Instant::now());
    }

    fn record_failure_at(&self, key: &str, now: Instant) {
        let mut failures = self.failures.lock().unwrap_or_else(PoisonError::into_inner);
        failures.retain(|_, deque| {
            prune_window(deque, now, self.window);
            !deque.is_empty()
        });
        failures.entry(key.to_owned()).or_default().push_back(now);
    }

    pub fn reset(&self, key: &str) {
        self.failures.lock().unwrap_or_else(PoisonError::into_inner).remove(key);
    }

    #[cfg(test)]
    fn tracked_keys(&self) -> usize {
        self.failures.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

// =============================================================================
// HELPERS
// =============================================================================

fn prune_window(deque: &mut VecDeque<Instant>, now: Instant, window: Duration) {
    while let Some(&front) = deque.front() {
        if now.duration_since(front) >= window {
            deque.pop_front();
        } else {
            break;
        }
    }
}

#[cfg(test)]
#[path = "rate_limit_test.rs"]
mod tests;
