//! Fail-fast guard for the remote API call budget.
//!
//! The guard never waits and never retries. Once the budget is exhausted
//! and the reset time lies in the future, every check fails with
//! `RateLimited` until a fresher response (or the clock) says otherwise.

use std::sync::Mutex;

use chrono::Utc;
use releasefs_core::Error;

/// Header carrying the remaining call budget.
pub const REMAINING_HEADER: &str = "x-ratelimit-remaining";
/// Header carrying the Unix time the budget resets at.
pub const RESET_HEADER: &str = "x-ratelimit-reset";

/// Remaining budget and reset time, always read and written as a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateState {
    /// `-1` until the first response is seen.
    pub remaining: i64,
    /// Unix seconds; `0` until the first response is seen.
    pub reset_at: i64,
}

impl Default for RateState {
    fn default() -> Self {
        Self {
            remaining: -1,
            reset_at: 0,
        }
    }
}

/// Shared rate-limit cell for one driver instance.
#[derive(Debug, Default)]
pub struct RateGuard {
    state: Mutex<RateState>,
}

impl RateGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether an outgoing call is allowed right now.
    pub fn check(&self) -> Result<(), Error> {
        self.check_at(Utc::now().timestamp())
    }

    /// Check against an explicit clock reading.
    pub fn check_at(&self, now: i64) -> Result<(), Error> {
        let state = self.snapshot();
        if state.remaining == 0 && state.reset_at != 0 && now < state.reset_at {
            return Err(Error::RateLimited {
                reset_at: state.reset_at,
            });
        }
        Ok(())
    }

    /// Record the budget reported by a successful response.
    ///
    /// Last write wins; both fields change together.
    pub fn update(&self, remaining: i64, reset_at: i64) {
        let mut state = self.lock();
        *state = RateState {
            remaining,
            reset_at,
        };
    }

    /// Current budget.
    pub fn snapshot(&self) -> RateState {
        *self.lock()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, RateState> {
        // The state is two integers written in one assignment, so a poisoned
        // lock still holds a consistent pair.
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
