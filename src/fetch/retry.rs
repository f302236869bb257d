//! Linear-backoff retry for single search attempts

use std::fmt::Display;
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

/// Retry policy with linearly growing backoff
///
/// After failed attempt `n` (1-based) the policy sleeps `backoff_unit * n`
/// before trying again: 2s, 4s, ... for the default unit. Every failure is
/// treated the same way; there is no notion of a permanent error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff_unit: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff_unit: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff_unit,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn backoff_unit(&self) -> Duration {
        self.backoff_unit
    }

    /// Delay applied after the given failed attempt (1-based)
    pub fn backoff_after(&self, attempt: u32) -> Duration {
        self.backoff_unit.saturating_mul(attempt)
    }

    /// Runs `operation` until it succeeds or all attempts are used
    ///
    /// Returns `None` once every attempt has failed.
    pub fn run<T, E, F>(&self, mut operation: F) -> Option<T>
    where
        F: FnMut(u32) -> Result<T, E>,
        E: Display,
    {
        for attempt in 1..=self.max_attempts {
            match operation(attempt) {
                Ok(value) => {
                    if attempt > 1 {
                        debug!("Request succeeded on attempt {}", attempt);
                    }
                    return Some(value);
                }
                Err(err) => {
                    warn!(
                        "Attempt {}/{} failed: {}",
                        attempt, self.max_attempts, err
                    );
                    if attempt < self.max_attempts {
                        let backoff = self.backoff_after(attempt);
                        debug!("Retrying in {:?}", backoff);
                        thread::sleep(backoff);
                    }
                }
            }
        }

        warn!("Giving up after {} attempts", self.max_attempts);
        None
    }
}
