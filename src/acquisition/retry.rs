//! Sequential retry with a fixed backoff

use std::time::Duration;

/// Result of a single attempt
#[derive(Debug)]
pub enum AttemptOutcome<T> {
    /// Attempt succeeded; stop retrying
    Done(T),
    /// Transient failure; try again if attempts remain
    Retry(String),
    /// Permanent failure; stop immediately
    Abort(String),
}

/// How many times to run an attempt and how long to wait in between
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    /// Run `attempt` (called with the 1-based attempt number) until it is done,
    /// aborts, or the attempt cap is reached. Sleeps `backoff` between attempts
    /// but not after the last one.
    pub fn run<T>(&self, mut attempt: impl FnMut(u32) -> AttemptOutcome<T>) -> Result<T, String> {
        let mut last_error = String::from("no attempts made");

        for n in 1..=self.max_attempts {
            if n > 1 {
                log::info!("Retry attempt {}/{}...", n, self.max_attempts);
            }

            match attempt(n) {
                AttemptOutcome::Done(value) => return Ok(value),
                AttemptOutcome::Abort(e) => return Err(e),
                AttemptOutcome::Retry(e) => {
                    log::warn!("Attempt {}/{} failed: {}", n, self.max_attempts, e);
                    last_error = e;
                    if n < self.max_attempts && !self.backoff.is_zero() {
                        std::thread::sleep(self.backoff);
                    }
                }
            }
        }

        Err(format!(
            "Incomplete after {} attempts: {}",
            self.max_attempts, last_error
        ))
    }
}
