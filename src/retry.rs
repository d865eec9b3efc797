//! Bounded retry with a fixed delay between attempts

use std::thread;
use std::time::Duration;

/// How many times to retry a failing operation and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    /// One retry after `delay`
    pub const fn once_after(delay: Duration) -> Self {
        Self {
            max_retries: 1,
            delay,
        }
    }

    /// Run `op` until it succeeds or the retries are used up.
    ///
    /// `op` receives the zero-based attempt number, so callers can vary the
    /// attempt (a longer timeout on the retry, for example). `on_retry` is
    /// called with the failed attempt number and its error before sleeping.
    /// The error of the last attempt is returned.
    pub fn run<T, E, F, R>(&self, mut op: F, mut on_retry: R) -> Result<T, E>
    where
        F: FnMut(u32) -> Result<T, E>,
        R: FnMut(u32, &E),
    {
        let mut attempt = 0;
        loop {
            match op(attempt) {
                Ok(value) => return Ok(value),
                Err(err) if attempt < self.max_retries => {
                    on_retry(attempt, &err);
                    if !self.delay.is_zero() {
                        thread::sleep(self.delay);
                    }
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::once_after(Duration::from_secs(2))
    }
}
