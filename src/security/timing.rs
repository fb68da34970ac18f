//! Timing attack protection utilities
//!
//! Login must take the same minimum wall-clock time whether the email is
//! unknown or the password is wrong, so response timing leaks neither.

use std::time::{Duration, Instant};

use crate::constants::MIN_AUTH_DURATION_MS;

/// Add artificial delay so authentication outcomes take a minimum time
pub async fn add_auth_delay(start_time: Instant, min_duration: Duration) {
    let elapsed = start_time.elapsed();
    if elapsed < min_duration {
        tokio::time::sleep(min_duration - elapsed).await;
    }
}

/// Authentication timing helper
pub struct AuthTimer {
    start: Instant,
    min_duration: Duration,
}

impl AuthTimer {
    /// Create a new auth timer with minimum duration
    pub fn new(min_duration: Duration) -> Self {
        Self {
            start: Instant::now(),
            min_duration,
        }
    }

    /// Create with the configured default minimum duration
    pub fn start() -> Self {
        Self::new(Duration::from_millis(MIN_AUTH_DURATION_MS))
    }

    /// Wait until minimum duration has elapsed
    pub async fn wait(self) {
        add_auth_delay(self.start, self.min_duration).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_timer_enforces_minimum() {
        let timer = AuthTimer::new(Duration::from_millis(30));
        let begin = Instant::now();
        timer.wait().await;
        assert!(begin.elapsed() >= Duration::from_millis(30));
    }

    #[tokio::test]
    async fn test_timer_does_not_stack_after_slow_work() {
        let timer = AuthTimer::new(Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(20)).await;
        let begin = Instant::now();
        timer.wait().await;
        // Already past the minimum; wait returns promptly
        assert!(begin.elapsed() < Duration::from_millis(10));
    }
}
