//! Timing attack protection utilities
//!
//! Login failures for an unknown username return much faster than failures that
//! reach the password comparison. Holding every attempt to a minimum duration hides
//! which of the two happened.

use std::time::{Duration, Instant};

/// Add artificial delay so that an attempt takes at least `min_duration`
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

    /// Wait until minimum duration has elapsed
    pub async fn wait(self) {
        add_auth_delay(self.start, self.min_duration).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_auth_timer() {
        let timer = AuthTimer::new(Duration::from_millis(10));
        let start = Instant::now();
        timer.wait().await;
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(10));
    }

    #[tokio::test]
    async fn test_zero_duration_does_not_wait() {
        let start = Instant::now();
        AuthTimer::new(Duration::ZERO).wait().await;
        assert!(start.elapsed() < Duration::from_millis(50));
    }
}
