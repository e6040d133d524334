use std::time::Duration;
use tracing::trace;

/// Fixed-delay pacing for outbound API calls. Both GitHub and OpenAI are
/// called sequentially, so a plain sleep before each request is enough to
/// stay under their rate limits.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    delay: Duration,
}

impl RateLimiter {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// A limiter that never sleeps, for tests.
    #[cfg(test)]
    pub fn disabled() -> Self {
        Self { delay: Duration::ZERO }
    }

    /// Wait the configured delay before the next outbound call.
    pub async fn pause(&self) {
        if !self.delay.is_zero() {
            trace!(delay_ms = self.delay.as_millis() as u64, "pacing delay");
            tokio::time::sleep(self.delay).await;
        }
    }

    /// Longer wait used when a collaborator signals a rate limit. A disabled
    /// limiter skips this too, so tests and dry runs never sleep.
    pub async fn backoff(&self, duration: Duration) {
        if !self.delay.is_zero() {
            trace!(backoff_ms = duration.as_millis() as u64, "rate-limit backoff");
            tokio::time::sleep(duration).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_limiter_returns_immediately() {
        let limiter = RateLimiter::disabled();
        let start = std::time::Instant::now();
        limiter.pause().await;
        assert!(start.elapsed() < Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_pause_waits_configured_delay() {
        tokio::time::pause();
        let limiter = RateLimiter::new(Duration::from_secs(2));
        let start = tokio::time::Instant::now();
        limiter.pause().await;
        assert!(start.elapsed() >= Duration::from_secs(2));
    }
}
