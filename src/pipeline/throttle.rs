use std::time::Duration;

/// Fixed pause after every upstream lookup, keeping the run under the API's
/// rate limit. Cache hits never wait.
#[derive(Debug, Clone, Copy)]
pub struct LookupThrottle {
    delay: Duration,
}

impl LookupThrottle {
    pub fn fixed(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn disabled() -> Self {
        Self::fixed(Duration::ZERO)
    }

    pub async fn wait(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn test_fixed_delay_waits() {
        let throttle = LookupThrottle::fixed(Duration::from_millis(200));
        let started = Instant::now();
        throttle.wait().await;
        throttle.wait().await;
        assert!(started.elapsed() >= Duration::from_millis(400));
    }

    #[tokio::test(start_paused = true)]
    async fn test_disabled_does_not_wait() {
        let throttle = LookupThrottle::disabled();
        let started = Instant::now();
        throttle.wait().await;
        assert_eq!(started.elapsed(), Duration::ZERO);
    }
}
