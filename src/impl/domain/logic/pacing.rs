use std::time::Duration;

use async_trait::async_trait;

use crate::config::DEFAULT_PACING_INTERVAL;

/// Delay enforced between two consecutive hand-offs to the messaging channel.
/// Acts as a crude outbound rate limit.
#[async_trait]
pub trait PacingPolicy: Send + Sync {
    async fn pause(&self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedInterval(pub Duration);

impl Default for FixedInterval {
    fn default() -> Self {
        FixedInterval(DEFAULT_PACING_INTERVAL)
    }
}

#[async_trait]
impl PacingPolicy for FixedInterval {
    async fn pause(&self) {
        if !self.0.is_zero() {
            tokio::time::sleep(self.0).await;
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoPacing;

#[async_trait]
impl PacingPolicy for NoPacing {
    async fn pause(&self) {}
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;

    #[tokio::test]
    async fn test_fixed_interval_sleeps() {
        let start = Instant::now();
        FixedInterval(Duration::from_millis(30)).pause().await;
        assert!(start.elapsed() >= Duration::from_millis(30));
    }

    #[tokio::test(start_paused = true)]
    async fn test_default_interval_is_two_seconds() {
        let start = tokio::time::Instant::now();
        FixedInterval::default().pause().await;
        assert_eq!(start.elapsed().as_secs(), 2);
    }
}
