use std::future::Future;
use std::time::Duration;

/// Pause between dealer draws so a viewer can follow the dealer's play.
/// Has no effect on the game outcome.
pub trait Pacer {
    fn pause(&self) -> impl Future<Output = ()> + Send;
}

/// No pause at all; the dealer plays out instantly.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

impl Pacer for NoDelay {
    async fn pause(&self) {}
}

/// Sleep for a fixed duration on the tokio timer.
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay(pub Duration);

impl FixedDelay {
    pub const fn from_millis(ms: u64) -> Self {
        Self(Duration::from_millis(ms))
    }
}

impl Pacer for FixedDelay {
    async fn pause(&self) {
        if !self.0.is_zero() {
            tokio::time::sleep(self.0).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn fixed_delay_sleeps() {
        let start = tokio::time::Instant::now();
        FixedDelay::from_millis(600).pause().await;
        assert!(start.elapsed() >= Duration::from_millis(600));
    }

    #[tokio::test]
    async fn zero_delay_returns_immediately() {
        FixedDelay(Duration::ZERO).pause().await;
        NoDelay.pause().await;
    }
}
