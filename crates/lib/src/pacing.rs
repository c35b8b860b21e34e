//! Minimum-interval pacing between provider calls.

use std::time::Duration;
use tokio::time::Instant;

/// Enforces a minimum delay between successive calls. The first acquisition
/// is immediate; each later one waits until `interval` has elapsed since the
/// previous acquisition was granted.
#[derive(Debug)]
pub struct Pacer {
    interval: Duration,
    next_allowed: Option<Instant>,
}

impl Pacer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_allowed: None,
        }
    }

    pub async fn acquire(&mut self) {
        if let Some(deadline) = self.next_allowed {
            tokio::time::sleep_until(deadline).await;
        }
        self.next_allowed = Some(Instant::now() + self.interval);
    }
}
