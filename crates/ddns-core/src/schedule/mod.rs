// # Interval Ticker
//
// Fixed-interval implementation of `Ticker`.
//
// Each tick sleeps for exactly one interval, measured from the moment the
// tick starts. Time spent in the check cycle is not subtracted, so the gap
// between two cycles is "cycle duration + interval".

use async_trait::async_trait;
use std::time::Duration;

use crate::traits::Ticker;

/// Sleeps a fixed interval per tick
#[derive(Debug, Clone, Copy)]
pub struct IntervalTicker {
    interval: Duration,
}

impl IntervalTicker {
    /// Create a ticker that waits `interval` per tick
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    /// The configured interval
    pub fn interval(&self) -> Duration {
        self.interval
    }
}

#[async_trait]
impl Ticker for IntervalTicker {
    async fn tick(&mut self) {
        tracing::debug!("Sleeping for {:?}", self.interval);
        tokio::time::sleep(self.interval).await;
    }
}
