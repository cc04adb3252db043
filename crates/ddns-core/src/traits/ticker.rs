// # Ticker Trait
//
// Defines the wait between two check cycles.
//
// The engine never calls `tokio::time::sleep` directly; it asks its ticker
// for the next tick. Production uses `IntervalTicker`, tests plug in tickers
// that count ticks or stop the loop.

use async_trait::async_trait;

/// Scheduler for the polling loop
#[async_trait]
pub trait Ticker: Send + Sync {
    /// Wait until the next check cycle is due
    async fn tick(&mut self);
}
