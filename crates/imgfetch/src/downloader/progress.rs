//! Progress sinks receiving the aggregate percentage
//!
//! The aggregator pushes a single number, the combined percentage across all
//! active slots. Sinks run synchronously under the aggregator's lock, so an
//! implementation must return promptly and must not call back into the
//! aggregator.

use std::io::{self, Write};
use tokio::sync::watch;

/// Receiver for aggregate progress updates, values in `[0.0, 100.0]`
pub trait ProgressSink: Send + Sync {
    fn on_aggregate_progress(&self, percent: f64);
}

/// Closures work as sinks directly
impl<F> ProgressSink for F
where
    F: Fn(f64) + Send + Sync,
{
    fn on_aggregate_progress(&self, percent: f64) {
        self(percent)
    }
}

/// Progress sink that does nothing
#[derive(Debug, Default)]
pub struct NullProgressSink;

impl ProgressSink for NullProgressSink {
    fn on_aggregate_progress(&self, _percent: f64) {}
}

/// Simple console progress sink, redrawing a single status line
#[derive(Debug, Default)]
pub struct ConsoleProgressSink;

impl ConsoleProgressSink {
    pub fn new() -> Self {
        Self
    }
}

impl ProgressSink for ConsoleProgressSink {
    fn on_aggregate_progress(&self, percent: f64) {
        print!("\r⏬ overall progress: {:5.1}%  ", percent);
        let _ = io::stdout().flush();
    }
}

/// Progress sink backed by a tokio watch channel
///
/// The aggregator writes into the channel; hosts subscribe and render the
/// latest percentage at their own pace, off the download tasks.
pub struct WatchProgressSink {
    tx: watch::Sender<f64>,
}

impl WatchProgressSink {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(0.0);
        Self { tx }
    }

    /// A receiver that always holds the most recent aggregate percentage
    pub fn subscribe(&self) -> watch::Receiver<f64> {
        self.tx.subscribe()
    }
}

impl Default for WatchProgressSink {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for WatchProgressSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatchProgressSink")
            .field("current", &*self.tx.borrow())
            .finish()
    }
}

impl ProgressSink for WatchProgressSink {
    fn on_aggregate_progress(&self, percent: f64) {
        // Keeps the latest value even while no receiver is subscribed
        self.tx.send_replace(percent);
    }
}
