//! Download engine module
//!
//! This module contains the slot-based download engine: configuration,
//! errors, the shared progress aggregate with its sinks, the slots
//! themselves, and the manager facade that ties them together.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod manager;
pub mod metrics;
pub mod progress;
pub mod slot;

// Re-export main types for convenience
pub use aggregate::{AggregateSnapshot, ProgressAggregator};
pub use config::DownloadConfig;
pub use error::{AddressError, DownloadError, RemoteFailure, Result};
pub use manager::DownloadManager;
pub use metrics::{DownloadMetrics, DownloadMetricsSnapshot};
pub use progress::{ConsoleProgressSink, NullProgressSink, ProgressSink, WatchProgressSink};
pub use slot::DownloadSlot;
