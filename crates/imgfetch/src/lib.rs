//! Image Download Engine
//!
//! This library is the download core of a small image viewer: a fixed set of
//! slots, each downloading one image into memory, with a single aggregate
//! progress percentage across all of them and per-slot cancellation.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use imgfetch::{ConsoleProgressSink, DownloadConfig, DownloadManager};
//! use std::sync::Arc;
//!
//! # async fn example() -> imgfetch::Result<()> {
//! // Three slots, 8 KiB read chunks, no timeout
//! let config = DownloadConfig::default();
//!
//! // Aggregate percentages land in the sink
//! let manager = DownloadManager::new(config, Arc::new(ConsoleProgressSink::new()));
//!
//! // Download into slot 0
//! match manager.start(0, "https://example.com/image.jpg").await? {
//!     Some(body) => println!("fetched {} bytes", body.len()),
//!     None => println!("slot busy or download cancelled"),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - **Slot-based downloads**: a fixed number of independent positions, one
//!   in-flight download per slot
//! - **Aggregate progress**: one combined percentage across all active slots,
//!   pushed to a pluggable sink
//! - **Cooperative cancellation**: per-slot tokens observed at every
//!   suspension point; cancellation is a quiet outcome, not an error
//! - **Streaming fetches**: bodies stream in fixed-size chunks into memory,
//!   never buffered by the HTTP layer up front
//! - **Typed failures**: invalid addresses, server rejections, and transport
//!   faults are distinct errors the host can present
//! - **Async/await**: full async support with Tokio runtime

pub mod downloader;

// Re-export commonly used types for convenience
pub use downloader::{
    AddressError, AggregateSnapshot, ConsoleProgressSink, DownloadConfig, DownloadError,
    DownloadManager, DownloadMetrics, DownloadMetricsSnapshot, DownloadSlot, NullProgressSink,
    ProgressAggregator, ProgressSink, RemoteFailure, Result, WatchProgressSink,
};
