//! Counters for download outcomes
//!
//! Atomic counters updated from concurrent slot tasks, with an immutable
//! snapshot type for reporting.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Outcome counters for a manager's downloads
#[derive(Debug, Default)]
pub struct DownloadMetrics {
    pub started: AtomicU64,
    pub completed: AtomicU64,
    pub cancelled: AtomicU64,
    pub failed: AtomicU64,
    pub bytes_fetched: AtomicU64,
}

impl DownloadMetrics {
    /// Record that a slot accepted a start request
    pub fn record_started(&self) {
        self.started.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a completed download and the size of its body
    pub fn record_completed(&self, size: u64) {
        self.completed.fetch_add(1, Ordering::Relaxed);
        self.bytes_fetched.fetch_add(size, Ordering::Relaxed);
    }

    /// Record a download that was cancelled before completion
    pub fn record_cancelled(&self) {
        self.cancelled.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a failed download
    pub fn record_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a snapshot of current counters
    pub fn snapshot(&self) -> DownloadMetricsSnapshot {
        DownloadMetricsSnapshot {
            started: self.started.load(Ordering::Relaxed),
            completed: self.completed.load(Ordering::Relaxed),
            cancelled: self.cancelled.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            bytes_fetched: self.bytes_fetched.load(Ordering::Relaxed),
        }
    }
}

/// Immutable snapshot of download counters
#[derive(Debug, Clone, Serialize)]
pub struct DownloadMetricsSnapshot {
    pub started: u64,
    pub completed: u64,
    pub cancelled: u64,
    pub failed: u64,
    pub bytes_fetched: u64,
}

impl DownloadMetricsSnapshot {
    /// Fraction of accepted starts that completed, 0.0 to 1.0
    pub fn success_rate(&self) -> f64 {
        if self.started == 0 {
            0.0
        } else {
            self.completed as f64 / self.started as f64
        }
    }

    /// Average body size of completed downloads
    pub fn average_size(&self) -> f64 {
        if self.completed == 0 {
            0.0
        } else {
            self.bytes_fetched as f64 / self.completed as f64
        }
    }
}
