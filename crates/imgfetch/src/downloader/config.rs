//! Configuration types for the download engine

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for a [`DownloadManager`](crate::DownloadManager)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Number of independent download slots
    pub slot_count: usize,
    /// Read granularity while streaming a body, in bytes
    pub chunk_size: usize,
    pub user_agent: String,
    /// Overall per-request timeout; `None` leaves requests unbounded
    pub timeout: Option<Duration>,
}

impl DownloadConfig {
    /// Clamp the configured chunk size to something a read call accepts
    pub(crate) fn effective_chunk_size(&self) -> usize {
        self.chunk_size.max(1)
    }
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            slot_count: 3,
            chunk_size: 8192,
            user_agent: "imgfetch/0.1.0".to_string(),
            timeout: None,
        }
    }
}
