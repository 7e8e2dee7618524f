//! Manager owning the fixed slot set and the shared HTTP client

use bytes::Bytes;
use futures::future;
use reqwest::Client;
use std::sync::Arc;
use tracing::debug;

use super::aggregate::ProgressAggregator;
use super::config::DownloadConfig;
use super::error::Result;
use super::metrics::DownloadMetrics;
use super::progress::{NullProgressSink, ProgressSink};
use super::slot::DownloadSlot;

/// Facade over a fixed set of download slots
///
/// Builds one HTTP client, one aggregator, and `slot_count` slots at
/// construction; slots live as long as the manager. Slot indices run from 0
/// to `slot_count - 1`, and indexing beyond that panics.
pub struct DownloadManager {
    slots: Vec<Arc<DownloadSlot>>,
    aggregator: Arc<ProgressAggregator>,
    metrics: Arc<DownloadMetrics>,
    config: DownloadConfig,
}

impl DownloadManager {
    pub fn new(config: DownloadConfig, sink: Arc<dyn ProgressSink>) -> Self {
        let mut builder = Client::builder().user_agent(&config.user_agent);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().expect("Failed to create HTTP client");

        let aggregator = Arc::new(ProgressAggregator::new(config.slot_count, sink));
        let metrics = Arc::new(DownloadMetrics::default());
        let slots = (0..config.slot_count)
            .map(|index| {
                Arc::new(DownloadSlot::new(
                    index,
                    client.clone(),
                    config.clone(),
                    Arc::clone(&aggregator),
                    Arc::clone(&metrics),
                ))
            })
            .collect();

        Self {
            slots,
            aggregator,
            metrics,
            config,
        }
    }

    /// Number of slots this manager owns
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Access one slot by index
    pub fn slot(&self, index: usize) -> &Arc<DownloadSlot> {
        &self.slots[index]
    }

    /// All slots in index order
    pub fn slots(&self) -> &[Arc<DownloadSlot>] {
        &self.slots
    }

    /// The aggregator shared by all slots
    pub fn aggregator(&self) -> &Arc<ProgressAggregator> {
        &self.aggregator
    }

    /// Outcome counters across all slots
    pub fn metrics(&self) -> &DownloadMetrics {
        &self.metrics
    }

    pub fn config(&self) -> &DownloadConfig {
        &self.config
    }

    /// Assign `url` to the slot and download it
    ///
    /// Same outcome contract as [`DownloadSlot::start`]: `Ok(None)` for an
    /// already-active slot or a cancelled download.
    pub async fn start(&self, index: usize, url: &str) -> Result<Option<Bytes>> {
        let slot = &self.slots[index];
        slot.set_source_link(url);
        slot.start(url).await
    }

    /// Signal the slot's in-flight download, if any, to stop
    pub fn cancel(&self, index: usize) {
        self.slots[index].cancel();
    }

    /// Download every slot's stored address concurrently
    ///
    /// Returns one result per slot, in slot order, so callers can tell which
    /// downloads failed; slots with empty addresses fail individually with
    /// `InvalidAddress` without disturbing the others.
    pub async fn start_all(&self) -> Vec<Result<Option<Bytes>>> {
        debug!("Starting all {} slots", self.slots.len());
        let downloads = self.slots.iter().map(|slot| async move {
            let link = slot.source_link();
            slot.start(&link).await
        });
        future::join_all(downloads).await
    }
}

impl Default for DownloadManager {
    fn default() -> Self {
        Self::new(DownloadConfig::default(), Arc::new(NullProgressSink))
    }
}

impl std::fmt::Debug for DownloadManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownloadManager")
            .field("slot_count", &self.slots.len())
            .field("aggregator", &self.aggregator)
            .finish()
    }
}
