//! A single download slot with its own cancellation handle
//!
//! A slot is one fixed resource position: it remembers the address the host
//! assigned to it, runs at most one streaming fetch at a time, and reports
//! byte progress to the shared aggregator.

use bytes::{Bytes, BytesMut};
use futures::TryStreamExt;
use parking_lot::{Mutex, RwLock};
use reqwest::Client;
use std::io;
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tokio_util::io::StreamReader;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info_span, warn, Instrument};
use url::Url;

use super::aggregate::ProgressAggregator;
use super::config::DownloadConfig;
use super::error::{AddressError, DownloadError, RemoteFailure, Result};
use super::metrics::DownloadMetrics;

type LinkWatcher = Box<dyn Fn(&str) + Send + Sync>;

/// One download position with exclusive cancellation state
///
/// The cancellation token is present exactly while a download runs; a second
/// `start` during that window is a no-op resolving to `Ok(None)`.
pub struct DownloadSlot {
    index: usize,
    client: Client,
    config: DownloadConfig,
    aggregator: Arc<ProgressAggregator>,
    metrics: Arc<DownloadMetrics>,
    source_link: RwLock<String>,
    link_watchers: Mutex<Vec<LinkWatcher>>,
    active: Mutex<Option<CancellationToken>>,
}

impl DownloadSlot {
    pub(crate) fn new(
        index: usize,
        client: Client,
        config: DownloadConfig,
        aggregator: Arc<ProgressAggregator>,
        metrics: Arc<DownloadMetrics>,
    ) -> Self {
        Self {
            index,
            client,
            config,
            aggregator,
            metrics,
            source_link: RwLock::new(String::new()),
            link_watchers: Mutex::new(Vec::new()),
            active: Mutex::new(None),
        }
    }

    /// Identity of this slot, unique within its manager
    pub fn index(&self) -> usize {
        self.index
    }

    /// The address currently assigned to this slot
    pub fn source_link(&self) -> String {
        self.source_link.read().clone()
    }

    /// Assign a new address and notify registered watchers
    pub fn set_source_link(&self, link: impl Into<String>) {
        let link = link.into();
        *self.source_link.write() = link.clone();
        for watcher in self.link_watchers.lock().iter() {
            watcher(&link);
        }
    }

    /// Register a callback observing address changes
    ///
    /// Watchers run synchronously on the thread that sets the link and must
    /// not register further watchers from inside the callback.
    pub fn watch_source_link(&self, watcher: impl Fn(&str) + Send + Sync + 'static) {
        self.link_watchers.lock().push(Box::new(watcher));
    }

    /// Whether a download is currently running in this slot
    pub fn is_active(&self) -> bool {
        self.active.lock().is_some()
    }

    /// Signal the in-flight download, if any, to stop
    ///
    /// Takes effect at the download's next suspension point; calling this on
    /// an idle slot does nothing.
    pub fn cancel(&self) {
        if let Some(token) = self.active.lock().as_ref() {
            debug!("Slot {} cancellation requested", self.index);
            token.cancel();
        }
    }

    /// Download `url` into memory, streaming progress to the aggregator
    ///
    /// Resolves to `Ok(None)` when the slot is already downloading or when
    /// the download was cancelled; both leave the slot idle without an error.
    /// Every other failure surfaces as a [`DownloadError`]. Dropping the
    /// returned future mid-flight releases the slot the same way a
    /// cancellation does.
    pub async fn start(&self, url: &str) -> Result<Option<Bytes>> {
        let token = {
            let mut active = self.active.lock();
            if active.is_some() {
                debug!("Slot {} already downloading, ignoring start", self.index);
                return Ok(None);
            }
            let token = CancellationToken::new();
            *active = Some(token.clone());
            token
        };

        self.metrics.record_started();
        let mut guard = ActiveGuard::new(self);
        let outcome = self
            .fetch(url, &token, &mut guard)
            .instrument(info_span!("slot_download", slot = self.index, url = %url))
            .await;
        guard.settle();

        match &outcome {
            Ok(Some(body)) => self.metrics.record_completed(body.len() as u64),
            Ok(None) => self.metrics.record_cancelled(),
            Err(e) => {
                warn!("Slot {} download failed ({}): {}", self.index, e.category(), e);
                self.metrics.record_failed();
            }
        }
        outcome
    }

    async fn fetch(
        &self,
        url: &str,
        token: &CancellationToken,
        guard: &mut ActiveGuard<'_>,
    ) -> Result<Option<Bytes>> {
        let address = parse_address(url)?;

        debug!("Slot {} requesting {}", self.index, address);
        let response = tokio::select! {
            _ = token.cancelled() => {
                debug!("Slot {} cancelled while waiting for headers", self.index);
                return Ok(None);
            }
            result = self.client.get(address).send() => {
                result.map_err(|e| DownloadError::transport(url, e))?
            }
        };

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::remote(url, RemoteFailure::Status(status)));
        }

        let total_bytes = response
            .content_length()
            .ok_or_else(|| DownloadError::remote(url, RemoteFailure::MissingLength))?;

        debug!("Slot {} downloading {} bytes", self.index, total_bytes);
        self.aggregator.begin(self.index, total_bytes);
        guard.mark_tracking();

        // The aggregate now holds this slot's contribution; every exit below
        // must retire it through end() or cancel().
        let mut reader = StreamReader::new(response.bytes_stream().map_err(io::Error::other));
        let mut body = BytesMut::new();
        let mut chunk = vec![0u8; self.config.effective_chunk_size()];
        let mut loaded: u64 = 0;

        loop {
            let read = tokio::select! {
                _ = token.cancelled() => {
                    debug!("Slot {} cancelled at {} of {} bytes", self.index, loaded, total_bytes);
                    self.aggregator.cancel(self.index);
                    return Ok(None);
                }
                read = reader.read(&mut chunk) => read,
            };
            let n = match read {
                Ok(n) => n,
                Err(e) => {
                    self.aggregator.cancel(self.index);
                    return Err(DownloadError::transport(url, e));
                }
            };
            if n == 0 {
                break;
            }
            body.extend_from_slice(&chunk[..n]);
            loaded += n as u64;
            self.aggregator.update(self.index, loaded);
        }

        self.aggregator.end(self.index);
        debug!("Slot {} download complete: {} bytes", self.index, loaded);
        Ok(Some(body.freeze()))
    }
}

impl std::fmt::Debug for DownloadSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownloadSlot")
            .field("index", &self.index)
            .field("active", &self.is_active())
            .finish()
    }
}

/// Returns the slot to idle even when its download future is dropped
///
/// `start` settles the guard on every normal exit. A drop without a settle
/// means the future was abandoned at a suspension point, so the active token
/// is released here and a begun aggregate contribution is retired through
/// the cancel path.
struct ActiveGuard<'a> {
    slot: &'a DownloadSlot,
    tracking: bool,
    settled: bool,
}

impl<'a> ActiveGuard<'a> {
    fn new(slot: &'a DownloadSlot) -> Self {
        Self {
            slot,
            tracking: false,
            settled: false,
        }
    }

    /// The aggregator holds this slot's contribution from here on
    fn mark_tracking(&mut self) {
        self.tracking = true;
    }

    /// Normal exit: the caller takes the slot back to idle
    fn settle(&mut self) {
        self.settled = true;
        *self.slot.active.lock() = None;
    }
}

impl Drop for ActiveGuard<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        debug!("Slot {} download future dropped mid-flight", self.slot.index);
        if self.tracking {
            self.slot.aggregator.cancel(self.slot.index);
        }
        *self.slot.active.lock() = None;
        self.slot.metrics.record_cancelled();
    }
}

/// Validate an address string before any request goes out
fn parse_address(url: &str) -> Result<Url> {
    if url.is_empty() {
        return Err(DownloadError::invalid_address(url, AddressError::Empty));
    }
    let parsed = Url::parse(url)
        .map_err(|e| DownloadError::invalid_address(url, AddressError::Parse(e)))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(DownloadError::invalid_address(
            url,
            AddressError::UnsupportedScheme(other.to_string()),
        )),
    }
}
