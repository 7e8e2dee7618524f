//! Shared aggregate progress across download slots
//!
//! One aggregator instance is injected into every slot. It keeps
//! bytes-loaded / bytes-total counters per slot index, derives the combined
//! percentage, and pushes it to the configured sink after every change.

use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;

use super::progress::ProgressSink;

/// Per-slot byte counters plus the number of slots currently downloading
struct SlotCounters {
    bytes_loaded: Vec<u64>,
    bytes_total: Vec<u64>,
    active: usize,
}

impl SlotCounters {
    fn new(slot_count: usize) -> Self {
        Self {
            bytes_loaded: vec![0; slot_count],
            bytes_total: vec![0; slot_count],
            active: 0,
        }
    }

    /// Combined percentage over all slots, 0 when nothing is tracked
    fn percent(&self) -> f64 {
        let loaded: u64 = self.bytes_loaded.iter().sum();
        let total: u64 = self.bytes_total.iter().sum();
        if total == 0 {
            0.0
        } else {
            loaded as f64 / total as f64 * 100.0
        }
    }

    fn clear(&mut self) {
        self.bytes_loaded.fill(0);
        self.bytes_total.fill(0);
    }
}

/// Aggregate progress tracker shared by all slots of a manager
///
/// All operations are mutually exclusive under one lock, and the sink is
/// invoked synchronously under that lock, so emitted percentages are always
/// consistent with the counters that produced them. Slot indices must be
/// below the `slot_count` the aggregator was created with.
pub struct ProgressAggregator {
    state: Mutex<SlotCounters>,
    sink: Arc<dyn ProgressSink>,
}

impl ProgressAggregator {
    pub fn new(slot_count: usize, sink: Arc<dyn ProgressSink>) -> Self {
        Self {
            state: Mutex::new(SlotCounters::new(slot_count)),
            sink,
        }
    }

    /// Number of slots this aggregator tracks
    pub fn slot_count(&self) -> usize {
        self.state.lock().bytes_total.len()
    }

    /// Number of slots currently downloading
    pub fn active_count(&self) -> usize {
        self.state.lock().active
    }

    /// Current combined percentage without mutating anything
    pub fn percent(&self) -> f64 {
        self.state.lock().percent()
    }

    /// A slot starts tracking `total_bytes` of expected body
    pub fn begin(&self, index: usize, total_bytes: u64) {
        let mut state = self.state.lock();
        state.active += 1;
        state.bytes_loaded[index] = 0;
        state.bytes_total[index] = total_bytes;
        self.sink.on_aggregate_progress(state.percent());
    }

    /// A slot has `loaded_bytes` of its body so far (cumulative, not a delta)
    pub fn update(&self, index: usize, loaded_bytes: u64) {
        let mut state = self.state.lock();
        state.bytes_loaded[index] = loaded_bytes;
        self.sink.on_aggregate_progress(state.percent());
    }

    /// A slot finished its download
    ///
    /// The finished slot's counters stay in place so its contribution
    /// remains visible until the last active slot is done, at which point
    /// everything clears and 0 is emitted.
    pub fn end(&self, _index: usize) {
        let mut state = self.state.lock();
        state.active = state.active.saturating_sub(1);
        if state.active == 0 {
            state.clear();
        }
        self.sink.on_aggregate_progress(state.percent());
    }

    /// A slot abandoned its download (cancelled or failed mid-stream)
    ///
    /// Unlike [`end`](Self::end), the slot's partial contribution is removed
    /// immediately; if it was the last active slot everything clears.
    pub fn cancel(&self, index: usize) {
        let mut state = self.state.lock();
        state.active = state.active.saturating_sub(1);
        if state.active == 0 {
            state.clear();
        } else {
            state.bytes_loaded[index] = 0;
            state.bytes_total[index] = 0;
        }
        self.sink.on_aggregate_progress(state.percent());
    }

    /// Point-in-time copy of the counters
    pub fn snapshot(&self) -> AggregateSnapshot {
        let state = self.state.lock();
        AggregateSnapshot {
            bytes_loaded: state.bytes_loaded.clone(),
            bytes_total: state.bytes_total.clone(),
            active_count: state.active,
        }
    }
}

impl std::fmt::Debug for ProgressAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("ProgressAggregator")
            .field("active", &state.active)
            .field("percent", &state.percent())
            .finish()
    }
}

/// Immutable snapshot of aggregate progress
#[derive(Debug, Clone, Serialize)]
pub struct AggregateSnapshot {
    pub bytes_loaded: Vec<u64>,
    pub bytes_total: Vec<u64>,
    pub active_count: usize,
}

impl AggregateSnapshot {
    /// Combined percentage the sink saw when this snapshot was taken
    pub fn percent(&self) -> f64 {
        let loaded: u64 = self.bytes_loaded.iter().sum();
        let total: u64 = self.bytes_total.iter().sum();
        if total == 0 {
            0.0
        } else {
            loaded as f64 / total as f64 * 100.0
        }
    }
}
