//! EdgeBank: a pure-memorization link-prediction baseline.
//!
//! Scores an edge 1.0 if it has been seen before (optionally within a
//! sliding time window) and 0.0 otherwise. Despite its simplicity it is
//! a strong baseline on temporal benchmarks whose interactions repeat,
//! and it calibrates how hard a dataset's negatives are.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use tempora_core::{NodeId, Split, TemporalDataset, Timestamp};

use crate::Result;

/// How much history the memory retains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemoryMode {
    /// Every edge ever seen stays positive.
    Unlimited,
    /// Only edges last seen within the window count.
    TimeWindow(Timestamp),
}

/// Memory of observed (src, dst) pairs with their last-seen time.
///
/// `update_batch` advances an internal clock to the latest timestamp
/// seen; in window mode, predictions compare a pair's last occurrence
/// against that clock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeBank {
    mode: MemoryMode,
    memory: HashMap<(NodeId, NodeId), Timestamp>,
    now: Timestamp,
}

impl EdgeBank {
    /// Memory that never forgets.
    pub fn unlimited() -> Self {
        Self {
            mode: MemoryMode::Unlimited,
            memory: HashMap::new(),
            now: 0,
        }
    }

    /// Memory restricted to a fixed time window.
    pub fn with_time_window(window: Timestamp) -> Self {
        Self {
            mode: MemoryMode::TimeWindow(window),
            memory: HashMap::new(),
            now: 0,
        }
    }

    /// Window sized as a fraction of the training span, the usual way a
    /// window is chosen for this baseline.
    pub fn with_window_from_train_span(ds: &TemporalDataset, ratio: f64) -> Result<Self> {
        let masks = ds.splits()?;
        let ts = ds.edges().timestamps();
        let train: Vec<Timestamp> = masks
            .indices(Split::Train)
            .into_iter()
            .map(|i| ts[i])
            .collect();
        let span = match (train.first(), train.last()) {
            (Some(&a), Some(&b)) => b.saturating_sub(a),
            _ => 0,
        };
        let window = ((span as f64) * ratio).ceil() as Timestamp;
        Ok(Self::with_time_window(window.max(1)))
    }

    /// Memory mode.
    pub fn mode(&self) -> MemoryMode {
        self.mode
    }

    /// Number of distinct pairs remembered (including expired ones).
    pub fn len(&self) -> usize {
        self.memory.len()
    }

    /// True when nothing has been observed.
    pub fn is_empty(&self) -> bool {
        self.memory.is_empty()
    }

    /// Record one edge occurrence.
    pub fn update(&mut self, src: NodeId, dst: NodeId, ts: Timestamp) {
        let slot = self.memory.entry((src, dst)).or_insert(ts);
        *slot = (*slot).max(ts);
        self.now = self.now.max(ts);
    }

    /// Record a batch of edge occurrences.
    pub fn update_batch(&mut self, src: &[NodeId], dst: &[NodeId], ts: &[Timestamp]) {
        for i in 0..src.len().min(dst.len()).min(ts.len()) {
            self.update(src[i], dst[i], ts[i]);
        }
    }

    /// Score a candidate edge: 1.0 if remembered (and fresh enough in
    /// window mode), else 0.0.
    pub fn predict(&self, src: NodeId, dst: NodeId) -> f32 {
        match self.memory.get(&(src, dst)) {
            None => 0.0,
            Some(&last_seen) => match self.mode {
                MemoryMode::Unlimited => 1.0,
                MemoryMode::TimeWindow(w) => {
                    if last_seen >= self.now.saturating_sub(w) {
                        1.0
                    } else {
                        0.0
                    }
                }
            },
        }
    }
}
