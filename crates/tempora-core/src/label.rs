//! Node label events for property-prediction tasks.

use serde::{Deserialize, Serialize};

use crate::edge::{FeatureMatrix, NodeId, Timestamp};
use crate::{Error, Result};

/// Time-ordered stream of (timestamp, node, label-vector) observations.
///
/// Labels arrive in bursts: many nodes are labelled at the same timestamp
/// (e.g. one snapshot per day). Consumers walk the stream with a
/// [`LabelCursor`], which hands out one timestamp group at a time and never
/// looks ahead of the stream position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeLabelEvents {
    ts: Vec<Timestamp>,
    node: Vec<NodeId>,
    labels: FeatureMatrix,
}

impl NodeLabelEvents {
    /// Build from parallel columns. Rows must be sorted by timestamp and
    /// the label matrix must have one row per event.
    pub fn new(ts: Vec<Timestamp>, node: Vec<NodeId>, labels: FeatureMatrix) -> Result<Self> {
        if ts.len() != node.len() || labels.num_rows() != ts.len() {
            return Err(Error::DimensionMismatch {
                expected: ts.len(),
                got: labels.num_rows().max(node.len()),
            });
        }
        if !ts.windows(2).all(|w| w[0] <= w[1]) {
            return Err(Error::Unsorted);
        }
        Ok(Self { ts, node, labels })
    }

    /// Number of label events.
    pub fn len(&self) -> usize {
        self.ts.len()
    }

    /// True when there are no label events.
    pub fn is_empty(&self) -> bool {
        self.ts.is_empty()
    }

    /// Width of each label vector (number of classes).
    pub fn num_classes(&self) -> usize {
        self.labels.dim()
    }

    /// Timestamp column.
    pub fn timestamps(&self) -> &[Timestamp] {
        &self.ts
    }

    /// Node column.
    pub fn nodes(&self) -> &[NodeId] {
        &self.node
    }

    /// Label vector of event `i`.
    pub fn label(&self, i: usize) -> &[f32] {
        self.labels.row(i)
    }

    /// Start a cursor at the beginning of the stream.
    pub fn cursor(&self) -> LabelCursor<'_> {
        LabelCursor { events: self, pos: 0 }
    }
}

/// One timestamp's worth of label events.
#[derive(Debug, Clone, Copy)]
pub struct LabelGroup<'a> {
    /// The shared timestamp of every event in this group.
    pub ts: Timestamp,
    events: &'a NodeLabelEvents,
    start: usize,
    end: usize,
}

impl<'a> LabelGroup<'a> {
    /// Number of labelled nodes in the group.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// True when the group is empty (never produced by the cursor).
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Iterate (node, label vector) pairs in stream order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &'a [f32])> + '_ {
        (self.start..self.end).map(move |i| (self.events.node[i], self.events.label(i)))
    }
}

/// Forward-only cursor over label events, grouped by timestamp.
///
/// `reset` rewinds to the start, so evaluation loops are restartable.
#[derive(Debug, Clone)]
pub struct LabelCursor<'a> {
    events: &'a NodeLabelEvents,
    pos: usize,
}

impl<'a> LabelCursor<'a> {
    /// Timestamp of the next unconsumed label group, if any remain.
    pub fn next_label_time(&self) -> Option<Timestamp> {
        self.events.ts.get(self.pos).copied()
    }

    /// Consume and return the next label group whose timestamp is at or
    /// before `now`. Returns `None` when the next group is still in the
    /// future — labels are never served ahead of the stream.
    pub fn take_due(&mut self, now: Timestamp) -> Option<LabelGroup<'a>> {
        let ts = self.next_label_time()?;
        if ts > now {
            return None;
        }

        let start = self.pos;
        let mut end = self.pos;
        while end < self.events.len() && self.events.ts[end] == ts {
            end += 1;
        }
        self.pos = end;

        Some(LabelGroup {
            ts,
            events: self.events,
            start,
            end,
        })
    }

    /// Rewind to the beginning of the stream.
    pub fn reset(&mut self) {
        self.pos = 0;
    }

    /// True when every label group has been consumed.
    pub fn exhausted(&self) -> bool {
        self.pos >= self.events.len()
    }
}
