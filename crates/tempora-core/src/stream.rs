//! Columnar temporal edge storage.

use std::collections::HashMap;
use std::ops::Range;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::edge::{EdgeView, FeatureMatrix, NodeId, Timestamp};
use crate::{Error, Result};

/// A time-ordered list of temporal edges with optional features and labels.
///
/// Storage is columnar: parallel vectors for sources, destinations and
/// timestamps, plus an optional row-major feature matrix and a per-edge
/// label column. Downstream consumers (splits, loaders, samplers) rely on
/// chronological order, so the list tracks a `sorted` flag and re-sorts
/// all columns together on demand.
///
/// # Example
///
/// ```rust
/// use tempora_core::TemporalEdgeList;
///
/// let mut edges = TemporalEdgeList::new();
/// edges.push(0, 1, 100, None, 1.0).unwrap();
/// edges.push(1, 2, 150, None, 1.0).unwrap();
///
/// assert_eq!(edges.len(), 2);
/// assert_eq!(edges.time_range(), Some((100, 150)));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemporalEdgeList {
    src: Vec<NodeId>,
    dst: Vec<NodeId>,
    ts: Vec<Timestamp>,
    feat: Option<FeatureMatrix>,
    label: Vec<f32>,
    sorted: bool,

    /// Node -> outgoing edge indices.
    #[serde(skip, default)]
    adj_out: HashMap<NodeId, SmallVec<[usize; 8]>>,
    /// Node -> incoming edge indices.
    #[serde(skip, default)]
    adj_in: HashMap<NodeId, SmallVec<[usize; 8]>>,
}

impl Default for TemporalEdgeList {
    fn default() -> Self {
        Self::new()
    }
}

impl TemporalEdgeList {
    /// Create an empty edge list without features.
    pub fn new() -> Self {
        Self {
            src: Vec::new(),
            dst: Vec::new(),
            ts: Vec::new(),
            feat: None,
            label: Vec::new(),
            sorted: true,
            adj_out: HashMap::new(),
            adj_in: HashMap::new(),
        }
    }

    /// Create with estimated edge capacity.
    pub fn with_capacity(edges: usize) -> Self {
        Self {
            src: Vec::with_capacity(edges),
            dst: Vec::with_capacity(edges),
            ts: Vec::with_capacity(edges),
            feat: None,
            label: Vec::with_capacity(edges),
            sorted: true,
            adj_out: HashMap::new(),
            adj_in: HashMap::new(),
        }
    }

    /// Append an edge.
    ///
    /// The first edge pushed with a feature vector fixes the feature
    /// width; later pushes must match it (and edges without features are
    /// rejected once a width is set).
    pub fn push(
        &mut self,
        src: NodeId,
        dst: NodeId,
        ts: Timestamp,
        feat: Option<&[f32]>,
        label: f32,
    ) -> Result<()> {
        match (&mut self.feat, feat) {
            (None, Some(row)) => {
                if !self.src.is_empty() {
                    return Err(Error::DimensionMismatch {
                        expected: 0,
                        got: row.len(),
                    });
                }
                let mut m = FeatureMatrix::new(row.len());
                m.push_row(row);
                self.feat = Some(m);
            }
            (Some(m), Some(row)) => {
                if row.len() != m.dim() {
                    return Err(Error::DimensionMismatch {
                        expected: m.dim(),
                        got: row.len(),
                    });
                }
                m.push_row(row);
            }
            (Some(m), None) => {
                return Err(Error::DimensionMismatch {
                    expected: m.dim(),
                    got: 0,
                });
            }
            (None, None) => {}
        }

        if let Some(&last) = self.ts.last() {
            if ts < last {
                self.sorted = false;
            }
        }

        let idx = self.src.len();
        self.adj_out.entry(src).or_default().push(idx);
        self.adj_in.entry(dst).or_default().push(idx);
        // Every endpoint appears in both maps so num_nodes is a plain key count.
        self.adj_out.entry(dst).or_default();
        self.adj_in.entry(src).or_default();

        self.src.push(src);
        self.dst.push(dst);
        self.ts.push(ts);
        self.label.push(label);
        Ok(())
    }

    /// Number of edges.
    pub fn len(&self) -> usize {
        self.src.len()
    }

    /// True when the list has no edges.
    pub fn is_empty(&self) -> bool {
        self.src.is_empty()
    }

    /// Number of distinct nodes (sources and destinations).
    pub fn num_nodes(&self) -> usize {
        self.adj_out.len()
    }

    /// Whether edges are currently in chronological order.
    pub fn is_sorted(&self) -> bool {
        self.sorted
    }

    /// (min, max) timestamp, or `None` for an empty list.
    pub fn time_range(&self) -> Option<(Timestamp, Timestamp)> {
        if self.ts.is_empty() {
            return None;
        }
        let mut min = Timestamp::MAX;
        let mut max = Timestamp::MIN;
        for &t in &self.ts {
            min = min.min(t);
            max = max.max(t);
        }
        Some((min, max))
    }

    /// Source column.
    pub fn sources(&self) -> &[NodeId] {
        &self.src
    }

    /// Destination column.
    pub fn destinations(&self) -> &[NodeId] {
        &self.dst
    }

    /// Timestamp column.
    pub fn timestamps(&self) -> &[Timestamp] {
        &self.ts
    }

    /// Label column.
    pub fn labels(&self) -> &[f32] {
        &self.label
    }

    /// Edge feature matrix, if the stream carries features.
    pub fn features(&self) -> Option<&FeatureMatrix> {
        self.feat.as_ref()
    }

    /// Per-row view of edge `i`.
    pub fn view(&self, i: usize) -> EdgeView<'_> {
        EdgeView {
            src: self.src[i],
            dst: self.dst[i],
            ts: self.ts[i],
            feat: self.feat.as_ref().map_or(&[][..], |m| m.row(i)),
            label: self.label[i],
        }
    }

    /// Iterator over all edges in storage order.
    pub fn iter(&self) -> impl Iterator<Item = EdgeView<'_>> {
        (0..self.len()).map(move |i| self.view(i))
    }

    /// Sort all columns by (timestamp, source, destination), stably.
    ///
    /// No-op when already sorted. Adjacency indices are rebuilt.
    pub fn sort_by_time(&mut self) {
        if self.sorted {
            return;
        }

        let mut perm: Vec<usize> = (0..self.len()).collect();
        perm.sort_by_key(|&i| (self.ts[i], self.src[i], self.dst[i]));

        apply_perm(&mut self.src, &perm);
        apply_perm(&mut self.dst, &perm);
        apply_perm(&mut self.ts, &perm);
        apply_perm(&mut self.label, &perm);
        if let Some(m) = &mut self.feat {
            m.permute(&perm);
        }

        self.rebuild_adjacency();
        self.sorted = true;
    }

    /// Rebuild adjacency maps from the edge columns.
    ///
    /// Called after sorting and after binary deserialization (the maps are
    /// not serialized).
    pub(crate) fn rebuild_adjacency(&mut self) {
        self.adj_out.clear();
        self.adj_in.clear();

        for idx in 0..self.len() {
            self.adj_out.entry(self.src[idx]).or_default().push(idx);
            self.adj_in.entry(self.dst[idx]).or_default().push(idx);
            self.adj_out.entry(self.dst[idx]).or_default();
            self.adj_in.entry(self.src[idx]).or_default();
        }
    }

    /// Index range of edges with timestamp in `[start, end]`.
    ///
    /// Requires chronological order.
    pub fn range_in_window(&self, start: Timestamp, end: Timestamp) -> Result<Range<usize>> {
        if start > end {
            return Err(Error::InvalidTimeRange { start, end });
        }
        if !self.sorted {
            return Err(Error::Unsorted);
        }

        let lo = self.ts.partition_point(|&t| t < start);
        let hi = self.ts.partition_point(|&t| t <= end);
        Ok(lo..hi)
    }

    /// Destinations of edges (src, ?, ts) at exactly time `ts`.
    ///
    /// Used when generating negatives to exclude collisions with positives
    /// that share the source and timestamp.
    pub fn destinations_at(&self, src: NodeId, ts: Timestamp) -> Vec<NodeId> {
        let Some(indices) = self.adj_out.get(&src) else {
            return vec![];
        };

        indices
            .iter()
            .filter(|&&i| self.ts[i] == ts)
            .map(|&i| self.dst[i])
            .collect()
    }

    /// Sorted, deduplicated destination universe.
    pub fn unique_destinations(&self) -> Vec<NodeId> {
        let mut dsts = self.dst.clone();
        dsts.sort_unstable();
        dsts.dedup();
        dsts
    }

    /// (min, max) over the destination column, or `None` when empty.
    pub fn destination_range(&self) -> Option<(NodeId, NodeId)> {
        let min = *self.dst.iter().min()?;
        let max = *self.dst.iter().max()?;
        Some((min, max))
    }

    /// Out-degree of a node over the whole stream.
    pub fn out_degree(&self, node: NodeId) -> usize {
        self.adj_out.get(&node).map_or(0, |v| v.len())
    }

    /// In-degree of a node over the whole stream.
    pub fn in_degree(&self, node: NodeId) -> usize {
        self.adj_in.get(&node).map_or(0, |v| v.len())
    }
}

fn apply_perm<T: Copy>(col: &mut Vec<T>, perm: &[usize]) {
    let out: Vec<T> = perm.iter().map(|&i| col[i]).collect();
    *col = out;
}
