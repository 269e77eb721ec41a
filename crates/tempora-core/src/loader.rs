//! Fixed-size temporal batching.

use std::ops::Range;

use crate::edge::{NodeId, Timestamp};
use crate::split::{Split, SplitMasks};
use crate::stream::TemporalEdgeList;
use crate::{Error, Result};

/// One batch of consecutive edges from the sorted stream.
///
/// Columns are borrowed slices; features come flat with their row width.
#[derive(Debug, Clone)]
pub struct EdgeBatch<'a> {
    /// Source column.
    pub src: &'a [NodeId],
    /// Destination column.
    pub dst: &'a [NodeId],
    /// Timestamp column.
    pub ts: &'a [Timestamp],
    /// Label column.
    pub labels: &'a [f32],
    /// Flat row-major edge features, if present.
    pub feat: Option<&'a [f32]>,
    /// Width of each feature row (0 when `feat` is `None`).
    pub feat_dim: usize,
    /// Absolute index range of the batch in the stream.
    pub range: Range<usize>,
}

impl<'a> EdgeBatch<'a> {
    /// Number of edges in the batch.
    pub fn len(&self) -> usize {
        self.src.len()
    }

    /// True when the batch is empty (never produced by a loader).
    pub fn is_empty(&self) -> bool {
        self.src.is_empty()
    }

    /// Earliest timestamp in the batch.
    pub fn first_ts(&self) -> Timestamp {
        self.ts[0]
    }

    /// Latest timestamp in the batch.
    pub fn last_ts(&self) -> Timestamp {
        self.ts[self.ts.len() - 1]
    }
}

/// Lazy, restartable loader yielding fixed-size chronological batches.
///
/// Bound to one contiguous index range of a sorted [`TemporalEdgeList`],
/// normally a whole split, so batches never cross split boundaries. The
/// final batch may be short. Each call to [`TemporalLoader::iter`] starts
/// a fresh pass over the same range.
///
/// # Example
///
/// ```rust
/// use tempora_core::{TemporalEdgeList, TemporalLoader};
///
/// let mut edges = TemporalEdgeList::new();
/// for t in 0..10 {
///     edges.push(t, t + 1, t * 100, None, 1.0).unwrap();
/// }
///
/// let loader = TemporalLoader::over_range(&edges, 0..10, 4).unwrap();
/// let sizes: Vec<usize> = loader.iter().map(|b| b.len()).collect();
/// assert_eq!(sizes, vec![4, 4, 2]);
/// ```
#[derive(Debug, Clone)]
pub struct TemporalLoader<'a> {
    edges: &'a TemporalEdgeList,
    range: Range<usize>,
    batch_size: usize,
}

impl<'a> TemporalLoader<'a> {
    /// Batch a contiguous index range of the stream.
    pub fn over_range(
        edges: &'a TemporalEdgeList,
        range: Range<usize>,
        batch_size: usize,
    ) -> Result<Self> {
        if batch_size == 0 {
            return Err(Error::ZeroBatchSize);
        }
        if !edges.is_sorted() {
            return Err(Error::Unsorted);
        }
        debug_assert!(range.end <= edges.len());
        Ok(Self {
            edges,
            range,
            batch_size,
        })
    }

    /// Batch one split of the stream.
    ///
    /// The split mask must select a contiguous run of the sorted stream
    /// (always true for chronological splits).
    pub fn for_split(
        edges: &'a TemporalEdgeList,
        masks: &SplitMasks,
        split: Split,
        batch_size: usize,
    ) -> Result<Self> {
        let mask = masks.mask(split);
        let start = mask.iter().position(|&m| m);
        let range = match start {
            None => 0..0,
            Some(start) => {
                let end = mask.len() - mask.iter().rev().position(|&m| m).unwrap_or(0);
                if mask[start..end].iter().any(|&m| !m) {
                    return Err(Error::NonContiguousSplit(split.tag().to_string()));
                }
                start..end
            }
        };
        Self::over_range(edges, range, batch_size)
    }

    /// Number of edges covered.
    pub fn num_edges(&self) -> usize {
        self.range.len()
    }

    /// Number of batches a full pass will yield.
    pub fn num_batches(&self) -> usize {
        self.range.len().div_ceil(self.batch_size)
    }

    /// Start a fresh pass over the range.
    pub fn iter(&self) -> Batches<'a> {
        Batches {
            edges: self.edges,
            pos: self.range.start,
            end: self.range.end,
            batch_size: self.batch_size,
        }
    }
}

/// Iterator state for one pass of a [`TemporalLoader`].
#[derive(Debug, Clone)]
pub struct Batches<'a> {
    edges: &'a TemporalEdgeList,
    pos: usize,
    end: usize,
    batch_size: usize,
}

impl<'a> Iterator for Batches<'a> {
    type Item = EdgeBatch<'a>;

    fn next(&mut self) -> Option<EdgeBatch<'a>> {
        if self.pos >= self.end {
            return None;
        }
        let start = self.pos;
        let end = (start + self.batch_size).min(self.end);
        self.pos = end;

        let feat = self.edges.features();
        Some(EdgeBatch {
            src: &self.edges.sources()[start..end],
            dst: &self.edges.destinations()[start..end],
            ts: &self.edges.timestamps()[start..end],
            labels: &self.edges.labels()[start..end],
            feat: feat.map(|m| m.rows(start..end)),
            feat_dim: feat.map_or(0, |m| m.dim()),
            range: start..end,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.end - self.pos).div_ceil(self.batch_size);
        (remaining, Some(remaining))
    }
}
