//! Edge and feature primitives.

use serde::{Deserialize, Serialize};

/// Node identifier (dense integer id assigned at ingestion).
pub type NodeId = u64;

/// Timestamp type (seconds since epoch or arbitrary units).
pub type Timestamp = u64;

/// A single temporal interaction, as seen when iterating a stream.
///
/// The canonical storage is columnar ([`crate::TemporalEdgeList`]); this is
/// the per-row view handed out by iterators.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeView<'a> {
    /// Source node.
    pub src: NodeId,
    /// Destination node.
    pub dst: NodeId,
    /// Time at which the interaction occurred.
    pub ts: Timestamp,
    /// Edge feature vector (empty slice when the stream has no features).
    pub feat: &'a [f32],
    /// Edge label (1.0 for observed edges unless the source says otherwise).
    pub label: f32,
}

/// Row-major dense matrix of f32 features.
///
/// Used for edge features (one row per edge) and node label vectors
/// (one row per label event).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureMatrix {
    data: Vec<f32>,
    dim: usize,
}

impl FeatureMatrix {
    /// Create an empty matrix with the given row width.
    pub fn new(dim: usize) -> Self {
        Self { data: Vec::new(), dim }
    }

    /// Create from a flat row-major buffer.
    ///
    /// Returns `None` if the buffer length is not a multiple of `dim`.
    pub fn from_flat(data: Vec<f32>, dim: usize) -> Option<Self> {
        if dim == 0 || data.len() % dim != 0 {
            return None;
        }
        Some(Self { data, dim })
    }

    /// Row width.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of rows.
    pub fn num_rows(&self) -> usize {
        if self.dim == 0 {
            0
        } else {
            self.data.len() / self.dim
        }
    }

    /// Append a row. Panics in debug builds if the width is wrong; callers
    /// validate widths at ingestion boundaries.
    pub fn push_row(&mut self, row: &[f32]) {
        debug_assert_eq!(row.len(), self.dim);
        self.data.extend_from_slice(row);
    }

    /// Borrow row `i`.
    pub fn row(&self, i: usize) -> &[f32] {
        let start = i * self.dim;
        &self.data[start..start + self.dim]
    }

    /// Borrow a contiguous range of rows as one flat slice.
    pub fn rows(&self, range: std::ops::Range<usize>) -> &[f32] {
        &self.data[range.start * self.dim..range.end * self.dim]
    }

    /// Reorder rows according to `perm`, where `perm[i]` is the old index
    /// of the row that should land at position `i`.
    pub fn permute(&mut self, perm: &[usize]) {
        debug_assert_eq!(perm.len(), self.num_rows());
        let mut out = Vec::with_capacity(self.data.len());
        for &old in perm {
            out.extend_from_slice(self.row(old));
        }
        self.data = out;
    }

    /// Iterator over rows.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[f32]> {
        self.data.chunks_exact(self.dim)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_matrix_rows() {
        let mut m = FeatureMatrix::new(3);
        m.push_row(&[1.0, 2.0, 3.0]);
        m.push_row(&[4.0, 5.0, 6.0]);

        assert_eq!(m.num_rows(), 2);
        assert_eq!(m.row(1), &[4.0, 5.0, 6.0]);
        assert_eq!(m.rows(0..2).len(), 6);
    }

    #[test]
    fn test_feature_matrix_permute() {
        let mut m = FeatureMatrix::from_flat(vec![1.0, 2.0, 3.0, 4.0], 2).unwrap();
        m.permute(&[1, 0]);
        assert_eq!(m.row(0), &[3.0, 4.0]);
        assert_eq!(m.row(1), &[1.0, 2.0]);
    }

    #[test]
    fn test_from_flat_rejects_ragged() {
        assert!(FeatureMatrix::from_flat(vec![1.0, 2.0, 3.0], 2).is_none());
    }
}
