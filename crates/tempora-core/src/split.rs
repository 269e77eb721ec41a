//! Chronological train/validation/test splits.

use serde::{Deserialize, Serialize};

use crate::edge::Timestamp;
use crate::{Error, Result};

/// Which partition of the edge stream a consumer is working on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Split {
    /// Earliest edges, used for model fitting and baseline warm-up.
    Train,
    /// Middle band, used for checkpoint selection.
    Val,
    /// Latest edges, used for final reporting.
    Test,
}

impl Split {
    /// Stable lowercase tag, used in file names and reports.
    pub fn tag(&self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Val => "val",
            Split::Test => "test",
        }
    }
}

impl std::fmt::Display for Split {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// Boolean membership masks over the edge stream.
///
/// Built chronologically: the cut points are quantiles of the timestamp
/// column, so earlier edges train and later edges evaluate. The three
/// masks are pairwise disjoint and cover every edge by construction;
/// [`SplitMasks::validate`] re-checks this for masks loaded from elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitMasks {
    train: Vec<bool>,
    val: Vec<bool>,
    test: Vec<bool>,
    /// Largest timestamp still in train.
    val_time: Timestamp,
    /// Largest timestamp still in val.
    test_time: Timestamp,
}

impl SplitMasks {
    /// Split a time-sorted timestamp column by ratio.
    ///
    /// `val_ratio` and `test_ratio` are fractions of edges reserved for
    /// validation and test; the cut points are the
    /// `1 - val_ratio - test_ratio` and `1 - test_ratio` quantiles of the
    /// timestamps (linear interpolation). Edges with a timestamp at or
    /// below a cut stay in the earlier split, so edges sharing a timestamp
    /// never straddle splits.
    pub fn from_ratios(ts: &[Timestamp], val_ratio: f64, test_ratio: f64) -> Result<Self> {
        if ts.is_empty() {
            return Err(Error::EmptyDataset(String::new()));
        }
        if !(0.0..1.0).contains(&val_ratio)
            || !(0.0..1.0).contains(&test_ratio)
            || val_ratio + test_ratio >= 1.0
        {
            return Err(Error::InvalidRatio {
                val: val_ratio,
                test: test_ratio,
            });
        }
        if !ts.windows(2).all(|w| w[0] <= w[1]) {
            return Err(Error::Unsorted);
        }

        let val_time = quantile(ts, 1.0 - val_ratio - test_ratio);
        let test_time = quantile(ts, 1.0 - test_ratio);

        let train: Vec<bool> = ts.iter().map(|&t| (t as f64) <= val_time).collect();
        let val: Vec<bool> = ts
            .iter()
            .map(|&t| (t as f64) > val_time && (t as f64) <= test_time)
            .collect();
        let test: Vec<bool> = ts.iter().map(|&t| (t as f64) > test_time).collect();

        Ok(Self {
            train,
            val,
            test,
            val_time: val_time.floor() as Timestamp,
            test_time: test_time.floor() as Timestamp,
        })
    }

    /// Number of edges covered by the masks.
    pub fn len(&self) -> usize {
        self.train.len()
    }

    /// True when the masks cover no edges.
    pub fn is_empty(&self) -> bool {
        self.train.is_empty()
    }

    /// Membership mask for one split.
    pub fn mask(&self, split: Split) -> &[bool] {
        match split {
            Split::Train => &self.train,
            Split::Val => &self.val,
            Split::Test => &self.test,
        }
    }

    /// Edge indices belonging to one split, in stream order.
    pub fn indices(&self, split: Split) -> Vec<usize> {
        self.mask(split)
            .iter()
            .enumerate()
            .filter_map(|(i, &m)| m.then_some(i))
            .collect()
    }

    /// Number of edges in one split.
    pub fn count(&self, split: Split) -> usize {
        self.mask(split).iter().filter(|&&m| m).count()
    }

    /// Latest timestamp assigned to train.
    pub fn val_cut(&self) -> Timestamp {
        self.val_time
    }

    /// Latest timestamp assigned to val.
    pub fn test_cut(&self) -> Timestamp {
        self.test_time
    }

    /// Check that the masks are pairwise disjoint and cover every edge.
    pub fn validate(&self) -> Result<()> {
        if self.val.len() != self.train.len() || self.test.len() != self.train.len() {
            return Err(Error::DimensionMismatch {
                expected: self.train.len(),
                got: self.val.len().max(self.test.len()),
            });
        }
        for i in 0..self.train.len() {
            let members = self.train[i] as u8 + self.val[i] as u8 + self.test[i] as u8;
            if members != 1 {
                return Err(Error::MaskNotPartition(i));
            }
        }
        Ok(())
    }
}

/// Linear-interpolation quantile of a sorted timestamp column.
fn quantile(sorted_ts: &[Timestamp], q: f64) -> f64 {
    let n = sorted_ts.len();
    if n == 1 {
        return sorted_ts[0] as f64;
    }
    let pos = q * (n - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    let a = sorted_ts[lo] as f64;
    let b = sorted_ts[hi] as f64;
    a + frac * (b - a)
}
