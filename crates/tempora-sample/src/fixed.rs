//! Pre-generated negative sets for validation and test.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use tempora_core::{NodeId, Split, Timestamp};

use crate::{Error, Result};

/// Negatives for one positive edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NegativeRecord {
    /// Positive source.
    pub src: NodeId,
    /// Positive destination (never present in `negatives`).
    pub dst: NodeId,
    /// Positive timestamp.
    pub ts: Timestamp,
    /// Negative destination candidates.
    pub negatives: Vec<NodeId>,
}

/// A fixed set of negative destinations for every positive edge of one
/// evaluation split.
///
/// Evaluation must score every run against identical negatives, so these
/// sets are generated once, written to disk, and loaded back verbatim.
/// Records are keyed by the full positive edge `(src, dst, ts)`; lookups
/// that miss are hard errors rather than silent resamples.
///
/// Files are JSON (`.json`) or bincode (`.bin`), chosen by extension. The
/// lookup index is rebuilt on load, not serialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixedNegativeSet {
    dataset: String,
    split: Split,
    /// Target number of negatives per positive; individual records may be
    /// shorter when the candidate pool ran out.
    num_neg: usize,
    records: Vec<NegativeRecord>,

    #[serde(skip, default)]
    index: HashMap<(NodeId, NodeId, Timestamp), usize>,
}

impl FixedNegativeSet {
    /// Create an empty set for one dataset and split.
    pub fn new(dataset: impl Into<String>, split: Split, num_neg: usize) -> Self {
        Self {
            dataset: dataset.into(),
            split,
            num_neg,
            records: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Dataset the set was generated for.
    pub fn dataset(&self) -> &str {
        &self.dataset
    }

    /// Split the set was generated for.
    pub fn split(&self) -> Split {
        self.split
    }

    /// Target negatives per positive edge.
    pub fn num_neg(&self) -> usize {
        self.num_neg
    }

    /// Number of positive edges covered.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when no records have been added.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Insert a record. Re-inserting a positive edge replaces its
    /// negatives, so duplicate interactions collapse to one entry.
    pub fn insert(&mut self, record: NegativeRecord) {
        let key = (record.src, record.dst, record.ts);
        match self.index.get(&key) {
            Some(&i) => self.records[i] = record,
            None => {
                self.index.insert(key, self.records.len());
                self.records.push(record);
            }
        }
    }

    /// Iterate records in generation order.
    pub fn records(&self) -> impl Iterator<Item = &NegativeRecord> {
        self.records.iter()
    }

    /// Negatives for one positive edge, if present.
    pub fn get(&self, src: NodeId, dst: NodeId, ts: Timestamp) -> Option<&[NodeId]> {
        self.index
            .get(&(src, dst, ts))
            .map(|&i| self.records[i].negatives.as_slice())
    }

    /// Negatives for a batch of positive edges.
    ///
    /// Fails fast when queried with the wrong split, when columns
    /// disagree in length, or when any edge has no pre-generated
    /// negatives.
    pub fn query_batch<'a>(
        &'a self,
        split: Split,
        src: &[NodeId],
        dst: &[NodeId],
        ts: &[Timestamp],
    ) -> Result<Vec<&'a [NodeId]>> {
        if split != self.split {
            return Err(Error::SplitMismatch {
                expected: self.split,
                got: split,
            });
        }
        if src.len() != dst.len() {
            return Err(Error::LengthMismatch(src.len(), dst.len()));
        }
        if src.len() != ts.len() {
            return Err(Error::LengthMismatch(src.len(), ts.len()));
        }

        let mut out = Vec::with_capacity(src.len());
        for i in 0..src.len() {
            let negs = self
                .get(src[i], dst[i], ts[i])
                .ok_or(Error::EdgeNotFound {
                    src: src[i],
                    dst: dst[i],
                    ts: ts[i],
                })?;
            out.push(negs);
        }
        Ok(out)
    }

    /// Check the set belongs to `dataset`.
    pub fn expect_dataset(&self, dataset: &str) -> Result<()> {
        if self.dataset != dataset {
            return Err(Error::DatasetMismatch {
                expected: self.dataset.clone(),
                got: dataset.to_string(),
            });
        }
        Ok(())
    }

    /// Write to `.json` or `.bin`, chosen by extension.
    pub fn save_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        match format_of(path)? {
            FileFormat::Json => serde_json::to_writer(writer, self)?,
            FileFormat::Binary => bincode::serialize_into(writer, self)?,
        }
        Ok(())
    }

    /// Load from `.json` or `.bin`, rebuilding the lookup index.
    pub fn load_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let mut set: Self = match format_of(path)? {
            FileFormat::Json => serde_json::from_reader(reader)?,
            FileFormat::Binary => bincode::deserialize_from(reader)?,
        };
        set.rebuild_index();
        Ok(set)
    }

    fn rebuild_index(&mut self) {
        self.index.clear();
        for (i, r) in self.records.iter().enumerate() {
            self.index.insert((r.src, r.dst, r.ts), i);
        }
    }
}

enum FileFormat {
    Json,
    Binary,
}

fn format_of(path: &Path) -> Result<FileFormat> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => Ok(FileFormat::Json),
        Some("bin") => Ok(FileFormat::Binary),
        other => Err(Error::UnknownFormat(other.unwrap_or("").to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FixedNegativeSet {
        let mut set = FixedNegativeSet::new("toy", Split::Val, 3);
        set.insert(NegativeRecord {
            src: 0,
            dst: 1,
            ts: 100,
            negatives: vec![2, 3, 4],
        });
        set.insert(NegativeRecord {
            src: 5,
            dst: 6,
            ts: 200,
            negatives: vec![7, 8],
        });
        set
    }

    #[test]
    fn test_query_batch() {
        let set = sample();
        let negs = set
            .query_batch(Split::Val, &[0, 5], &[1, 6], &[100, 200])
            .unwrap();
        assert_eq!(negs[0], &[2, 3, 4]);
        assert_eq!(negs[1], &[7, 8]);
    }

    #[test]
    fn test_wrong_split_rejected() {
        let set = sample();
        assert!(matches!(
            set.query_batch(Split::Test, &[0], &[1], &[100]),
            Err(Error::SplitMismatch { .. })
        ));
    }

    #[test]
    fn test_missing_edge_rejected() {
        let set = sample();
        assert!(matches!(
            set.query_batch(Split::Val, &[9], &[9], &[9]),
            Err(Error::EdgeNotFound { .. })
        ));
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let set = sample();
        assert!(matches!(
            set.query_batch(Split::Val, &[0, 5], &[1], &[100]),
            Err(Error::LengthMismatch(2, 1))
        ));
    }

    #[test]
    fn test_dataset_check() {
        let set = sample();
        assert!(set.expect_dataset("toy").is_ok());
        assert!(set.expect_dataset("other").is_err());
    }

    #[test]
    fn test_json_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("val_ns.json");

        let set = sample();
        set.save_file(&path).unwrap();
        let back = FixedNegativeSet::load_file(&path).unwrap();

        assert_eq!(back.len(), 2);
        assert_eq!(back.get(0, 1, 100).unwrap(), &[2, 3, 4]);
        assert_eq!(back.split(), Split::Val);
    }

    #[test]
    fn test_binary_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("val_ns.bin");

        let set = sample();
        set.save_file(&path).unwrap();
        let back = FixedNegativeSet::load_file(&path).unwrap();
        assert_eq!(back.get(5, 6, 200).unwrap(), &[7, 8]);
    }

    #[test]
    fn test_unknown_extension_rejected() {
        let set = sample();
        assert!(matches!(
            set.save_file("negatives.pkl"),
            Err(Error::UnknownFormat(_))
        ));
    }
}
