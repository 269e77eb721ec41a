//! Dataset bundle: edge stream + splits + optional node labels.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::edge::{NodeId, Timestamp};
use crate::formats;
use crate::label::NodeLabelEvents;
use crate::loader::TemporalLoader;
use crate::split::{Split, SplitMasks};
use crate::stream::TemporalEdgeList;
use crate::{Error, Result};

/// A named temporal-graph dataset.
///
/// Bundles the sorted edge stream with its chronological split masks and,
/// for property-prediction tasks, the node label events. Split masks are
/// optional until generated; accessors fail fast when they are missing so
/// an evaluation run cannot silently use the full stream.
///
/// # Example
///
/// ```rust,ignore
/// use tempora_core::{Split, TemporalDataset};
///
/// let mut ds = TemporalDataset::from_csv_file("wiki", "wiki_edges.csv")?;
/// ds.generate_splits(0.15, 0.15)?;
///
/// let loader = ds.loader(Split::Test, 200)?;
/// for batch in loader.iter() {
///     // score batch.src/batch.dst/batch.ts ...
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemporalDataset {
    name: String,
    edges: TemporalEdgeList,
    splits: Option<SplitMasks>,
    node_labels: Option<NodeLabelEvents>,
}

impl TemporalDataset {
    /// Wrap an edge stream. The stream is sorted if it is not already.
    pub fn new(name: impl Into<String>, mut edges: TemporalEdgeList) -> Self {
        edges.sort_by_time();
        Self {
            name: name.into(),
            edges,
            splits: None,
            node_labels: None,
        }
    }

    /// Load the edge stream from a headered CSV file.
    pub fn from_csv_file(name: impl Into<String>, path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let edges = formats::read_edges(BufReader::new(file))?;
        Ok(Self::new(name, edges))
    }

    /// Attach node label events from a headered CSV file.
    pub fn load_node_labels_csv(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let file = File::open(path)?;
        self.node_labels = Some(formats::read_node_labels(BufReader::new(file))?);
        Ok(())
    }

    /// Attach pre-built node label events.
    pub fn set_node_labels(&mut self, events: NodeLabelEvents) {
        self.node_labels = Some(events);
    }

    /// Generate chronological split masks from ratios.
    pub fn generate_splits(&mut self, val_ratio: f64, test_ratio: f64) -> Result<()> {
        if self.edges.is_empty() {
            return Err(Error::EmptyDataset(self.name.clone()));
        }
        self.splits = Some(SplitMasks::from_ratios(
            self.edges.timestamps(),
            val_ratio,
            test_ratio,
        )?);
        Ok(())
    }

    /// Dataset name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The sorted edge stream.
    pub fn edges(&self) -> &TemporalEdgeList {
        &self.edges
    }

    /// Split masks, failing fast when not yet generated.
    pub fn splits(&self) -> Result<&SplitMasks> {
        self.splits.as_ref().ok_or(Error::SplitNotLoaded)
    }

    /// Node label events, failing fast when the dataset has none.
    pub fn node_labels(&self) -> Result<&NodeLabelEvents> {
        self.node_labels
            .as_ref()
            .ok_or_else(|| Error::LabelsNotLoaded(self.name.clone()))
    }

    /// Whether node label events are attached.
    pub fn has_node_labels(&self) -> bool {
        self.node_labels.is_some()
    }

    /// Batch loader over one split.
    pub fn loader(&self, split: Split, batch_size: usize) -> Result<TemporalLoader<'_>> {
        TemporalLoader::for_split(&self.edges, self.splits()?, split, batch_size)
    }

    /// Summary statistics for reports.
    pub fn stats(&self) -> DatasetStats {
        let (min_time, max_time) = self.edges.time_range().unwrap_or((0, 0));
        DatasetStats {
            name: self.name.clone(),
            num_edges: self.edges.len(),
            num_nodes: self.edges.num_nodes(),
            min_time,
            max_time,
            feat_dim: self.edges.features().map_or(0, |m| m.dim()),
            train_edges: self.splits.as_ref().map(|s| s.count(Split::Train)),
            val_edges: self.splits.as_ref().map(|s| s.count(Split::Val)),
            test_edges: self.splits.as_ref().map(|s| s.count(Split::Test)),
            num_label_events: self.node_labels.as_ref().map(|l| l.len()),
            num_classes: self.node_labels.as_ref().map(|l| l.num_classes()),
        }
    }

    /// Destination-node universe, used by negative samplers.
    pub fn unique_destinations(&self) -> Vec<NodeId> {
        self.edges.unique_destinations()
    }

    /// Save the whole dataset (stream + splits + labels) as a binary cache.
    #[cfg(feature = "binary")]
    pub fn to_cache_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = std::io::BufWriter::new(file);
        bincode::serialize_into(&mut writer, self)?;
        Ok(())
    }

    /// Load a dataset from a binary cache, rebuilding derived indices.
    #[cfg(feature = "binary")]
    pub fn from_cache_file(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let mut ds: Self = bincode::deserialize_from(reader)?;
        ds.edges.rebuild_adjacency();
        Ok(ds)
    }
}

/// Report-friendly dataset summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetStats {
    pub name: String,
    pub num_edges: usize,
    pub num_nodes: usize,
    pub min_time: Timestamp,
    pub max_time: Timestamp,
    pub feat_dim: usize,
    pub train_edges: Option<usize>,
    pub val_edges: Option<usize>,
    pub test_edges: Option<usize>,
    pub num_label_events: Option<usize>,
    pub num_classes: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_dataset() -> TemporalDataset {
        let mut edges = TemporalEdgeList::new();
        for t in 0..100u64 {
            edges.push(t % 5, (t % 7) + 5, t, None, 1.0).unwrap();
        }
        TemporalDataset::new("toy", edges)
    }

    #[test]
    fn test_splits_fail_fast_before_generation() {
        let ds = sample_dataset();
        assert!(matches!(ds.splits(), Err(Error::SplitNotLoaded)));
        assert!(ds.loader(Split::Train, 10).is_err());
    }

    #[test]
    fn test_generate_and_batch() {
        let mut ds = sample_dataset();
        ds.generate_splits(0.15, 0.15).unwrap();

        let loader = ds.loader(Split::Train, 16).unwrap();
        let total: usize = loader.iter().map(|b| b.len()).sum();
        assert_eq!(total, ds.splits().unwrap().count(Split::Train));
    }

    #[test]
    fn test_labels_fail_fast_when_absent() {
        let ds = sample_dataset();
        assert!(matches!(ds.node_labels(), Err(Error::LabelsNotLoaded(_))));
    }

    #[test]
    fn test_stats() {
        let mut ds = sample_dataset();
        ds.generate_splits(0.15, 0.15).unwrap();
        let stats = ds.stats();

        assert_eq!(stats.num_edges, 100);
        assert_eq!(stats.min_time, 0);
        assert_eq!(stats.max_time, 99);
        assert_eq!(
            stats.train_edges.unwrap() + stats.val_edges.unwrap() + stats.test_edges.unwrap(),
            100
        );
    }

    #[cfg(feature = "binary")]
    #[test]
    fn test_cache_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("toy.bin");

        let mut ds = sample_dataset();
        ds.generate_splits(0.15, 0.15).unwrap();
        ds.to_cache_file(&path).unwrap();

        let back = TemporalDataset::from_cache_file(&path).unwrap();
        assert_eq!(back.name(), "toy");
        assert_eq!(back.edges().len(), 100);
        // Adjacency is rebuilt, not serialized.
        assert_eq!(back.edges().out_degree(0), ds.edges().out_degree(0));
        back.splits().unwrap().validate().unwrap();
    }
}
