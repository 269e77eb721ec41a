//! Temporal-graph dataset primitives.
//!
//! Provides the data layer for streaming link- and node-property
//! prediction benchmarks:
//! - Columnar temporal edge streams with features and labels
//! - Chronological train/val/test split masks
//! - Node label events with a no-lookahead cursor
//! - Fixed-size temporal batch loading
//! - CSV ingestion and binary caching
//!
//! # Stream model
//!
//! Edges are interactions `(src, dst, ts)` ordered by timestamp. All
//! downstream consumers (splits, loaders, negative samplers, baselines)
//! rely on that order, so the stream is sorted once at ingestion and the
//! order is treated as an invariant afterwards.
//!
//! # Example
//!
//! ```rust
//! use tempora_core::{Split, TemporalDataset, TemporalEdgeList};
//!
//! let mut edges = TemporalEdgeList::new();
//! for t in 0..100u64 {
//!     edges.push(t % 3, 3 + (t % 4), t, None, 1.0).unwrap();
//! }
//!
//! let mut ds = TemporalDataset::new("toy", edges);
//! ds.generate_splits(0.15, 0.15).unwrap();
//!
//! let loader = ds.loader(Split::Val, 8).unwrap();
//! for batch in loader.iter() {
//!     assert!(batch.len() <= 8);
//! }
//! ```

mod dataset;
mod edge;
mod error;
pub mod formats;
mod label;
mod loader;
mod split;
mod stream;

pub use dataset::{DatasetStats, TemporalDataset};
pub use edge::{EdgeView, FeatureMatrix, NodeId, Timestamp};
pub use error::{Error, Result};
pub use label::{LabelCursor, LabelGroup, NodeLabelEvents};
pub use loader::{Batches, EdgeBatch, TemporalLoader};
pub use split::{Split, SplitMasks};
pub use stream::TemporalEdgeList;
