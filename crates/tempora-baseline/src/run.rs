//! Streaming evaluation loops.
//!
//! These wire the pieces together the way a benchmark run does:
//! loader yields batches in time order, the sampler supplies negatives,
//! the baseline produces scores, and the evaluator aggregates per split.
//! State (forecaster dictionaries, EdgeBank memory, the label cursor)
//! flows forward through train, then val, then test, and is never rolled
//! back.

use tracing::debug;

use tempora_core::{LabelCursor, Split, TemporalDataset};
use tempora_eval::{rank_average, Evaluator, LinkMetrics, Metric, MetricReport};
use tempora_sample::FixedNegativeSet;

use crate::edgebank::EdgeBank;
use crate::forecast::Forecaster;
use crate::Result;

/// Configuration for [`run_link_baseline`].
#[derive(Debug, Clone)]
pub struct LinkRunConfig {
    /// Edges per batch (default: 200).
    pub batch_size: usize,
    /// Pre-fill the memory with every edge from earlier splits
    /// (default: true).
    pub warm_memory: bool,
}

impl Default for LinkRunConfig {
    fn default() -> Self {
        Self {
            batch_size: 200,
            warm_memory: true,
        }
    }
}

impl LinkRunConfig {
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_warm_memory(mut self, warm: bool) -> Self {
        self.warm_memory = warm;
        self
    }
}

/// Evaluate an [`EdgeBank`] memory against a fixed negative set.
///
/// The split comes from the negative set itself. For each batch the
/// positive edge and its pre-generated negatives are scored, the
/// positive's average rank recorded, and only then is the batch folded
/// into the memory — a prediction never sees its own edge.
pub fn run_link_baseline(
    ds: &TemporalDataset,
    bank: &mut EdgeBank,
    negatives: &FixedNegativeSet,
    config: &LinkRunConfig,
) -> Result<LinkMetrics> {
    negatives.expect_dataset(ds.name())?;
    let split = negatives.split();
    let masks = ds.splits()?;
    let edges = ds.edges();

    if config.warm_memory {
        let earlier: &[Split] = match split {
            Split::Train => &[],
            Split::Val => &[Split::Train],
            Split::Test => &[Split::Train, Split::Val],
        };
        for &s in earlier {
            for i in masks.indices(s) {
                bank.update(edges.sources()[i], edges.destinations()[i], edges.timestamps()[i]);
            }
        }
        debug!(split = %split, memory = bank.len(), "warmed edge memory");
    }

    let loader = ds.loader(split, config.batch_size)?;
    let mut ranks = Vec::with_capacity(loader.num_edges());

    for batch in loader.iter() {
        let negs = negatives.query_batch(split, batch.src, batch.dst, batch.ts)?;

        for i in 0..batch.len() {
            let pos = bank.predict(batch.src[i], batch.dst[i]);
            let neg_scores: Vec<f32> = negs[i]
                .iter()
                .map(|&d| bank.predict(batch.src[i], d))
                .collect();
            ranks.push(rank_average(pos, &neg_scores));
        }

        bank.update_batch(batch.src, batch.dst, batch.ts);
    }

    let metrics = LinkMetrics::from_ranks(&ranks);
    debug!(split = %split, summary = %metrics.summary(), "link baseline split done");
    Ok(metrics)
}

/// Configuration for [`NodeBaselineRun`].
#[derive(Debug, Clone)]
pub struct NodeRunConfig {
    /// Edges per batch (default: 200).
    pub batch_size: usize,
    /// Cutoff for NDCG@k (default: 10).
    pub ndcg_k: usize,
}

impl Default for NodeRunConfig {
    fn default() -> Self {
        Self {
            batch_size: 200,
            ndcg_k: 10,
        }
    }
}

impl NodeRunConfig {
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_ndcg_k(mut self, k: usize) -> Self {
        self.ndcg_k = k;
        self
    }
}

/// Streaming node-property evaluation with a shared label cursor.
///
/// Splits are meant to be run in order (train, val, test) on one value:
/// the forecaster state and the label cursor carry across splits exactly
/// as the edge stream does. Within a label group each node is queried
/// before its observation is folded in, so no prediction uses
/// information from its own timestamp or later.
pub struct NodeBaselineRun<'a, F: Forecaster> {
    ds: &'a TemporalDataset,
    forecaster: F,
    cursor: LabelCursor<'a>,
    evaluator: Evaluator,
    config: NodeRunConfig,
}

impl<'a, F: Forecaster> NodeBaselineRun<'a, F> {
    /// Set up a run over a dataset with node label events.
    pub fn new(ds: &'a TemporalDataset, forecaster: F, config: NodeRunConfig) -> Result<Self> {
        let cursor = ds.node_labels()?.cursor();
        let evaluator = Evaluator::new(vec![Metric::Ndcg(config.ndcg_k)]);
        Ok(Self {
            ds,
            forecaster,
            cursor,
            evaluator,
            config,
        })
    }

    /// Stream one split, scoring every label group that falls due.
    pub fn run_split(&mut self, split: Split) -> Result<MetricReport> {
        let loader = self.ds.loader(split, self.config.batch_size)?;
        let mut reports = Vec::new();

        for batch in loader.iter() {
            let now = batch.last_ts();
            while let Some(group) = self.cursor.take_due(now) {
                let mut truths: Vec<&[f32]> = Vec::with_capacity(group.len());
                let mut preds: Vec<Vec<f32>> = Vec::with_capacity(group.len());

                for (node, observed) in group.iter() {
                    preds.push(self.forecaster.query(node));
                    self.forecaster.update(node, observed)?;
                    truths.push(observed);
                }

                let pred_refs: Vec<&[f32]> = preds.iter().map(|p| p.as_slice()).collect();
                reports.push(self.evaluator.eval_node(&truths, &pred_refs)?);
            }
        }

        let merged = MetricReport::merge(&reports);
        debug!(split = %split, summary = %merged.summary(), "node baseline split done");
        Ok(merged)
    }

    /// Rewind the label cursor for a fresh pass over the stream.
    pub fn reset_labels(&mut self) {
        self.cursor.reset();
    }

    /// Borrow the forecaster (e.g. to inspect tracked nodes).
    pub fn forecaster(&self) -> &F {
        &self.forecaster
    }

    /// Consume the run, returning the forecaster and its state.
    pub fn into_forecaster(self) -> F {
        self.forecaster
    }
}
