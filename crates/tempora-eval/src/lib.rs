//! Ranking metrics for temporal-graph benchmarks.
//!
//! Implements the metrics used by streaming link- and node-property
//! prediction protocols:
//!
//! | Metric  | Range  | Task | Description                         |
//! |---------|--------|------|-------------------------------------|
//! | MRR     | (0, 1] | link | Mean Reciprocal Rank: E\[1/rank\]   |
//! | Hits@k  | [0, 1] | link | Fraction with rank <= k             |
//! | NDCG@k  | [0, 1] | node | Discounted gain of top-k classes    |
//!
//! Link ranks use the average of the optimistic and pessimistic rank, so
//! constant scorers earn chance-level MRR rather than a perfect one.
//! NDCG breaks prediction ties by stable input order. All aggregation is
//! the mean over queries: permuting query order never changes a reported
//! value.

mod error;
mod evaluator;
mod ndcg;
mod rank;

pub use error::{Error, Result};
pub use evaluator::{Evaluator, Metric, MetricReport, MetricValue};
pub use ndcg::ndcg_at_k;
pub use rank::{rank_average, rank_optimistic, rank_pessimistic, LinkMetrics};
