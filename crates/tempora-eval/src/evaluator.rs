//! Metric evaluation façade.

use serde::{Deserialize, Serialize};

use crate::ndcg::ndcg_at_k;
use crate::rank::rank_average;
use crate::{Error, Result};

/// A requested metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    /// Mean Reciprocal Rank (link queries).
    Mrr,
    /// Hits@k (link queries).
    HitsAt(usize),
    /// NDCG@k (node label queries).
    Ndcg(usize),
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Metric::Mrr => write!(f, "mrr"),
            Metric::HitsAt(k) => write!(f, "hits@{k}"),
            Metric::Ndcg(k) => write!(f, "ndcg@{k}"),
        }
    }
}

/// One metric's aggregated value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricValue {
    pub metric: Metric,
    pub value: f64,
}

/// Aggregated metric values for a batch or split of queries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricReport {
    entries: Vec<MetricValue>,
    num_queries: usize,
}

impl MetricReport {
    /// Look up one metric's value.
    pub fn get(&self, metric: Metric) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.metric == metric)
            .map(|e| e.value)
    }

    /// Iterate (metric, value) pairs in request order.
    pub fn iter(&self) -> impl Iterator<Item = &MetricValue> {
        self.entries.iter()
    }

    /// Number of queries aggregated into the values.
    pub fn num_queries(&self) -> usize {
        self.num_queries
    }

    /// Merge reports, weighting each metric by query count.
    ///
    /// All reports must carry the same metrics in the same order (they do
    /// when produced by one evaluator); empty reports are skipped.
    pub fn merge(reports: &[Self]) -> Self {
        let total: usize = reports.iter().map(|r| r.num_queries).sum();
        if total == 0 {
            return Self::default();
        }

        let template = reports
            .iter()
            .find(|r| !r.entries.is_empty())
            .map(|r| r.entries.as_slice())
            .unwrap_or(&[]);

        let entries = template
            .iter()
            .enumerate()
            .map(|(i, e)| MetricValue {
                metric: e.metric,
                value: reports
                    .iter()
                    .filter(|r| !r.entries.is_empty())
                    .map(|r| r.entries[i].value * r.num_queries as f64)
                    .sum::<f64>()
                    / total as f64,
            })
            .collect();

        Self {
            entries,
            num_queries: total,
        }
    }

    /// Format as summary string.
    pub fn summary(&self) -> String {
        let parts: Vec<String> = self
            .entries
            .iter()
            .map(|e| format!("{}: {:.4}", e.metric, e.value))
            .collect();
        format!("{} (n={})", parts.join(" | "), self.num_queries)
    }
}

/// Scores query batches with a fixed set of requested metrics.
///
/// Mirrors the benchmark protocol: link queries rank one positive score
/// against its sampled negatives (average-rank tie handling), node
/// queries compare a predicted label vector against the observed one.
/// Aggregation is the mean over queries, so the result is invariant to
/// query order.
///
/// # Example
///
/// ```rust
/// use tempora_eval::{Evaluator, Metric};
///
/// let eval = Evaluator::for_link_prediction();
/// let report = eval
///     .eval_link(&[0.9, 0.2], &[&[0.1, 0.3], &[0.5, 0.4]])
///     .unwrap();
///
/// assert!(report.get(Metric::Mrr).unwrap() > 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct Evaluator {
    metrics: Vec<Metric>,
}

impl Evaluator {
    /// Evaluator for an explicit metric list.
    pub fn new(metrics: Vec<Metric>) -> Self {
        Self { metrics }
    }

    /// Standard link-prediction metrics: MRR and Hits@{1,3,10}.
    pub fn for_link_prediction() -> Self {
        Self::new(vec![
            Metric::Mrr,
            Metric::HitsAt(1),
            Metric::HitsAt(3),
            Metric::HitsAt(10),
        ])
    }

    /// Standard node-property metric: NDCG@10.
    pub fn for_node_prediction() -> Self {
        Self::new(vec![Metric::Ndcg(10)])
    }

    /// Requested metrics.
    pub fn metrics(&self) -> &[Metric] {
        &self.metrics
    }

    /// Average-rank of each positive against its negatives.
    ///
    /// Exposed for callers that aggregate ranks themselves (e.g. via
    /// [`crate::LinkMetrics`]).
    pub fn link_ranks(&self, pos: &[f32], negs: &[&[f32]]) -> Result<Vec<f64>> {
        if pos.len() != negs.len() {
            return Err(Error::LengthMismatch(pos.len(), negs.len()));
        }
        for (i, n) in negs.iter().enumerate() {
            if n.is_empty() {
                return Err(Error::EmptyCandidates(i));
            }
        }
        Ok(pos
            .iter()
            .zip(negs)
            .map(|(&p, n)| rank_average(p, n))
            .collect())
    }

    /// Score a batch of link queries.
    pub fn eval_link(&self, pos: &[f32], negs: &[&[f32]]) -> Result<MetricReport> {
        let ranks = self.link_ranks(pos, negs)?;
        let n = ranks.len() as f64;

        let mut entries = Vec::with_capacity(self.metrics.len());
        for &metric in &self.metrics {
            let value = match metric {
                Metric::Mrr => {
                    if ranks.is_empty() {
                        0.0
                    } else {
                        ranks.iter().map(|&r| 1.0 / r).sum::<f64>() / n
                    }
                }
                Metric::HitsAt(k) => {
                    if ranks.is_empty() {
                        0.0
                    } else {
                        ranks.iter().filter(|&&r| r <= k as f64).count() as f64 / n
                    }
                }
                Metric::Ndcg(_) => {
                    return Err(Error::UnsupportedMetric {
                        metric: metric.to_string(),
                        task: "link",
                    })
                }
            };
            entries.push(MetricValue { metric, value });
        }

        Ok(MetricReport {
            entries,
            num_queries: ranks.len(),
        })
    }

    /// Score a batch of node label queries.
    pub fn eval_node(&self, y_true: &[&[f32]], y_pred: &[&[f32]]) -> Result<MetricReport> {
        if y_true.len() != y_pred.len() {
            return Err(Error::LengthMismatch(y_true.len(), y_pred.len()));
        }
        for (i, (t, p)) in y_true.iter().zip(y_pred).enumerate() {
            if t.len() != p.len() {
                return Err(Error::WidthMismatch {
                    query: i,
                    truth: t.len(),
                    pred: p.len(),
                });
            }
        }

        let n = y_true.len() as f64;
        let mut entries = Vec::with_capacity(self.metrics.len());
        for &metric in &self.metrics {
            let value = match metric {
                Metric::Ndcg(k) => {
                    if y_true.is_empty() {
                        0.0
                    } else {
                        y_true
                            .iter()
                            .zip(y_pred)
                            .map(|(t, p)| ndcg_at_k(t, p, k))
                            .sum::<f64>()
                            / n
                    }
                }
                Metric::Mrr | Metric::HitsAt(_) => {
                    return Err(Error::UnsupportedMetric {
                        metric: metric.to_string(),
                        task: "node",
                    })
                }
            };
            entries.push(MetricValue { metric, value });
        }

        Ok(MetricReport {
            entries,
            num_queries: y_true.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eval_link_perfect() {
        let eval = Evaluator::for_link_prediction();
        let report = eval
            .eval_link(&[1.0, 1.0], &[&[0.1, 0.2], &[0.0, 0.3]])
            .unwrap();

        assert!((report.get(Metric::Mrr).unwrap() - 1.0).abs() < 1e-12);
        assert!((report.get(Metric::HitsAt(1)).unwrap() - 1.0).abs() < 1e-12);
        assert_eq!(report.num_queries(), 2);
    }

    #[test]
    fn test_eval_link_tied_scores() {
        // Positive tied with all 9 negatives: rank 5.5.
        let negs = vec![0.5f32; 9];
        let eval = Evaluator::new(vec![Metric::Mrr, Metric::HitsAt(10)]);
        let report = eval.eval_link(&[0.5], &[&negs]).unwrap();

        assert!((report.get(Metric::Mrr).unwrap() - 1.0 / 5.5).abs() < 1e-12);
        assert!((report.get(Metric::HitsAt(10)).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_eval_link_rejects_shape_mismatch() {
        let eval = Evaluator::for_link_prediction();
        assert!(matches!(
            eval.eval_link(&[1.0, 0.5], &[&[0.1][..]]),
            Err(Error::LengthMismatch(2, 1))
        ));
        assert!(matches!(
            eval.eval_link(&[1.0], &[&[][..]]),
            Err(Error::EmptyCandidates(0))
        ));
    }

    #[test]
    fn test_eval_link_rejects_ndcg() {
        let eval = Evaluator::new(vec![Metric::Ndcg(10)]);
        assert!(eval.eval_link(&[1.0], &[&[0.5][..]]).is_err());
    }

    #[test]
    fn test_eval_node() {
        let eval = Evaluator::for_node_prediction();
        let truth: Vec<&[f32]> = vec![&[1.0, 0.0], &[0.0, 1.0]];
        let pred: Vec<&[f32]> = vec![&[0.9, 0.1], &[0.8, 0.2]];
        let report = eval.eval_node(&truth, &pred).unwrap();

        let v = report.get(Metric::Ndcg(10)).unwrap();
        assert!(v > 0.0 && v <= 1.0);
        // First query is perfectly ranked, second is inverted.
        assert!(v < 1.0);
    }

    #[test]
    fn test_eval_node_rejects_width_mismatch() {
        let eval = Evaluator::for_node_prediction();
        let truth: Vec<&[f32]> = vec![&[1.0, 0.0]];
        let pred: Vec<&[f32]> = vec![&[0.9]];
        assert!(matches!(
            eval.eval_node(&truth, &pred),
            Err(Error::WidthMismatch { .. })
        ));
    }

    #[test]
    fn test_report_merge_weighted() {
        let eval = Evaluator::new(vec![Metric::Mrr]);
        let a = eval.eval_link(&[1.0], &[&[0.5][..]]).unwrap(); // mrr 1.0
        let b = eval
            .eval_link(&[0.0, 0.0], &[&[0.5][..], &[0.5][..]])
            .unwrap(); // mrr 0.5 each

        let merged = MetricReport::merge(&[a, b]);
        assert_eq!(merged.num_queries(), 3);
        assert!((merged.get(Metric::Mrr).unwrap() - (1.0 + 0.5 + 0.5) / 3.0).abs() < 1e-12);
    }
}
