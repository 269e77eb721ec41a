//! Rank computation and rank-based link metrics.
//!
//! A positive edge is ranked against its sampled negative destinations.
//! Ties between the positive score and negative scores are handled with
//! three conventions:
//!
//! | Convention  | Rank of positive among ties        |
//! |-------------|------------------------------------|
//! | Optimistic  | Before all tied negatives          |
//! | Pessimistic | After all tied negatives           |
//! | Average     | Midpoint of the two (the standard) |
//!
//! The average convention is what the reported MRR/Hits@k use: a model
//! that scores everything identically earns the rank of a random
//! guesser instead of a perfect one.

use serde::{Deserialize, Serialize};

/// Rank with ties resolved in the positive's favor (1-based).
pub fn rank_optimistic(pos_score: f32, neg_scores: &[f32]) -> usize {
    1 + neg_scores.iter().filter(|&&s| s > pos_score).count()
}

/// Rank with ties resolved against the positive (1-based).
pub fn rank_pessimistic(pos_score: f32, neg_scores: &[f32]) -> usize {
    1 + neg_scores.iter().filter(|&&s| s >= pos_score).count()
}

/// Average of the optimistic and pessimistic ranks.
pub fn rank_average(pos_score: f32, neg_scores: &[f32]) -> f64 {
    let opt = rank_optimistic(pos_score, neg_scores) as f64;
    let pess = rank_pessimistic(pos_score, neg_scores) as f64;
    0.5 * (opt + pess)
}

/// Rank-based link-prediction metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkMetrics {
    /// Mean Reciprocal Rank: E\[1/rank\]
    pub mrr: f64,
    /// Mean Rank: E\[rank\]
    pub mean_rank: f64,
    /// Hits@1: P(rank <= 1)
    pub hits_at_1: f64,
    /// Hits@3: P(rank <= 3)
    pub hits_at_3: f64,
    /// Hits@10: P(rank <= 10)
    pub hits_at_10: f64,
    /// Number of queries evaluated
    pub num_queries: usize,
}

impl LinkMetrics {
    /// Compute metrics from a list of (possibly fractional) ranks.
    pub fn from_ranks(ranks: &[f64]) -> Self {
        if ranks.is_empty() {
            return Self::default();
        }

        let n = ranks.len() as f64;
        let mrr = ranks.iter().map(|&r| 1.0 / r).sum::<f64>() / n;
        let mean_rank = ranks.iter().sum::<f64>() / n;
        let hits_at_1 = ranks.iter().filter(|&&r| r <= 1.0).count() as f64 / n;
        let hits_at_3 = ranks.iter().filter(|&&r| r <= 3.0).count() as f64 / n;
        let hits_at_10 = ranks.iter().filter(|&&r| r <= 10.0).count() as f64 / n;

        Self {
            mrr,
            mean_rank,
            hits_at_1,
            hits_at_3,
            hits_at_10,
            num_queries: ranks.len(),
        }
    }

    /// Merge metrics from multiple batches, weighted by query count.
    pub fn merge(metrics: &[Self]) -> Self {
        let total: usize = metrics.iter().map(|m| m.num_queries).sum();
        if total == 0 {
            return Self::default();
        }
        let total_f = total as f64;

        let weighted = |f: fn(&Self) -> f64| {
            metrics
                .iter()
                .map(|m| f(m) * m.num_queries as f64)
                .sum::<f64>()
                / total_f
        };

        Self {
            mrr: weighted(|m| m.mrr),
            mean_rank: weighted(|m| m.mean_rank),
            hits_at_1: weighted(|m| m.hits_at_1),
            hits_at_3: weighted(|m| m.hits_at_3),
            hits_at_10: weighted(|m| m.hits_at_10),
            num_queries: total,
        }
    }

    /// Format as summary string.
    pub fn summary(&self) -> String {
        format!(
            "MRR: {:.4} | MR: {:.1} | H@1: {:.3} | H@3: {:.3} | H@10: {:.3} (n={})",
            self.mrr,
            self.mean_rank,
            self.hits_at_1,
            self.hits_at_3,
            self.hits_at_10,
            self.num_queries
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_conventions() {
        let negs = vec![0.9, 0.5, 0.5, 0.1];

        // Positive above everything.
        assert_eq!(rank_optimistic(1.0, &negs), 1);
        assert_eq!(rank_pessimistic(1.0, &negs), 1);

        // Positive tied with two negatives.
        assert_eq!(rank_optimistic(0.5, &negs), 2);
        assert_eq!(rank_pessimistic(0.5, &negs), 4);
        assert!((rank_average(0.5, &negs) - 3.0).abs() < 1e-12);

        // Positive below everything.
        assert_eq!(rank_pessimistic(0.0, &negs), 5);
    }

    #[test]
    fn test_all_tied_scores_rank_like_chance() {
        // 9 negatives all tied with the positive: average rank = 5.5.
        let negs = vec![0.5; 9];
        assert!((rank_average(0.5, &negs) - 5.5).abs() < 1e-12);
    }

    #[test]
    fn test_metrics_from_ranks() {
        let ranks = vec![1.0, 2.0, 3.0, 10.0, 100.0];
        let m = LinkMetrics::from_ranks(&ranks);

        assert!((m.mrr - 0.3886).abs() < 0.001);
        assert!((m.mean_rank - 23.2).abs() < 0.1);
        assert!((m.hits_at_1 - 0.2).abs() < 1e-6);
        assert!((m.hits_at_3 - 0.6).abs() < 1e-6);
        assert!((m.hits_at_10 - 0.8).abs() < 1e-6);
        assert_eq!(m.num_queries, 5);
    }

    #[test]
    fn test_metrics_empty() {
        let m = LinkMetrics::from_ranks(&[]);
        assert_eq!(m.num_queries, 0);
        assert_eq!(m.mrr, 0.0);
    }

    #[test]
    fn test_merge_weighted() {
        let a = LinkMetrics::from_ranks(&[1.0, 2.0, 4.0, 4.0]);
        let b = LinkMetrics::from_ranks(&[1.0]);
        let merged = LinkMetrics::merge(&[a.clone(), b]);

        assert_eq!(merged.num_queries, 5);
        let expected = (a.mrr * 4.0 + 1.0) / 5.0;
        assert!((merged.mrr - expected).abs() < 1e-12);
    }

    #[test]
    fn test_mrr_in_unit_interval() {
        let ranks = vec![1.0, 7.5, 300.0];
        let m = LinkMetrics::from_ranks(&ranks);
        assert!(m.mrr > 0.0 && m.mrr <= 1.0);
    }
}
