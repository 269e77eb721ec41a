//! Property-based tests for metric invariants.
//!
//! - MRR, Hits@k and NDCG always lie in [0, 1]
//! - Aggregated means are invariant under query permutation
//! - Rank conventions are consistently ordered

use proptest::prelude::*;

use tempora_eval::{
    ndcg_at_k, rank_average, rank_optimistic, rank_pessimistic, Evaluator, LinkMetrics, Metric,
};

fn arb_score() -> impl Strategy<Value = f32> {
    -100.0f32..100.0
}

fn arb_queries() -> impl Strategy<Value = Vec<(f32, Vec<f32>)>> {
    prop::collection::vec(
        (arb_score(), prop::collection::vec(arb_score(), 1..30)),
        1..40,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn rank_conventions_ordered(
        pos in arb_score(),
        negs in prop::collection::vec(arb_score(), 1..50),
    ) {
        let opt = rank_optimistic(pos, &negs);
        let pess = rank_pessimistic(pos, &negs);
        let avg = rank_average(pos, &negs);

        prop_assert!(opt >= 1);
        prop_assert!(pess <= negs.len() + 1);
        prop_assert!(opt <= pess);
        prop_assert!(avg >= opt as f64 && avg <= pess as f64);
    }

    #[test]
    fn link_metrics_in_unit_interval(queries in arb_queries()) {
        let pos: Vec<f32> = queries.iter().map(|q| q.0).collect();
        let negs: Vec<&[f32]> = queries.iter().map(|q| q.1.as_slice()).collect();

        let eval = Evaluator::for_link_prediction();
        let report = eval.eval_link(&pos, &negs).unwrap();

        for entry in report.iter() {
            prop_assert!(
                (0.0..=1.0).contains(&entry.value),
                "{} = {} out of range",
                entry.metric, entry.value
            );
        }
        prop_assert!(report.get(Metric::Mrr).unwrap() > 0.0);
    }

    #[test]
    fn link_mean_invariant_under_permutation(
        queries in arb_queries(),
        seed in 0usize..1_000,
    ) {
        let eval = Evaluator::for_link_prediction();

        let pos: Vec<f32> = queries.iter().map(|q| q.0).collect();
        let negs: Vec<&[f32]> = queries.iter().map(|q| q.1.as_slice()).collect();
        let base = eval.eval_link(&pos, &negs).unwrap();

        // Deterministic shuffle of query order.
        let mut shuffled: Vec<&(f32, Vec<f32>)> = queries.iter().collect();
        let n = shuffled.len();
        for i in (1..n).rev() {
            shuffled.swap(i, (seed * 31 + i * 17) % (i + 1));
        }
        let pos2: Vec<f32> = shuffled.iter().map(|q| q.0).collect();
        let negs2: Vec<&[f32]> = shuffled.iter().map(|q| q.1.as_slice()).collect();
        let perm = eval.eval_link(&pos2, &negs2).unwrap();

        for (a, b) in base.iter().zip(perm.iter()) {
            prop_assert!((a.value - b.value).abs() < 1e-9,
                "{} changed under permutation: {} vs {}", a.metric, a.value, b.value);
        }
    }

    #[test]
    fn ndcg_in_unit_interval(
        rows in prop::collection::vec(
            prop::collection::vec(0.0f32..10.0, 1..20),
            1..20,
        ),
        k in 1usize..25,
    ) {
        for y_true in &rows {
            // Predict with reversed relevances as a worst-ish case.
            let y_pred: Vec<f32> = y_true.iter().rev().copied().collect();
            let v = ndcg_at_k(y_true, &y_pred, k);
            prop_assert!((0.0..=1.0).contains(&v), "ndcg {} out of range", v);
        }
    }

    #[test]
    fn ndcg_perfect_prediction_is_maximal(
        y_true in prop::collection::vec(0.0f32..10.0, 1..20),
        k in 1usize..25,
    ) {
        let perfect = ndcg_at_k(&y_true, &y_true, k);
        let y_pred: Vec<f32> = y_true.iter().rev().copied().collect();
        let other = ndcg_at_k(&y_true, &y_pred, k);
        prop_assert!(perfect >= other - 1e-9);
        if y_true.iter().any(|&g| g > 0.0) {
            prop_assert!((perfect - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn from_ranks_merge_consistent(queries in arb_queries()) {
        // Scoring everything at once equals merging per-query batches.
        let eval = Evaluator::for_link_prediction();
        let pos: Vec<f32> = queries.iter().map(|q| q.0).collect();
        let negs: Vec<&[f32]> = queries.iter().map(|q| q.1.as_slice()).collect();

        let ranks = eval.link_ranks(&pos, &negs).unwrap();
        let whole = LinkMetrics::from_ranks(&ranks);

        let parts: Vec<LinkMetrics> = ranks
            .iter()
            .map(|&r| LinkMetrics::from_ranks(&[r]))
            .collect();
        let merged = LinkMetrics::merge(&parts);

        prop_assert!((whole.mrr - merged.mrr).abs() < 1e-9);
        prop_assert!((whole.hits_at_10 - merged.hits_at_10).abs() < 1e-9);
        prop_assert_eq!(whole.num_queries, merged.num_queries);
    }
}
