//! Normalized Discounted Cumulative Gain.

/// NDCG@k of one query with linear gains.
///
/// `y_true` holds per-class relevances (non-negative), `y_pred` the
/// model's per-class scores. Classes are ranked by predicted score,
/// descending, with ties kept in input order (stable sort), and gains
/// are discounted by `log2(position + 1)`.
///
/// Returns a value in [0, 1]; 0 when the ideal DCG is 0 (no relevant
/// class at all).
pub fn ndcg_at_k(y_true: &[f32], y_pred: &[f32], k: usize) -> f64 {
    debug_assert_eq!(y_true.len(), y_pred.len());
    let k = k.min(y_true.len());
    if k == 0 {
        return 0.0;
    }

    let dcg = dcg_at_k(y_true, y_pred, k);
    let ideal = dcg_at_k(y_true, y_true, k);
    if ideal <= 0.0 {
        0.0
    } else {
        dcg / ideal
    }
}

/// DCG of `y_true` gains under the ranking induced by `by`.
fn dcg_at_k(y_true: &[f32], by: &[f32], k: usize) -> f64 {
    let mut order: Vec<usize> = (0..by.len()).collect();
    // Stable: tied scores keep input order.
    order.sort_by(|&a, &b| by[b].partial_cmp(&by[a]).unwrap_or(std::cmp::Ordering::Equal));

    order
        .iter()
        .take(k)
        .enumerate()
        .map(|(pos, &cls)| f64::from(y_true[cls]) / ((pos + 2) as f64).log2())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_ranking_is_one() {
        let y_true = [3.0, 2.0, 1.0, 0.0];
        let y_pred = [0.9, 0.7, 0.3, 0.1];
        assert!((ndcg_at_k(&y_true, &y_pred, 4) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_worst_ranking_below_one() {
        let y_true = [3.0, 0.0];
        let y_pred = [0.0, 1.0];
        let v = ndcg_at_k(&y_true, &y_pred, 2);
        // Relevant class lands at position 2: dcg = 3/log2(3), idcg = 3.
        let expected = (3.0 / 3f64.log2()) / 3.0;
        assert!((v - expected).abs() < 1e-12);
    }

    #[test]
    fn test_in_unit_interval() {
        let y_true = [0.2, 0.9, 0.0, 0.4];
        let y_pred = [0.1, 0.1, 0.8, 0.3];
        let v = ndcg_at_k(&y_true, &y_pred, 10);
        assert!((0.0..=1.0).contains(&v));
    }

    #[test]
    fn test_zero_relevance_is_zero() {
        let y_true = [0.0, 0.0, 0.0];
        let y_pred = [0.5, 0.2, 0.9];
        assert_eq!(ndcg_at_k(&y_true, &y_pred, 3), 0.0);
    }

    #[test]
    fn test_ties_broken_by_input_order() {
        // All predictions tied: ranking is just input order.
        let y_true = [0.0, 3.0];
        let y_pred = [0.5, 0.5];
        let v = ndcg_at_k(&y_true, &y_pred, 2);
        let expected = (3.0 / 3f64.log2()) / 3.0;
        assert!((v - expected).abs() < 1e-12);
    }

    #[test]
    fn test_k_truncates() {
        let y_true = [1.0, 1.0, 1.0];
        let y_pred = [0.9, 0.8, 0.7];
        // Only the top prediction counts; it is also ideal.
        assert!((ndcg_at_k(&y_true, &y_pred, 1) - 1.0).abs() < 1e-12);
    }
}
