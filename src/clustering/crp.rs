use fxhash::FxHashSet;

use crate::error::{PlanningError, Result};

/// Log-probability of `ctx_assignment` under a Chinese Restaurant Process
/// with concentration `alpha`, seating contexts in the order given.
///
/// The first context opens its table for free. Every later context `i`
/// joins table `k` with probability `n_k / (i + alpha)`, or opens it with
/// probability `alpha / (i + alpha)` when it is still empty.
///
/// Labels must be `0..K` where `K` is the number of distinct labels. The
/// sum matches the exchangeable partition probability only when new labels
/// appear in increasing order of first use.
pub fn crp_log_prior(ctx_assignment: &[usize], alpha: f64) -> Result<f64> {
    if !(alpha > 0.0 && alpha.is_finite()) {
        return Err(PlanningError::NonPositiveParameter {
            name: "alpha",
            value: alpha,
            constraint: "must be positive and finite",
        });
    }
    let Some((&first, rest)) = ctx_assignment.split_first() else {
        return Err(PlanningError::ShapeMismatch {
            what: "context assignment",
            expected: "at least one context".to_string(),
            found: "0 contexts".to_string(),
        });
    };

    let n_clusters = ctx_assignment.iter().collect::<FxHashSet<_>>().len();
    if let Some((index, &label)) = ctx_assignment
        .iter()
        .enumerate()
        .find(|(_, k)| **k >= n_clusters)
    {
        return Err(PlanningError::LabelOutOfRange {
            index,
            label,
            n_clusters,
        });
    }

    let mut counts: Vec<usize> = vec![0; n_clusters];
    counts[first] = 1;
    let mut seated: usize = 1;
    let mut log_prior: f64 = 0.0;
    for &k in rest {
        let denominator = seated as f64 + alpha;
        log_prior += if counts[k] == 0 {
            (alpha / denominator).ln()
        } else {
            (counts[k] as f64 / denominator).ln()
        };
        counts[k] += 1;
        seated += 1;
    }
    Ok(log_prior)
}
