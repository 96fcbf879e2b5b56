use crate::error::{PlanningError, Result};

/// Cluster label per context, labels introduced in order of first use.
pub type Assignment = Vec<usize>;

pub fn augment_assignments(assignments: &[Assignment]) -> Vec<Assignment> {
    if assignments.first().map_or(true, |a| a.is_empty()) {
        return vec![vec![0]];
    }
    assignments
        .iter()
        .flat_map(|assignment| {
            let next_cluster = assignment.iter().max().map_or(0, |k| k + 1);
            (0..=next_cluster).map(move |k| {
                let mut extended = assignment.clone();
                extended.push(k);
                extended
            })
        })
        .collect()
}

/// Every assignment of `n_contexts` contexts to clusters, up to relabelling.
///
/// The first context always sits in cluster 0, so there is one assignment per
/// set partition (a Bell number of them).
pub fn enumerate_assignments(n_contexts: usize) -> Vec<Assignment> {
    (0..n_contexts).fold(vec![Vec::new()], |assignments, _| {
        augment_assignments(&assignments)
    })
}

/// Indices of the hypotheses whose log-belief lies within `ln(threshold)` of
/// the best one.
pub fn prune_hypotheses(log_beliefs: &[f64], threshold: f64) -> Result<Vec<usize>> {
    if !(threshold > 0.0) {
        return Err(PlanningError::NonPositiveParameter {
            name: "threshold",
            value: threshold,
            constraint: "must be positive",
        });
    }
    let max_belief = log_beliefs
        .iter()
        .fold(f64::NEG_INFINITY, |m, &b| m.max(b));
    let log_threshold = threshold.ln();
    Ok(log_beliefs
        .iter()
        .enumerate()
        .filter(|(_, &b)| max_belief - b < log_threshold)
        .map(|(i, _)| i)
        .collect())
}
