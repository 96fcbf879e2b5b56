mod policy_evaluation;
mod policy_iteration;

pub use policy_evaluation::{policy_evaluation, policy_evaluation_from};
pub use policy_iteration::{
    action_values, policy_improvement, policy_iteration, policy_iteration_observed,
    IterationRound,
};

use ndarray::{s, ArrayView1};
use tracing::{trace, warn};

use crate::error::{PlanningError, Result};
use crate::mdp::{Policy, RewardVector, SweepSettings, TransitionModel, ValueFunction};

#[inline(always)]
fn bellman_backup(
    row: ArrayView1<f64>,
    rewards: &RewardVector,
    values: &ValueFunction,
    gamma: f64,
) -> f64 {
    row.iter()
        .zip(rewards.iter())
        .zip(values.iter())
        .map(|((p, r), v)| p * (r + gamma * v))
        .sum()
}

/// One Gauss-Seidel sweep: states are visited in index order and each new
/// value is written back before the next state is backed up.
///
/// Returns the largest squared change of the sweep.
fn evaluation_sweep(
    policy: &Policy,
    transitions: &TransitionModel,
    rewards: &RewardVector,
    gamma: f64,
    values: &mut ValueFunction,
) -> f64 {
    let mut delta: f64 = 0.0;
    for state in 0..values.len() {
        let v_old = values[state];
        let row = transitions.slice(s![state, policy[state], ..]);
        let v_new = bellman_backup(row, rewards, values, gamma);
        values[state] = v_new;
        let change = (v_old - v_new) * (v_old - v_new);
        // NaN must stick, f64::max would drop it
        if change.is_nan() || change > delta {
            delta = change;
        }
    }
    delta
}

fn evaluate_in_place(
    policy: &Policy,
    transitions: &TransitionModel,
    rewards: &RewardVector,
    settings: &SweepSettings,
    values: &mut ValueFunction,
) -> Result<usize> {
    let tolerance = settings.squared_tolerance();
    let mut delta = f64::INFINITY;
    for sweep in 1..=settings.max_sweeps {
        delta = evaluation_sweep(policy, transitions, rewards, settings.gamma, values);
        trace!(sweep, delta, "evaluation sweep");
        if delta < tolerance {
            return Ok(sweep);
        }
        if delta.is_nan() {
            warn!(sweep, "evaluation produced a value that is not a number");
            return Err(PlanningError::NonConvergence { sweeps: sweep, delta });
        }
    }
    warn!(
        max_sweeps = settings.max_sweeps,
        delta, "evaluation stopped without converging"
    );
    Err(PlanningError::NonConvergence {
        sweeps: settings.max_sweeps,
        delta,
    })
}
