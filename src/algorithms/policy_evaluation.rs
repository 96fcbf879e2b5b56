use ndarray::Array1;
use tracing::debug;

use super::evaluate_in_place;
use crate::error::{PlanningError, Result};
use crate::mdp::{
    check_finite, validate_model, validate_policy, Policy, RewardVector, SweepSettings, TransitionModel,
    ValueFunction,
};

pub fn policy_evaluation(
    policy: &Policy,
    transitions: &TransitionModel,
    rewards: &RewardVector,
    settings: &SweepSettings,
) -> Result<ValueFunction> {
    policy_evaluation_from(
        policy,
        transitions,
        rewards,
        settings,
        Array1::zeros(rewards.len()),
    )
}

/// Same as [`policy_evaluation`] but sweeping from `initial_values`.
pub fn policy_evaluation_from(
    policy: &Policy,
    transitions: &TransitionModel,
    rewards: &RewardVector,
    settings: &SweepSettings,
    initial_values: ValueFunction,
) -> Result<ValueFunction> {
    settings.validate()?;
    let (n_states, n_actions) = validate_model(transitions, rewards)?;
    validate_policy(policy, n_states, n_actions)?;
    if initial_values.len() != n_states {
        return Err(PlanningError::ShapeMismatch {
            what: "initial values",
            expected: format!("{n_states} entries"),
            found: format!("{} entries", initial_values.len()),
        });
    }
    check_finite("initial values", &initial_values)?;

    let mut values = initial_values;
    let sweeps = evaluate_in_place(policy, transitions, rewards, settings, &mut values)?;
    debug!(sweeps, "policy evaluation converged");
    Ok(values)
}
