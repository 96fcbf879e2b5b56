use ndarray::{s, Array1};
use ndarray_rand::RandomExt;
use rand::distributions::Uniform;
use rand::Rng;
use tracing::debug;

use super::{bellman_backup, evaluate_in_place};
use crate::error::Result;
use crate::mdp::{validate_model, Policy, RewardVector, SweepSettings, TransitionModel, ValueFunction};
use crate::utils::{argmax, Subscriber};

#[derive(Debug, Clone)]
pub struct IterationRound {
    pub round: usize,
    pub sweeps: usize,
    pub changed: usize,
    pub evaluated: Policy,
    pub values: ValueFunction,
    pub improved: Policy,
}

/// Optimal deterministic policy by policy iteration.
///
/// The starting values and policy are drawn from `rng`, so the same seed
/// always yields the same run. Requires `0 < gamma < 1`; an evaluation that
/// does not settle within `settings.max_sweeps` sweeps is reported as
/// `NonConvergence`.
pub fn policy_iteration<R: Rng + ?Sized>(
    transitions: &TransitionModel,
    rewards: &RewardVector,
    settings: &SweepSettings,
    rng: &mut R,
) -> Result<Policy> {
    policy_iteration_observed(transitions, rewards, settings, rng, &mut ())
}

/// [`policy_iteration`] that reports every round to `subscriber`.
pub fn policy_iteration_observed<R, S>(
    transitions: &TransitionModel,
    rewards: &RewardVector,
    settings: &SweepSettings,
    rng: &mut R,
    subscriber: &mut S,
) -> Result<Policy>
where
    R: Rng + ?Sized,
    S: Subscriber<IterationRound> + ?Sized,
{
    settings.validate()?;
    let (n_states, n_actions) = validate_model(transitions, rewards)?;

    let mut values: ValueFunction = Array1::random_using(n_states, Uniform::new(0.0, 1.0), rng);
    let mut policy: Policy = Array1::random_using(n_states, Uniform::new(0, n_actions), rng);

    let mut round: usize = 0;
    loop {
        round += 1;
        let sweeps = evaluate_in_place(&policy, transitions, rewards, settings, &mut values)?;
        let evaluated = policy.clone();
        let changed = policy_improvement(&mut policy, &values, transitions, rewards, settings.gamma);
        debug!(round, sweeps, changed, "policy iteration round");

        subscriber.consume(IterationRound {
            round,
            sweeps,
            changed,
            evaluated,
            values: values.clone(),
            improved: policy.clone(),
        });

        if changed == 0 {
            return Ok(policy);
        }
    }
}

pub fn action_values(
    state: usize,
    values: &ValueFunction,
    transitions: &TransitionModel,
    rewards: &RewardVector,
    gamma: f64,
) -> Array1<f64> {
    (0..transitions.dim().1)
        .map(|action| {
            bellman_backup(
                transitions.slice(s![state, action, ..]),
                rewards,
                values,
                gamma,
            )
        })
        .collect()
}

/// Greedy update, lowest action winning ties. Returns how many states changed.
pub fn policy_improvement(
    policy: &mut Policy,
    values: &ValueFunction,
    transitions: &TransitionModel,
    rewards: &RewardVector,
    gamma: f64,
) -> usize {
    let mut changed: usize = 0;
    for state in 0..policy.len() {
        let q = action_values(state, values, transitions, rewards, gamma);
        let best = argmax(q.iter());
        if best != policy[state] {
            policy[state] = best;
            changed += 1;
        }
    }
    changed
}
