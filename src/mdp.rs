use ndarray::{s, Array1, Array3};

use crate::error::{PlanningError, Result};

/// `[s, a, s']` holds P(s' | s, a).
pub type TransitionModel = Array3<f64>;
pub type RewardVector = Array1<f64>;
pub type Policy = Array1<usize>;
pub type ValueFunction = Array1<f64>;

pub const PROBABILITY_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepSettings {
    pub gamma: f64,
    pub stop_criterion: f64,
    pub max_sweeps: usize,
}

impl SweepSettings {
    pub const DEFAULT_MAX_SWEEPS: usize = 100_000;

    pub fn new(gamma: f64, stop_criterion: f64) -> Self {
        Self {
            gamma,
            stop_criterion,
            max_sweeps: Self::DEFAULT_MAX_SWEEPS,
        }
    }

    pub fn with_max_sweeps(mut self, max_sweeps: usize) -> Self {
        self.max_sweeps = max_sweeps;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.gamma > 0.0 && self.gamma < 1.0) {
            return Err(PlanningError::NonPositiveParameter {
                name: "gamma",
                value: self.gamma,
                constraint: "must lie in the open interval (0, 1)",
            });
        }
        if !(self.stop_criterion > 0.0 && self.stop_criterion.is_finite()) {
            return Err(PlanningError::NonPositiveParameter {
                name: "stop_criterion",
                value: self.stop_criterion,
                constraint: "must be positive and finite",
            });
        }
        if self.max_sweeps == 0 {
            return Err(PlanningError::NonPositiveParameter {
                name: "max_sweeps",
                value: 0.0,
                constraint: "must be at least 1",
            });
        }
        Ok(())
    }

    pub(crate) fn squared_tolerance(&self) -> f64 {
        self.stop_criterion * self.stop_criterion
    }
}

impl Default for SweepSettings {
    fn default() -> Self {
        Self::new(0.8, 0.01)
    }
}

/// Returns `(n_states, n_actions)` of a well formed stochastic model.
pub fn validate_model(
    transitions: &TransitionModel,
    rewards: &RewardVector,
) -> Result<(usize, usize)> {
    let (n_states, n_actions, n_next) = transitions.dim();
    if n_states == 0 || n_actions == 0 {
        return Err(PlanningError::ShapeMismatch {
            what: "transition model",
            expected: "at least one state and one action".to_string(),
            found: format!("{:?}", transitions.shape()),
        });
    }
    if n_next != n_states {
        return Err(PlanningError::ShapeMismatch {
            what: "transition model",
            expected: format!("({n_states}, {n_actions}, {n_states})"),
            found: format!("({n_states}, {n_actions}, {n_next})"),
        });
    }
    if rewards.len() != n_states {
        return Err(PlanningError::ShapeMismatch {
            what: "reward function",
            expected: format!("{n_states} entries"),
            found: format!("{} entries", rewards.len()),
        });
    }
    check_finite("reward function", rewards)?;

    for state in 0..n_states {
        for action in 0..n_actions {
            let row = transitions.slice(s![state, action, ..]);
            if let Some(p) = row.iter().find(|p| !p.is_finite() || **p < 0.0) {
                return Err(PlanningError::InvalidProbability {
                    state,
                    action,
                    reason: format!("entry {p} is not a probability"),
                });
            }
            let total = row.sum();
            if (total - 1.0).abs() > PROBABILITY_TOLERANCE {
                return Err(PlanningError::InvalidProbability {
                    state,
                    action,
                    reason: format!("row sums to {total}"),
                });
            }
        }
    }

    Ok((n_states, n_actions))
}

pub fn check_finite(what: &'static str, values: &Array1<f64>) -> Result<()> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(PlanningError::NonFiniteValue {
            what,
            index,
            value: values[index],
        }),
        None => Ok(()),
    }
}

pub fn validate_policy(policy: &Policy, n_states: usize, n_actions: usize) -> Result<()> {
    if policy.len() != n_states {
        return Err(PlanningError::ShapeMismatch {
            what: "policy",
            expected: format!("{n_states} entries"),
            found: format!("{} entries", policy.len()),
        });
    }
    if let Some((state, &action)) = policy.iter().enumerate().find(|(_, a)| **a >= n_actions) {
        return Err(PlanningError::ActionOutOfRange {
            state,
            action,
            n_actions,
        });
    }
    Ok(())
}
