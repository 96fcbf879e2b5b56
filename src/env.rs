mod frozen_lake;

pub use frozen_lake::FrozenLake;

use crate::mdp::{RewardVector, TransitionModel};

/// Markov Decision Process with known dynamics - Sutton & Barto 2018.
pub trait Mdp {
    fn n_states(&self) -> usize;

    fn n_actions(&self) -> usize;

    fn transition_model(&self) -> TransitionModel;

    fn reward_function(&self) -> RewardVector;
}
