pub mod algorithms;
pub mod clustering;
pub mod env;
pub mod error;
pub mod mdp;
pub mod utils;

pub use algorithms::{policy_evaluation, policy_iteration};
pub use clustering::crp_log_prior;
pub use error::{PlanningError, Result};
pub use mdp::{Policy, RewardVector, SweepSettings, TransitionModel, ValueFunction};
