mod assignments;
mod crp;

pub use assignments::{augment_assignments, enumerate_assignments, prune_hypotheses, Assignment};
pub use crp::crp_log_prior;
