use thiserror::Error;

pub type Result<T> = std::result::Result<T, PlanningError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanningError {
    #[error("shape mismatch for {what}: expected {expected}, found {found}")]
    ShapeMismatch {
        what: &'static str,
        expected: String,
        found: String,
    },

    #[error("invalid transition probabilities at state {state}, action {action}: {reason}")]
    InvalidProbability {
        state: usize,
        action: usize,
        reason: String,
    },

    #[error("{what} entry {index} is {value}, expected a finite number")]
    NonFiniteValue {
        what: &'static str,
        index: usize,
        value: f64,
    },

    #[error("action {action} chosen at state {state} is out of range for {n_actions} actions")]
    ActionOutOfRange {
        state: usize,
        action: usize,
        n_actions: usize,
    },

    #[error("context {index} has label {label}, but only {n_clusters} clusters are present")]
    LabelOutOfRange {
        index: usize,
        label: usize,
        n_clusters: usize,
    },

    #[error("parameter {name} = {value} {constraint}")]
    NonPositiveParameter {
        name: &'static str,
        value: f64,
        constraint: &'static str,
    },

    #[error("value sweeps did not converge after {sweeps} sweeps (last squared delta {delta:e})")]
    NonConvergence { sweeps: usize, delta: f64 },

    #[error("invalid map: {0}")]
    InvalidMap(String),
}
