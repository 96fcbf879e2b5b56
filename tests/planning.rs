extern crate float_eq;
extern crate reinforcement_planning;

use float_eq::*;
use ndarray::{arr1, arr3, Array1};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rstest::rstest;

use reinforcement_planning::algorithms::{
    policy_evaluation_from, policy_improvement, policy_iteration_observed, IterationRound,
};
use reinforcement_planning::env::{FrozenLake, Mdp};
use reinforcement_planning::{
    policy_evaluation, policy_iteration, PlanningError, Policy, RewardVector, SweepSettings,
    TransitionModel,
};

/// action 0 stays, action 1 swaps state; only state 1 pays
fn two_state_mdp() -> (TransitionModel, RewardVector) {
    let transitions = arr3(&[[[1.0, 0.0], [0.0, 1.0]], [[0.0, 1.0], [1.0, 0.0]]]);
    (transitions, arr1(&[0.0, 10.0]))
}

/// Optimal policy is [1, 0, 0] with values
/// [18.8 / 0.496, 0.45 * V0 + 25, 50] at gamma = 0.9.
fn three_state_mdp() -> (TransitionModel, RewardVector) {
    let transitions = arr3(&[
        [[1.0, 0.0, 0.0], [0.2, 0.8, 0.0]],
        [[0.5, 0.0, 0.5], [0.0, 1.0, 0.0]],
        [[0.0, 0.0, 1.0], [0.9, 0.0, 0.1]],
    ]);
    (transitions, arr1(&[0.0, 1.0, 5.0]))
}

#[test]
fn single_state_single_action() {
    let transitions = arr3(&[[[1.0]]]);
    let rewards = arr1(&[1.0]);
    let settings = SweepSettings::new(0.9, 1e-6);

    let values = policy_evaluation(&arr1(&[0]), &transitions, &rewards, &settings).unwrap();
    assert_float_eq!(values.to_vec(), vec![10.0], abs_all <= 1e-4);

    let policy = policy_iteration(
        &transitions,
        &rewards,
        &settings,
        &mut StdRng::seed_from_u64(1),
    )
    .unwrap();
    assert_eq!(policy.to_vec(), vec![0]);
}

#[rstest]
fn two_state_policy_heads_for_the_reward(#[values(0, 1, 7, 42, 2718)] seed: u64) {
    let (transitions, rewards) = two_state_mdp();
    let settings = SweepSettings::new(0.9, 1e-8);

    let policy = policy_iteration(
        &transitions,
        &rewards,
        &settings,
        &mut StdRng::seed_from_u64(seed),
    )
    .unwrap();

    assert_eq!(policy.to_vec(), vec![1, 0]);
    let values = policy_evaluation(&policy, &transitions, &rewards, &settings).unwrap();
    assert_float_eq!(values.to_vec(), vec![100.0, 100.0], abs_all <= 1e-5);
}

#[rstest]
fn three_state_policy_and_values(#[values(3, 11, 2718)] seed: u64) {
    let (transitions, rewards) = three_state_mdp();
    let settings = SweepSettings::new(0.9, 1e-9);

    let policy = policy_iteration(
        &transitions,
        &rewards,
        &settings,
        &mut StdRng::seed_from_u64(seed),
    )
    .unwrap();
    assert_eq!(policy.to_vec(), vec![1, 0, 0]);

    let values = policy_evaluation(&policy, &transitions, &rewards, &settings).unwrap();
    let v0 = 18.8 / 0.496;
    assert_float_eq!(
        values.to_vec(),
        vec![v0, 0.45 * v0 + 25.0, 50.0],
        abs_all <= 1e-5
    );
}

#[rstest]
fn each_round_improves_on_the_last(#[values(0, 5, 99, 1234)] seed: u64) {
    let (transitions, rewards) = three_state_mdp();
    let settings = SweepSettings::new(0.9, 1e-9);
    let mut rounds: Vec<IterationRound> = vec![];

    policy_iteration_observed(
        &transitions,
        &rewards,
        &settings,
        &mut StdRng::seed_from_u64(seed),
        &mut rounds,
    )
    .unwrap();

    let exact = |policy: &Policy| {
        policy_evaluation(policy, &transitions, &rewards, &SweepSettings::new(0.9, 1e-10)).unwrap()
    };
    let mut previous = exact(&rounds[0].evaluated);
    for round in &rounds {
        let current = exact(&round.improved);
        for (now, before) in current.iter().zip(previous.iter()) {
            assert!(now + 1e-6 >= *before, "value dropped from {before} to {now}");
        }
        previous = current;
    }
}

#[test]
fn returned_policy_is_a_fixed_point_of_improvement() {
    let (transitions, rewards) = three_state_mdp();
    let settings = SweepSettings::new(0.9, 1e-8);

    let policy = policy_iteration(
        &transitions,
        &rewards,
        &settings,
        &mut StdRng::seed_from_u64(17),
    )
    .unwrap();
    let values = policy_evaluation(&policy, &transitions, &rewards, &settings).unwrap();

    let mut improved = policy.clone();
    let changed = policy_improvement(&mut improved, &values, &transitions, &rewards, 0.9);

    assert_eq!(changed, 0);
    assert_eq!(improved, policy);
}

#[test]
fn evaluation_forgets_its_starting_point() {
    let (transitions, rewards) = three_state_mdp();
    let settings = SweepSettings::new(0.9, 1e-10);
    let policy: Policy = arr1(&[0, 1, 1]);

    let from_zero = policy_evaluation(&policy, &transitions, &rewards, &settings).unwrap();
    let from_far = policy_evaluation_from(
        &policy,
        &transitions,
        &rewards,
        &settings,
        arr1(&[250.0, -40.0, 1e3]),
    )
    .unwrap();

    assert_float_eq!(from_zero.to_vec(), from_far.to_vec(), abs_all <= 1e-6);
}

#[test]
fn evaluation_is_deterministic() {
    let (transitions, rewards) = three_state_mdp();
    let settings = SweepSettings::default();
    let policy: Policy = arr1(&[1, 0, 1]);

    let first = policy_evaluation(&policy, &transitions, &rewards, &settings).unwrap();
    let second = policy_evaluation(&policy, &transitions, &rewards, &settings).unwrap();

    assert_eq!(first, second);
}

#[test]
fn same_seed_same_run() {
    let (transitions, rewards) = three_state_mdp();
    let settings = SweepSettings::new(0.9, 1e-6);
    let run = |seed| {
        let mut rounds: Vec<IterationRound> = vec![];
        policy_iteration_observed(
            &transitions,
            &rewards,
            &settings,
            &mut StdRng::seed_from_u64(seed),
            &mut rounds,
        )
        .unwrap();
        rounds
            .iter()
            .map(|r| (r.sweeps, r.evaluated.to_vec()))
            .collect::<Vec<_>>()
    };

    assert_eq!(run(8), run(8));
}

#[test]
fn sweep_cap_reports_non_convergence() {
    let (transitions, rewards) = two_state_mdp();
    let settings = SweepSettings::new(0.99, 1e-12).with_max_sweeps(5);

    let result = policy_evaluation(&arr1(&[1, 0]), &transitions, &rewards, &settings);

    assert!(matches!(
        result,
        Err(PlanningError::NonConvergence { sweeps: 5, .. })
    ));
}

#[test]
fn malformed_inputs_fail_before_any_sweep() {
    let (transitions, rewards) = two_state_mdp();
    let settings = SweepSettings::default();

    assert!(matches!(
        policy_evaluation(&arr1(&[0]), &transitions, &rewards, &settings),
        Err(PlanningError::ShapeMismatch { what: "policy", .. })
    ));
    assert!(matches!(
        policy_evaluation(&arr1(&[0, 3]), &transitions, &rewards, &settings),
        Err(PlanningError::ActionOutOfRange { state: 1, .. })
    ));

    let mut leaky = transitions.clone();
    leaky[[1, 1, 0]] = 0.5;
    assert!(matches!(
        policy_iteration(&leaky, &rewards, &settings, &mut StdRng::seed_from_u64(0)),
        Err(PlanningError::InvalidProbability {
            state: 1,
            action: 1,
            ..
        })
    ));
    assert!(matches!(
        policy_iteration(
            &transitions,
            &arr1(&[1.0]),
            &settings,
            &mut StdRng::seed_from_u64(0)
        ),
        Err(PlanningError::ShapeMismatch { .. })
    ));
    assert!(matches!(
        policy_iteration(
            &transitions,
            &rewards,
            &SweepSettings::new(0.9, -1.0),
            &mut StdRng::seed_from_u64(0)
        ),
        Err(PlanningError::NonPositiveParameter {
            name: "stop_criterion",
            ..
        })
    ));
}

#[rstest]
fn rewards_that_are_not_finite_are_rejected(
    #[values(f64::NAN, f64::INFINITY, f64::NEG_INFINITY)] reward: f64,
) {
    let transitions = arr3(&[[[1.0]]]);
    let rewards = arr1(&[reward]);
    let settings = SweepSettings::new(0.9, 1e-6);

    assert!(matches!(
        policy_evaluation(&arr1(&[0]), &transitions, &rewards, &settings),
        Err(PlanningError::NonFiniteValue {
            what: "reward function",
            index: 0,
            ..
        })
    ));
    assert!(matches!(
        policy_iteration(&transitions, &rewards, &settings, &mut StdRng::seed_from_u64(0)),
        Err(PlanningError::NonFiniteValue { .. })
    ));
}

#[test]
fn frozen_lake_policy_reaches_the_goal() {
    let lake = FrozenLake::new(&FrozenLake::MAP_4X4, false).unwrap();
    let transitions = lake.transition_model();
    let rewards = lake.reward_function();
    let settings = SweepSettings::new(0.95, 1e-8);

    let policy = policy_iteration(
        &transitions,
        &rewards,
        &settings,
        &mut StdRng::seed_from_u64(42),
    )
    .unwrap();

    let mut state = lake.start_state().unwrap();
    let mut steps = 0;
    while !lake.is_terminal(state) && steps < lake.n_states() {
        let next: Array1<f64> = transitions
            .slice(ndarray::s![state, policy[state], ..])
            .to_owned();
        state = next.iter().position(|&p| p == 1.0).unwrap();
        steps += 1;
    }
    assert_eq!(state, 15);
    assert_eq!(steps, 6);
}
