use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;

use reinforcement_planning::env::{FrozenLake, Mdp};
use reinforcement_planning::{policy_evaluation, policy_iteration, PlanningError, SweepSettings};

extern crate structopt;

use structopt::StructOpt;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Solve a FrozenLake map exactly with policy iteration and show the result
#[derive(StructOpt, Debug)]
#[structopt(name = "RLPlanning - FrozenLake")]
struct Cli {
    /// Should the lake be slippery
    #[structopt(long = "slippery")]
    slippery: bool,

    /// Which map to plan on: 4x4 or 8x8
    #[structopt(long = "map", default_value = "4x4")]
    map: String,

    /// Discount factor of the Bellman backups
    #[structopt(long = "gamma", default_value = "0.95")]
    gamma: f64,

    /// Convergence threshold on the change of any state value in one sweep
    #[structopt(long = "stop_criterion", default_value = "1e-6")]
    stop_criterion: f64,

    /// Maximum number of sweeps of a single policy evaluation
    #[structopt(long = "max_sweeps", default_value = "100000")]
    max_sweeps: usize,

    /// Seed for the initial values and policy
    #[structopt(long = "seed", short = "s", default_value = "42")]
    seed: u64,

    /// Log every policy iteration round
    #[structopt(long = "verbose", short = "v")]
    verbose: bool,
}

fn setup_logging(verbose: bool) -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli: Cli = Cli::from_args();
    setup_logging(cli.verbose)?;

    let map: &[&str] = match cli.map.as_str() {
        "4x4" => &FrozenLake::MAP_4X4,
        "8x8" => &FrozenLake::MAP_8X8,
        other => return Err(PlanningError::InvalidMap(format!("no built-in map '{other}'")).into()),
    };
    let env = FrozenLake::new(map, cli.slippery)?;
    let transitions = env.transition_model();
    let rewards = env.reward_function();
    let settings = SweepSettings::new(cli.gamma, cli.stop_criterion).with_max_sweeps(cli.max_sweeps);
    let mut rng = StdRng::seed_from_u64(cli.seed);

    info!(
        states = env.n_states(),
        actions = env.n_actions(),
        slippery = cli.slippery,
        "planning on {} map",
        cli.map
    );
    let now: Instant = Instant::now();
    let policy = policy_iteration(&transitions, &rewards, &settings, &mut rng)?;
    let elapsed: std::time::Duration = now.elapsed();
    info!("Policy iteration done in {:.2?}", elapsed);

    let values = policy_evaluation(&policy, &transitions, &rewards, &settings)?;

    println!("{}", env.render_policy(&policy));
    println!("policy: {policy}");
    println!("values: {values:.4}");
    Ok(())
}
