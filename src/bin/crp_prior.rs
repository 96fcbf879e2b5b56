use kdam::{tqdm, BarExt};

use reinforcement_planning::clustering::enumerate_assignments;
use reinforcement_planning::{crp_log_prior, PlanningError};

extern crate structopt;

use structopt::StructOpt;
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

/// Tabulate the CRP log-prior of every way to cluster a number of contexts
#[derive(StructOpt, Debug)]
#[structopt(name = "RLPlanning - CRP prior")]
struct Cli {
    /// Number of contexts to partition
    #[structopt(long = "n_contexts", short = "n", default_value = "5")]
    n_contexts: usize,

    /// Concentration parameter of the process
    #[structopt(long = "alpha", default_value = "1.0")]
    alpha: f64,

    /// Log every assignment as it is scored
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

    if cli.n_contexts == 0 {
        return Err(PlanningError::NonPositiveParameter {
            name: "n_contexts",
            value: 0.0,
            constraint: "must be at least 1",
        }
        .into());
    }

    let assignments = enumerate_assignments(cli.n_contexts);
    info!(
        "{} assignments of {} contexts",
        assignments.len(),
        cli.n_contexts
    );

    let mut pb = tqdm!(total = assignments.len());
    pb.set_description(format!("alpha={}", cli.alpha));
    pb.refresh();

    let mut log_priors: Vec<f64> = Vec::with_capacity(assignments.len());
    for assignment in &assignments {
        let log_prior = crp_log_prior(assignment, cli.alpha)?;
        debug!(?assignment, log_prior);
        log_priors.push(log_prior);
        pb.update(1);
    }
    eprintln!();

    for (assignment, log_prior) in assignments.iter().zip(&log_priors) {
        println!("{assignment:?}\t{log_prior:.6}");
    }
    let total_mass: f64 = log_priors.iter().map(|lp| lp.exp()).sum();
    info!("Total probability mass: {:.12}", total_mass);
    Ok(())
}
