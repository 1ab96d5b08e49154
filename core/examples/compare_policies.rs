//! Policy comparison on one synthetic instance
//!
//! Builds a random instance (4 sources, 6 groups, one minority group, skewed
//! costs), prints the analytic estimates, then runs every policy once.
//!
//! Run with: cargo run --example compare_policies --release
//! Raise the subscriber level to TRACE to see every round.

use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use tailor_core::{
    asymptotic_estimate, synthetic_problem, union_bound, CostModel, DecisionEngine, EngineConfig,
    Policy,
};

fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut rng = StdRng::seed_from_u64(2024);
    let problem = synthetic_problem(4, 6, false, CostModel::Skewed, 200, &mut rng)?;

    println!("Instance:");
    println!("{}", problem);
    println!();
    println!("  Union bound:         {:>10.1}", union_bound(&problem));
    println!("  Asymptotic estimate: {:>10.1}", asymptotic_estimate(&problem));
    println!();

    let mut engine = DecisionEngine::new(problem, EngineConfig::default().with_seed(7));

    println!("{:<22} {:>12} {:>8}", "policy", "total cost", "rounds");
    for policy in Policy::ALL {
        let outcome = engine.run(policy)?;
        info!(%policy, rounds = outcome.rounds, "finished");
        println!(
            "{:<22} {:>12.1} {:>8}",
            policy.to_string(),
            outcome.total_cost,
            outcome.rounds
        );
    }

    Ok(())
}
