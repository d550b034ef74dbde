pub mod cli;
pub mod cluster;
pub mod local;
pub mod report;
pub mod worker;

pub use cli::{Args, Command, Variant};
pub use cluster::Cluster;
pub use report::{RunOutcome, RunReport};

use anyhow::Context;
use lifegrid_core::{init_logging, AppConfig};

use crate::app::local::run_local;

/// Loads the configuration, applies the command line on top, runs the
/// chosen variant and writes the summary to stderr.
pub async fn run(args: Args) -> anyhow::Result<RunOutcome> {
    let mut config = AppConfig::load(&args.config)?;
    let variant = args.apply(&mut config);
    init_logging(&config.output.log_level);
    config.validate().context("invalid configuration")?;

    tracing::info!(
        variant = variant.name(),
        size = config.grid.size,
        generations = config.grid.generations,
        fingerprint = %config.fingerprint(),
        "Starting run"
    );

    let outcome = execute(&config, variant).await?;

    tracing::info!(alive = outcome.report.alive, "Run finished");
    eprintln!("{}", outcome.report);
    if config.output.print_board {
        eprintln!("{}", outcome.board);
    }
    Ok(outcome)
}

/// Runs an already validated configuration.
pub async fn execute(config: &AppConfig, variant: Variant) -> anyhow::Result<RunOutcome> {
    let threads = match variant {
        Variant::Serial => 1,
        Variant::Threaded { threads } => threads,
        Variant::Distributed => return Cluster::from_config(config)?.run().await,
    };
    let config = config.clone();
    tokio::task::spawn_blocking(move || run_local(&config, variant, threads))
        .await
        .context("simulation task panicked")?
}
