use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use log::info;
use uci_bench_lib::types::DriverConfig;

/// Let a UCI engine play itself from the start position, echoing every
/// position command it is sent.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Engine executable (defaults to ./Hakkapeliitta)
    engine: Option<String>,

    /// JSON config file; flags given here override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Send `quit` after this many moves instead of running until the engine exits
    #[arg(long)]
    max_moves: Option<usize>,

    /// Give up if the engine is silent for this long
    #[arg(long)]
    read_timeout_ms: Option<u64>,

    /// How long to wait for the engine to exit before killing it
    #[arg(long)]
    shutdown_grace_ms: Option<u64>,

    /// Extra arguments passed to the engine
    #[arg(last = true)]
    engine_args: Vec<String>,
}

impl Cli {
    fn into_config(self) -> Result<DriverConfig> {
        let mut config = match &self.config {
            Some(path) => DriverConfig::from_file(path)?,
            None => DriverConfig::default(),
        };
        if let Some(engine) = self.engine {
            config.engine.path = engine;
        }
        if !self.engine_args.is_empty() {
            config.engine.args = self.engine_args;
        }
        if self.max_moves.is_some() {
            config.max_moves = self.max_moves;
        }
        if self.read_timeout_ms.is_some() {
            config.read_timeout_ms = self.read_timeout_ms;
        }
        if let Some(grace) = self.shutdown_grace_ms {
            config.shutdown_grace_ms = grace;
        }
        Ok(config)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let config = Cli::parse().into_config()?;
    let summary = uci_bench_lib::run(&config)
        .await
        .with_context(|| format!("Benchmark against {} failed", config.engine.path))?;

    info!(
        "finished ({:?}) after {} moves, engine status {:?}",
        summary.termination,
        summary.moves.len(),
        summary.exit_status
    );
    Ok(())
}
