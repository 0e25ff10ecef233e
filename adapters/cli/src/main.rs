#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Hero Defence over stdin and stdout.

mod settings;

use std::{
    io::{self, BufWriter},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use hero_defence_protocol::{write_decisions, ProtocolReader};
use hero_defence_system_turn_decision::{Config, TurnEngine};
use log::{debug, info};

/// Plays one game: reads the referee on stdin and answers on stdout.
#[derive(Debug, Parser)]
#[command(name = "hero-defence", version)]
struct Cli {
    /// TOML policy file overriding the default heuristics.
    #[arg(long, value_name = "PATH")]
    policy: Option<PathBuf>,
    /// Log filter applied when `RUST_LOG` is unset. Logs go to stderr.
    #[arg(long, value_name = "FILTER", default_value = "warn")]
    log_filter: String,
}

/// Entry point for the Hero Defence command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_filter);

    let config = match &cli.policy {
        Some(path) => settings::load_policy(path)?,
        None => Config::default(),
    };

    let stdin = io::stdin();
    let mut reader = ProtocolReader::new(stdin.lock());
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    let parameters = reader
        .read_parameters()
        .context("failed to read game parameters")?;
    info!(
        "base at ({}, {}), {} hero(es) per player",
        parameters.base().x(),
        parameters.base().y(),
        parameters.heroes_per_player()
    );

    let engine = TurnEngine::new(config, parameters);
    debug!("policy: {:?}", engine.config());
    info!("guard points: {:?}", engine.guard_points());
    let mut turns = 0_u32;

    while let Some(state) = reader
        .read_turn()
        .with_context(|| format!("failed to read turn {}", turns + 1))?
    {
        turns += 1;
        let plan = engine.make_turn(&state);
        write_decisions(&mut out, &plan.decisions)
            .with_context(|| format!("failed to write orders for turn {turns}"))?;
    }

    info!("input closed after {turns} turn(s)");
    Ok(())
}

fn init_logging(default_filter: &str) {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .target(env_logger::Target::Stderr)
        .try_init();
}
