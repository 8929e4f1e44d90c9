//! Titan CLI: quantum circuits, optimizer traces, and sample statistics.
use clap::Parser;

use mlops_titan::cli::{Command, TitanCli};
use mlops_titan::commands;
use mlops_titan::config::load_config;
use mlops_titan::core::debug;

fn main() -> anyhow::Result<()> {
    let args = TitanCli::parse();
    if args.debug {
        debug::enable();
    }

    let cfg = load_config(&args.config)?;
    mlops_titan::debug_log!("config: {cfg:?}");

    match args.cmd {
        Command::Circuit { input, shots, seed, json } => {
            commands::circuit::circuit_run(&input, shots, seed, json, &cfg)
        }
        Command::Train { optimizer, steps, lr, every, seed, json } => {
            commands::train::train_run(optimizer, steps, lr, every, seed, json, &cfg)
        }
        Command::Stats { values, file, json } => {
            commands::stats::stats_run(&values, file.as_deref(), json, &cfg)
        }
    }
}
