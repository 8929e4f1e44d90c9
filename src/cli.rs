use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OptimizerKind {
    Sgd,
    Momentum,
    Adam,
    #[value(alias = "adam-w")]
    Adamw,
    Rmsprop,
    Adagrad,
}

#[derive(Debug, Parser)]
#[command(
    name = "titan",
    about = "Titan numeric engine: quantum circuits, optimizer traces, and sample statistics",
    version,
    propagate_version = true,
    disable_help_subcommand = true
)]
pub struct TitanCli {
    /// Global: enable Titan debug output on stderr (same as TITAN_DEBUG=1)
    #[arg(long = "debug", action = ArgAction::SetTrue, global = true)]
    pub debug: bool,

    /// Global: path to config (TOML); default: ~/.titan/config.toml
    #[arg(long = "config", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run a gate sequence and report amplitudes, probabilities and shot counts
    ///
    /// Examples:
    ///   titan circuit bell.json --shots 2000 --seed 7
    ///   titan circuit rotate.toml --json
    Circuit {
        /// Circuit file (.json or .toml)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Number of measurement shots (default from config)
        #[arg(long = "shots", value_name = "N")]
        shots: Option<usize>,

        /// RNG seed for sampling (default from config)
        #[arg(long = "seed", value_name = "SEED")]
        seed: Option<u64>,

        /// Emit a JSON report instead of text
        #[arg(long = "json", action = ArgAction::SetTrue)]
        json: bool,
    },

    /// Fit a synthetic linear regression and print the loss curve
    Train {
        #[arg(long = "optimizer", value_enum, default_value_t = OptimizerKind::Adam)]
        optimizer: OptimizerKind,

        #[arg(long = "steps", default_value_t = 200)]
        steps: usize,

        /// Base learning rate (default: config `[adam] lr`)
        #[arg(long = "lr", value_name = "LR")]
        lr: Option<f64>,

        /// Print every N-th step
        #[arg(long = "every", default_value_t = 20)]
        every: usize,

        #[arg(long = "seed", value_name = "SEED")]
        seed: Option<u64>,

        #[arg(long = "json", action = ArgAction::SetTrue)]
        json: bool,
    },

    /// Descriptive statistics for a list of numbers
    Stats {
        /// Values (ignored when --file is given)
        #[arg(value_name = "VALUES", allow_hyphen_values = true)]
        values: Vec<f64>,

        /// Read whitespace/comma separated values from a file
        #[arg(long = "file", value_name = "FILE")]
        file: Option<PathBuf>,

        #[arg(long = "json", action = ArgAction::SetTrue)]
        json: bool,
    },
}
