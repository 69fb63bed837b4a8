use std::convert::TryFrom;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Parser)]
#[command(author, about = "Monte Carlo control for blackjack", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Learn a policy from simulated rounds
    Train(TrainArgs),
    /// Play one round on the terminal
    Play(PlayArgs),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Method {
    ExploringStarts,
    EpsilonSoft,
}

impl Method {
    pub fn default_episodes(&self) -> u64 {
        match self {
            Method::ExploringStarts => 2_000_000,
            Method::EpsilonSoft => 500_000,
        }
    }
}

#[derive(Debug, Args)]
pub struct TrainArgs {
    #[arg(long, value_enum, default_value_t = Method::ExploringStarts)]
    pub method: Method,

    /// Number of training episodes [default: 2000000 or 500000 for epsilon-soft]
    #[arg(long)]
    pub episodes: Option<u64>,

    /// Exploration rate of the epsilon-soft policy
    #[arg(long, default_value_t = 0.1)]
    pub epsilon: f64,

    /// Seed for every random stream of the run
    #[arg(long)]
    pub seed: Option<u64>,

    /// Rounds used to compare the learned policy against sticking at 20 (0 to skip)
    #[arg(long, default_value_t = 100_000)]
    pub eval_episodes: u64,

    /// Where to write the learned policy as JSON
    #[arg(long)]
    pub policy_out: Option<PathBuf>,

    /// Where to write the action values as JSON
    #[arg(long)]
    pub values_out: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct PlayArgs {
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Resolved settings for a training run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    pub method: Method,
    pub episodes: u64,
    pub epsilon: f64,
    pub seed: u64,
    pub eval_episodes: u64,
    pub policy_out: Option<PathBuf>,
    pub values_out: Option<PathBuf>,
}

impl TryFrom<TrainArgs> for TrainConfig {
    type Error = Error;

    fn try_from(args: TrainArgs) -> Result<TrainConfig> {
        if !(0.0..=1.0).contains(&args.epsilon) {
            return Err(Error::InvalidConfig(format!(
                "epsilon must lie in [0, 1], got {}",
                args.epsilon
            )));
        }
        let method = args.method;
        Ok(TrainConfig {
            method: method,
            episodes: args.episodes.unwrap_or_else(|| method.default_episodes()),
            epsilon: args.epsilon,
            // Drawn once so that the run can be replayed with --seed.
            seed: args.seed.unwrap_or_else(rand::random),
            eval_episodes: args.eval_episodes,
            policy_out: args.policy_out,
            values_out: args.values_out,
        })
    }
}
