mod blackjack;
mod config;
mod error;
mod persist;
mod solver;

use std::convert::TryFrom;
use std::io;

use clap::Parser;
use rand::prelude::*;

use blackjack::game::BlackjackGame;
use blackjack::interactive::InteractivePolicy;
use blackjack::{print_action_values, print_policy, DrawSource, InfiniteDeck};
use config::{Cli, Command, Method, PlayArgs, TrainConfig};
use error::Result;
use persist::{action_value_records, policy_records, write_json};
use solver::monte_carlo::MonteCarloControl;
use solver::*;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match Cli::parse().command {
        Command::Train(args) => train(TrainConfig::try_from(args)?),
        Command::Play(args) => play(args),
    }
}

fn train(config: TrainConfig) -> Result<()> {
    log::info!("{:<32}{}", "configuration", serde_json::to_string(&config)?);

    // Cards and exploration draw from separate streams derived from one seed.
    let mut seeds = StdRng::seed_from_u64(config.seed);
    let game = BlackjackGame::new(InfiniteDeck::new(StdRng::seed_from_u64(seeds.gen())));
    let policy_rng = StdRng::seed_from_u64(seeds.gen());

    match config.method {
        Method::ExploringStarts => {
            let control = MonteCarloControl::new(game, ExploringStarts::new(policy_rng));
            run(&config, control)
        }
        Method::EpsilonSoft => {
            let control =
                MonteCarloControl::new(game, EpsilonSoft::new(config.epsilon, policy_rng));
            run(&config, control)
        }
    }
}

fn run<P: TabularPolicy, D: DrawSource>(
    config: &TrainConfig,
    mut control: MonteCarloControl<P, D>,
) -> Result<()> {
    control.run(config.episodes)?;
    print_policy(control.policy());
    print_action_values(control.values());

    if config.eval_episodes > 0 {
        let optimal = control.evaluate_greedy(config.eval_episodes)?;
        let naive = control.evaluate(&mut StickAt20, config.eval_episodes)?;
        println!("Average naive returns: {:.4}", naive);
        println!("Average optimal returns: {:.4}", optimal);
    }

    if let Some(path) = &config.policy_out {
        write_json(path, &policy_records(control.policy()))?;
    }
    if let Some(path) = &config.values_out {
        write_json(path, &action_value_records(control.values()))?;
    }
    Ok(())
}

fn play(args: PlayArgs) -> Result<()> {
    let seed = args.seed.unwrap_or_else(rand::random);
    log::debug!("{:<32}{:<32}", "dealing with seed", seed);

    let mut game = BlackjackGame::new(InfiniteDeck::new(StdRng::seed_from_u64(seed)));
    let stdin = io::stdin();
    let mut policy = InteractivePolicy::new(stdin.lock(), io::stdout());
    let episode = game.play(&mut policy)?;

    println!("Your hand: {} ({})", episode.player, episode.player.value());
    println!("Dealer hand: {} ({})", episode.dealer, episode.dealer.value());
    println!("{}", episode.outcome);
    Ok(())
}
