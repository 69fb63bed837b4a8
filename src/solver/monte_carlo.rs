use crate::blackjack::game::{BlackjackGame, Step};
use crate::blackjack::DrawSource;
use crate::error::Result;
use crate::solver::{ActionValues, Greedy, Policy, TabularPolicy};

/// First-visit Monte Carlo control over the blackjack decision states.
///
/// Owns the only mutable learning state: the action-value arena and the policy table.
/// Each episode is played with the policy as it stands after every previous update.
pub struct MonteCarloControl<P: TabularPolicy, D: DrawSource> {
    game: BlackjackGame<D>,
    policy: P,
    values: ActionValues,
}

impl<P: TabularPolicy, D: DrawSource> MonteCarloControl<P, D> {
    pub fn new(game: BlackjackGame<D>, policy: P) -> MonteCarloControl<P, D> {
        MonteCarloControl {
            game: game,
            policy: policy,
            values: ActionValues::new(),
        }
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    pub fn values(&self) -> &ActionValues {
        &self.values
    }

    // Plays `episodes` episodes, updating values and policy after each one.
    pub fn run(&mut self, episodes: u64) -> Result<&ActionValues> {
        log::info!("{:<32}{:<32}", "beginning training loop", episodes);

        let report_every = (episodes / 10).max(1);
        let mut total_reward = 0.0;
        for i in 1..=episodes {
            let episode = self.game.play(&mut self.policy)?;
            total_reward += episode.reward();
            self.update(&episode.steps);

            if i % report_every == 0 {
                log::info!(
                    "{:<32}{:<16}{:<16.4}",
                    "episodes played",
                    i,
                    total_reward / i as f64
                );
            }
        }

        log::info!(
            "{:<32}{:<32}",
            "finished training, samples",
            self.values.total_visits()
        );
        Ok(&self.values)
    }

    // Credits the undiscounted return to each (state, action) pair at its first occurrence
    // in the trajectory, then improves the policy at that state.
    pub fn update(&mut self, steps: &[Step]) {
        let mut returns = 0.0;
        for (i, step) in steps.iter().enumerate().rev() {
            returns += step.reward;

            let seen_earlier = steps[..i]
                .iter()
                .any(|s| s.state == step.state && s.action == step.action);
            if seen_earlier {
                continue;
            }

            self.values.update(step.state, step.action, returns);
            self.policy.improve(step.state, &self.values);
        }
    }

    // Mean return of the greedy version of the learned policy.
    pub fn evaluate_greedy(&mut self, episodes: u64) -> Result<f64> {
        let mut greedy = Greedy::new(&self.policy);
        evaluate_policy(&mut self.game, &mut greedy, episodes)
    }

    pub fn evaluate<Q: Policy + ?Sized>(&mut self, policy: &mut Q, episodes: u64) -> Result<f64> {
        evaluate_policy(&mut self.game, policy, episodes)
    }
}

// Mean return over `episodes` rounds, without learning.
pub fn evaluate_policy<D, P>(game: &mut BlackjackGame<D>, policy: &mut P, episodes: u64) -> Result<f64>
where
    D: DrawSource,
    P: Policy + ?Sized,
{
    if episodes == 0 {
        return Ok(0.0);
    }
    let mut total_returns = 0.0;
    for _ in 0..episodes {
        total_returns += game.play(policy)?.reward();
    }
    Ok(total_returns / episodes as f64)
}
