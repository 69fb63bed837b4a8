use std::fmt;

use crate::blackjack::state::{State, StateId, StateSpace};
use crate::blackjack::{Action, Card, DrawSource, Hand};
use crate::error::Result;
use crate::solver::Policy;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Outcome {
    Win,
    Draw,
    Lose,
}

impl Outcome {
    pub fn reward(&self) -> f64 {
        match self {
            Outcome::Win => 1.0,
            Outcome::Draw => 0.0,
            Outcome::Lose => -1.0,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Win => write!(f, "Congratulations, you won!"),
            Outcome::Draw => write!(f, "It looks like you tied!"),
            Outcome::Lose => write!(f, "Sorry, you lost!"),
        }
    }
}

// One recorded decision. Reward is 0 except on the last step, which carries the outcome.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Step {
    pub state: StateId,
    pub action: Action,
    pub reward: f64,
}

#[derive(Clone, Debug)]
pub struct Episode {
    pub steps: Vec<Step>,
    pub outcome: Outcome,
    pub player: Hand,
    pub dealer: Hand,
}

impl Episode {
    pub fn reward(&self) -> f64 {
        self.outcome.reward()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Phase {
    Dealing,
    PlayerTurn,
    DealerTurn,
    Resolved(Outcome),
}

struct Round {
    player: Hand,
    dealer: Hand,
    steps: Vec<Step>,
}

impl Round {
    // The first dealer card is the visible one.
    fn upcard(&self) -> Card {
        self.dealer.cards()[0]
    }
}

/// One player against a dealer who hits below 17, drawing from `D`.
pub struct BlackjackGame<D: DrawSource> {
    deck: D,
}

impl<D: DrawSource> BlackjackGame<D> {
    pub fn new(deck: D) -> BlackjackGame<D> {
        BlackjackGame { deck: deck }
    }

    // Plays a full round. The policy is consulted only at decision states; totals below
    // 12 are hit without asking and without recording a step.
    pub fn play<P: Policy + ?Sized>(&mut self, policy: &mut P) -> Result<Episode> {
        policy.begin_episode();

        let mut round = Round {
            player: Hand::default(),
            dealer: Hand::default(),
            steps: Vec::new(),
        };
        let mut phase = Phase::Dealing;
        let outcome = loop {
            phase = match phase {
                Phase::Dealing => self.deal(&mut round),
                Phase::PlayerTurn => self.player_turn(&mut round, policy)?,
                Phase::DealerTurn => self.dealer_turn(&mut round),
                Phase::Resolved(outcome) => break outcome,
            };
        };

        if let Some(last) = round.steps.last_mut() {
            last.reward = outcome.reward();
        }
        log::debug!(
            "player {} dealer {} -> {:?} after {} decisions",
            round.player,
            round.dealer,
            outcome,
            round.steps.len()
        );

        Ok(Episode {
            steps: round.steps,
            outcome: outcome,
            player: round.player,
            dealer: round.dealer,
        })
    }

    fn deal(&mut self, round: &mut Round) -> Phase {
        round.player.add_card(self.deck.draw());
        round.player.add_card(self.deck.draw());
        round.dealer.add_card(self.deck.draw());
        round.dealer.add_card(self.deck.draw());

        // A natural needs no decision.
        if round.player.is_blackjack() {
            Phase::DealerTurn
        } else {
            Phase::PlayerTurn
        }
    }

    fn player_turn<P: Policy + ?Sized>(&mut self, round: &mut Round, policy: &mut P) -> Result<Phase> {
        loop {
            let state = State::from_hand(&round.player, round.upcard());
            let action = if state.player_total < 12 {
                Action::Hit
            } else {
                let action = policy.select(&state)?;
                round.steps.push(Step {
                    state: StateSpace::id_of(&state)?,
                    action: action,
                    reward: 0.0,
                });
                action
            };

            match action {
                Action::Hit => {
                    round.player.add_card(self.deck.draw());
                    if round.player.is_blackjack() {
                        return Ok(Phase::DealerTurn);
                    }
                    if round.player.is_bust() {
                        return Ok(Phase::Resolved(Outcome::Lose));
                    }
                }
                Action::Stick => return Ok(Phase::DealerTurn),
            }
        }
    }

    fn dealer_turn(&mut self, round: &mut Round) -> Phase {
        while round.dealer.dealer_must_hit() {
            round.dealer.add_card(self.deck.draw());
        }
        Phase::Resolved(resolve(&round.player, &round.dealer))
    }
}

// Outcome for a player who did not bust.
fn resolve(player: &Hand, dealer: &Hand) -> Outcome {
    if dealer.is_bust() {
        return Outcome::Win;
    }
    let player_value = player.value();
    let dealer_value = dealer.value();
    if player_value > dealer_value {
        Outcome::Win
    } else if player_value < dealer_value {
        Outcome::Lose
    } else {
        Outcome::Draw
    }
}
