use std::ops::RangeInclusive;

use crate::blackjack::{Card, Hand};
use crate::error::{Error, Result};

// Player totals at which the policy is consulted. Below 12 the player always hits.
pub const PLAYER_TOTALS: RangeInclusive<u32> = 12..=20;
// Value of the dealer's visible card; an Ace shows as 11.
pub const DEALER_CARDS: RangeInclusive<u32> = 2..=11;

pub const NUM_STATES: usize = 9 * 10 * 2;

pub type StateId = usize;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct State {
    pub player_total: u32,
    pub dealer_card: u32,
    pub usable_ace: bool,
}

impl State {
    pub fn new(player_total: u32, dealer_card: u32, usable_ace: bool) -> State {
        State {
            player_total: player_total,
            dealer_card: dealer_card,
            usable_ace: usable_ace,
        }
    }

    pub fn from_hand(player: &Hand, dealer_upcard: Card) -> State {
        State {
            player_total: player.value(),
            dealer_card: Hand::from_cards(&[dealer_upcard]).value(),
            usable_ace: player.has_usable_ace(),
        }
    }

    pub fn is_decision(&self) -> bool {
        PLAYER_TOTALS.contains(&self.player_total) && DEALER_CARDS.contains(&self.dealer_card)
    }
}

/// Dense numbering of the decision states.
///
/// Identifiers follow the canonical enumeration: player total ascending, then dealer card
/// ascending, then usable ace (`false` before `true`). The mapping is pure arithmetic, so
/// it can never change during a run.
pub struct StateSpace;

impl StateSpace {
    pub fn len() -> usize {
        NUM_STATES
    }

    pub fn id_of(state: &State) -> Result<StateId> {
        if !state.is_decision() {
            return Err(Error::StateNotFound {
                player_total: state.player_total,
                dealer_card: state.dealer_card,
                usable_ace: state.usable_ace,
            });
        }
        let dealer_count = (DEALER_CARDS.end() - DEALER_CARDS.start() + 1) as usize;
        let player = (state.player_total - PLAYER_TOTALS.start()) as usize;
        let dealer = (state.dealer_card - DEALER_CARDS.start()) as usize;
        Ok((player * dealer_count + dealer) * 2 + state.usable_ace as usize)
    }

    pub fn state_of(id: StateId) -> Option<State> {
        if id >= NUM_STATES {
            return None;
        }
        let dealer_count = (DEALER_CARDS.end() - DEALER_CARDS.start() + 1) as usize;
        let usable_ace = id % 2 == 1;
        let rest = id / 2;
        Some(State {
            player_total: PLAYER_TOTALS.start() + (rest / dealer_count) as u32,
            dealer_card: DEALER_CARDS.start() + (rest % dealer_count) as u32,
            usable_ace: usable_ace,
        })
    }

    // All decision states in identifier order.
    pub fn states() -> impl Iterator<Item = State> {
        PLAYER_TOTALS.flat_map(|player_total| {
            DEALER_CARDS.flat_map(move |dealer_card| {
                (0..2).map(move |ace| State::new(player_total, dealer_card, ace == 1))
            })
        })
    }
}
