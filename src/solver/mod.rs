pub mod monte_carlo;
pub mod policy;

use crate::blackjack::state::{State, StateId, NUM_STATES};
use crate::blackjack::Action;
use crate::error::Result;

pub use policy::{EpsilonSoft, ExploringStarts, Greedy, StickAt20};

// Chooses the player's action at a decision point.
pub trait Policy {
    // Called once before every episode.
    fn begin_episode(&mut self) {}

    fn select(&mut self, state: &State) -> Result<Action>;
}

// A policy backed by one table slot per decision state, improved by the controller.
pub trait TabularPolicy: Policy {
    // The action the policy prefers in this state, ignoring exploration.
    fn greedy_action(&self, id: StateId) -> Action;

    // Makes the policy at `id` greedy (or soft-greedy) with respect to `values`.
    fn improve(&mut self, id: StateId, values: &ActionValues);
}

// Rules that hold regardless of what the table says.
pub fn fixed_action(state: &State) -> Option<Action> {
    if state.player_total < 12 {
        Some(Action::Hit)
    } else if state.player_total == 21 {
        Some(Action::Stick)
    } else {
        None
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ValueEstimate {
    pub avg: f64,
    pub count: u64,
}

impl ValueEstimate {
    pub fn update(&mut self, value: f64) {
        self.count += 1;
        self.avg += (value - self.avg) / self.count as f64;
    }
}

/// Running-average action values, one `[stick, hit]` slot per decision state.
#[derive(Clone, Debug)]
pub struct ActionValues {
    estimates: Vec<[ValueEstimate; 2]>,
}

impl Default for ActionValues {
    fn default() -> ActionValues {
        ActionValues::new()
    }
}

impl ActionValues {
    pub fn new() -> ActionValues {
        ActionValues {
            estimates: vec![[ValueEstimate::default(); 2]; NUM_STATES],
        }
    }

    pub fn estimate(&self, id: StateId, action: Action) -> &ValueEstimate {
        &self.estimates[id][action.index()]
    }

    pub fn value(&self, id: StateId, action: Action) -> f64 {
        self.estimate(id, action).avg
    }

    pub fn update(&mut self, id: StateId, action: Action, returns: f64) {
        self.estimates[id][action.index()].update(returns);
    }

    // Ties go to stick.
    pub fn best_action(&self, id: StateId) -> Action {
        if self.value(id, Action::Hit) > self.value(id, Action::Stick) {
            Action::Hit
        } else {
            Action::Stick
        }
    }

    pub fn total_visits(&self) -> u64 {
        self.estimates
            .iter()
            .flat_map(|e| e.iter())
            .map(|e| e.count)
            .sum()
    }
}
