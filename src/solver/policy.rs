use rand::prelude::*;

use crate::blackjack::state::{State, StateId, StateSpace, NUM_STATES};
use crate::blackjack::{stick_at_20_policy, Action};
use crate::error::Result;
use crate::solver::{fixed_action, ActionValues, Policy, TabularPolicy};

fn random_action<R: Rng + ?Sized>(rng: &mut R) -> Action {
    if rng.gen::<f64>() < 0.5 {
        Action::Hit
    } else {
        Action::Stick
    }
}

/// Deterministic table with exploring starts: the first decision of every episode is
/// taken uniformly at random, the rest follow the table.
pub struct ExploringStarts<R: Rng> {
    actions: Vec<Action>,
    explore: bool,
    rng: R,
}

impl<R: Rng> ExploringStarts<R> {
    // Starts from a random action in every state.
    pub fn new(mut rng: R) -> ExploringStarts<R> {
        let actions = (0..NUM_STATES).map(|_| random_action(&mut rng)).collect();
        ExploringStarts {
            actions: actions,
            explore: true,
            rng: rng,
        }
    }

    pub fn with_action(action: Action, rng: R) -> ExploringStarts<R> {
        ExploringStarts {
            actions: vec![action; NUM_STATES],
            explore: true,
            rng: rng,
        }
    }

    pub fn reset_explore(&mut self) {
        self.explore = true;
    }

    pub fn set_action(&mut self, id: StateId, action: Action) {
        self.actions[id] = action;
    }
}

impl<R: Rng> Policy for ExploringStarts<R> {
    fn begin_episode(&mut self) {
        self.reset_explore();
    }

    fn select(&mut self, state: &State) -> Result<Action> {
        if let Some(action) = fixed_action(state) {
            return Ok(action);
        }
        let id = StateSpace::id_of(state)?;
        if self.explore {
            self.explore = false;
            return Ok(random_action(&mut self.rng));
        }
        Ok(self.actions[id])
    }
}

impl<R: Rng> TabularPolicy for ExploringStarts<R> {
    fn greedy_action(&self, id: StateId) -> Action {
        self.actions[id]
    }

    fn improve(&mut self, id: StateId, values: &ActionValues) {
        self.actions[id] = values.best_action(id);
    }
}

/// Epsilon-soft table: each state holds P(hit), and improvement keeps ε/2 on the
/// non-greedy action so every action stays reachable.
pub struct EpsilonSoft<R: Rng> {
    hit_probabilities: Vec<f64>,
    epsilon: f64,
    rng: R,
}

impl<R: Rng> EpsilonSoft<R> {
    pub fn new(epsilon: f64, rng: R) -> EpsilonSoft<R> {
        assert!((0.0..=1.0).contains(&epsilon));
        EpsilonSoft {
            hit_probabilities: vec![0.5; NUM_STATES],
            epsilon: epsilon,
            rng: rng,
        }
    }

    pub fn hit_probability(&self, id: StateId) -> f64 {
        self.hit_probabilities[id]
    }

    pub fn set_hit_probability(&mut self, id: StateId, probability: f64) {
        self.hit_probabilities[id] = probability;
    }
}

impl<R: Rng> Policy for EpsilonSoft<R> {
    fn select(&mut self, state: &State) -> Result<Action> {
        if let Some(action) = fixed_action(state) {
            return Ok(action);
        }
        let id = StateSpace::id_of(state)?;
        if self.rng.gen::<f64>() < self.hit_probabilities[id] {
            Ok(Action::Hit)
        } else {
            Ok(Action::Stick)
        }
    }
}

impl<R: Rng> TabularPolicy for EpsilonSoft<R> {
    fn greedy_action(&self, id: StateId) -> Action {
        if self.hit_probabilities[id] > 0.5 {
            Action::Hit
        } else {
            Action::Stick
        }
    }

    fn improve(&mut self, id: StateId, values: &ActionValues) {
        let explore = self.epsilon / 2.0;
        self.hit_probabilities[id] = match values.best_action(id) {
            Action::Hit => 1.0 - explore,
            Action::Stick => explore,
        };
    }
}

/// Plays the greedy action of a trained table, with no exploration.
pub struct Greedy<'a, P: TabularPolicy + ?Sized> {
    policy: &'a P,
}

impl<'a, P: TabularPolicy + ?Sized> Greedy<'a, P> {
    pub fn new(policy: &'a P) -> Greedy<'a, P> {
        Greedy { policy: policy }
    }
}

impl<'a, P: TabularPolicy + ?Sized> Policy for Greedy<'a, P> {
    fn select(&mut self, state: &State) -> Result<Action> {
        if let Some(action) = fixed_action(state) {
            return Ok(action);
        }
        Ok(self.policy.greedy_action(StateSpace::id_of(state)?))
    }
}

// Baseline that hits below 20.
pub struct StickAt20;

impl Policy for StickAt20 {
    fn select(&mut self, state: &State) -> Result<Action> {
        Ok(stick_at_20_policy(state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn forced_actions_test() {
        let mut sticky = ExploringStarts::with_action(Action::Stick, rng());
        let mut hitty = ExploringStarts::with_action(Action::Hit, rng());
        for _ in 0..20 {
            sticky.begin_episode();
            hitty.begin_episode();
            assert_eq!(sticky.select(&State::new(10, 7, false)).unwrap(), Action::Hit);
            assert_eq!(hitty.select(&State::new(21, 7, true)).unwrap(), Action::Stick);
        }

        let mut soft = EpsilonSoft::new(0.1, rng());
        for id in 0..NUM_STATES {
            soft.set_hit_probability(id, 0.0);
        }
        assert_eq!(soft.select(&State::new(4, 2, false)).unwrap(), Action::Hit);
        for id in 0..NUM_STATES {
            soft.set_hit_probability(id, 1.0);
        }
        assert_eq!(soft.select(&State::new(21, 2, false)).unwrap(), Action::Stick);
    }

    #[test]
    fn forced_states_do_not_consume_exploration_test() {
        let mut policy = ExploringStarts::with_action(Action::Stick, rng());
        policy.begin_episode();
        policy.select(&State::new(8, 10, false)).unwrap();
        assert!(policy.explore);
        policy.select(&State::new(15, 10, false)).unwrap();
        assert!(!policy.explore);
    }

    #[test]
    fn exploring_start_test() {
        let state = State::new(15, 10, false);
        let mut policy = ExploringStarts::with_action(Action::Stick, rng());
        let mut first_hits = 0;
        for _ in 0..1000 {
            policy.begin_episode();
            if policy.select(&state).unwrap() == Action::Hit {
                first_hits += 1;
            }
            // Later decisions in the same episode follow the table.
            for _ in 0..3 {
                assert_eq!(policy.select(&state).unwrap(), Action::Stick);
            }
        }
        assert!(first_hits > 400 && first_hits < 600, "{}", first_hits);
    }

    #[test]
    fn exploring_starts_improve_test() {
        let state = State::new(18, 6, false);
        let id = StateSpace::id_of(&state).unwrap();
        let mut policy = ExploringStarts::with_action(Action::Hit, rng());
        let mut values = ActionValues::new();
        values.update(id, Action::Stick, 0.4);
        values.update(id, Action::Hit, -0.3);
        policy.improve(id, &values);
        assert_eq!(policy.greedy_action(id), Action::Stick);
    }

    #[test]
    fn epsilon_soft_improve_test() {
        let id = StateSpace::id_of(&State::new(13, 10, false)).unwrap();
        let mut policy = EpsilonSoft::new(0.2, rng());
        let mut values = ActionValues::new();

        values.update(id, Action::Hit, 0.1);
        policy.improve(id, &values);
        assert!((policy.hit_probability(id) - 0.9).abs() < 1e-12);
        assert_eq!(policy.greedy_action(id), Action::Hit);

        values.update(id, Action::Stick, 0.5);
        policy.improve(id, &values);
        assert!((policy.hit_probability(id) - 0.1).abs() < 1e-12);
        assert_eq!(policy.greedy_action(id), Action::Stick);
    }

    #[test]
    fn epsilon_soft_sampling_test() {
        let state = State::new(16, 9, true);
        let id = StateSpace::id_of(&state).unwrap();
        let mut policy = EpsilonSoft::new(0.2, rng());
        policy.set_hit_probability(id, 0.9);
        let hits = (0..10000)
            .filter(|_| policy.select(&state).unwrap() == Action::Hit)
            .count();
        assert!(hits > 8700 && hits < 9300, "{}", hits);
    }

    #[test]
    fn greedy_view_test() {
        let mut trained = ExploringStarts::with_action(Action::Hit, rng());
        let id = StateSpace::id_of(&State::new(19, 3, false)).unwrap();
        trained.set_action(id, Action::Stick);

        let mut greedy = Greedy::new(&trained);
        for _ in 0..10 {
            greedy.begin_episode();
            assert_eq!(greedy.select(&State::new(19, 3, false)).unwrap(), Action::Stick);
            assert_eq!(greedy.select(&State::new(18, 3, false)).unwrap(), Action::Hit);
        }
    }

    #[test]
    fn out_of_range_state_test() {
        let mut policy = ExploringStarts::new(rng());
        assert!(policy.select(&State::new(16, 1, false)).is_err());
    }
}
