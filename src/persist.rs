use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::blackjack::state::StateSpace;
use crate::blackjack::Action;
use crate::error::Result;
use crate::solver::{ActionValues, TabularPolicy};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PolicyRecord {
    pub player_hand_value: u32,
    pub dealer_card_value: u32,
    pub usable_ace: bool,
    pub hit: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActionValueRecord {
    pub player_hand_value: u32,
    pub dealer_card_value: u32,
    pub usable_ace: bool,
    pub q_stick: f64,
    pub q_hit: f64,
}

// One record per decision state, in state-id order.
pub fn policy_records<P: TabularPolicy + ?Sized>(policy: &P) -> Vec<PolicyRecord> {
    StateSpace::states()
        .enumerate()
        .map(|(id, state)| PolicyRecord {
            player_hand_value: state.player_total,
            dealer_card_value: state.dealer_card,
            usable_ace: state.usable_ace,
            hit: policy.greedy_action(id) == Action::Hit,
        })
        .collect()
}

pub fn action_value_records(values: &ActionValues) -> Vec<ActionValueRecord> {
    StateSpace::states()
        .enumerate()
        .map(|(id, state)| ActionValueRecord {
            player_hand_value: state.player_total,
            dealer_card_value: state.dealer_card,
            usable_ace: state.usable_ace,
            q_stick: values.value(id, Action::Stick),
            q_hit: values.value(id, Action::Hit),
        })
        .collect()
}

pub fn write_json<T: Serialize, P: AsRef<Path>>(path: P, records: &[T]) -> Result<()> {
    let writer = BufWriter::new(File::create(path.as_ref())?);
    serde_json::to_writer_pretty(writer, records)?;
    log::info!("{:<32}{:<32}", "saved", path.as_ref().display());
    Ok(())
}
