pub mod game;
pub mod interactive;
pub mod state;

use std::fmt;
use std::str::FromStr;

use rand::prelude::*;

use prettytable::{Cell, Row, Table};

use crate::solver::{ActionValues, TabularPolicy};
use state::{State, StateSpace, DEALER_CARDS, PLAYER_TOTALS};

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Card {
    Ace,
    // Pip cards 2..=10.
    Value(u32),
    Jack,
    Queen,
    King,
}

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Action {
    Stick,
    Hit,
}

// Ordered sequence of cards held by one party.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Card {
    pub const ALL: [Card; 13] = [
        Card::Value(2),
        Card::Value(3),
        Card::Value(4),
        Card::Value(5),
        Card::Value(6),
        Card::Value(7),
        Card::Value(8),
        Card::Value(9),
        Card::Value(10),
        Card::Jack,
        Card::Queen,
        Card::King,
        Card::Ace,
    ];

    pub fn is_ace(&self) -> bool {
        match self {
            Card::Ace => true,
            _ => false,
        }
    }

    // Ace counts as 1 here; promotion to 11 is a property of the hand.
    pub fn value(&self) -> u32 {
        match self {
            Card::Ace => 1,
            Card::Value(v) => *v,
            Card::Jack | Card::Queen | Card::King => 10,
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Card::Ace => write!(f, "A"),
            Card::Value(v) => write!(f, "{}", v),
            Card::Jack => write!(f, "J"),
            Card::Queen => write!(f, "Q"),
            Card::King => write!(f, "K"),
        }
    }
}

impl FromStr for Card {
    type Err = String;

    fn from_str(s: &str) -> Result<Card, String> {
        match s {
            "A" => Ok(Card::Ace),
            "J" => Ok(Card::Jack),
            "Q" => Ok(Card::Queen),
            "K" => Ok(Card::King),
            _ => match s.parse::<u32>() {
                Ok(v) if (2..=10).contains(&v) => Ok(Card::Value(v)),
                _ => Err(format!("unknown card {:?}", s)),
            },
        }
    }
}

impl Action {
    pub const ALL: [Action; 2] = [Action::Stick, Action::Hit];

    // Column in the action-value arena.
    pub fn index(&self) -> usize {
        match self {
            Action::Stick => 0,
            Action::Hit => 1,
        }
    }
}

impl Hand {
    pub fn from_cards(cards: &[Card]) -> Hand {
        Hand {
            cards: cards.to_vec(),
        }
    }

    pub fn add_card(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn value(&self) -> u32 {
        self.value_with(false)
    }

    // Highest total not above 21 when one ace may count as 11.
    // With `ace_as_one` every ace counts as 1.
    pub fn value_with(&self, ace_as_one: bool) -> u32 {
        let hard: u32 = self.cards.iter().map(|c| c.value()).sum();
        let has_ace = self.cards.iter().any(|c| c.is_ace());
        if has_ace && !ace_as_one && hard + 10 <= 21 {
            hard + 10
        } else {
            hard
        }
    }

    // Any 21 counts; the two-card natural is only special at deal time.
    pub fn is_blackjack(&self) -> bool {
        self.value() == 21
    }

    pub fn is_bust(&self) -> bool {
        self.value() > 21
    }

    pub fn dealer_must_hit(&self) -> bool {
        self.value() < 17
    }

    pub fn has_usable_ace(&self) -> bool {
        self.cards.iter().any(|c| c.is_ace()) && self.value_with(true) + 10 <= 21
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cards: Vec<String> = self.cards.iter().map(|c| c.to_string()).collect();
        write!(f, "[{}]", cards.join(", "))
    }
}

// Source of the cards dealt in a round.
pub trait DrawSource {
    fn draw(&mut self) -> Card;
}

// Infinite shoe: every draw is uniform over the 13 ranks, no depletion.
pub struct InfiniteDeck<R: Rng> {
    rng: R,
}

impl<R: Rng> InfiniteDeck<R> {
    pub fn new(rng: R) -> InfiniteDeck<R> {
        InfiniteDeck { rng: rng }
    }
}

impl<R: Rng> DrawSource for InfiniteDeck<R> {
    fn draw(&mut self) -> Card {
        random_card(&mut self.rng)
    }
}

pub fn random_card<R: Rng + ?Sized>(rng: &mut R) -> Card {
    Card::ALL[rng.gen_range(0..Card::ALL.len())]
}

// A policy that only sticks on 20 or higher.
pub fn stick_at_20_policy(state: &State) -> Action {
    if state.player_total < 20 {
        Action::Hit
    } else {
        Action::Stick
    }
}

fn dealer_header() -> Vec<Cell> {
    let mut header = Vec::new();
    header.push(Cell::new(""));
    for dealer_card in DEALER_CARDS {
        header.push(match dealer_card {
            11 => Cell::new("A"),
            v => Cell::new(&format!("{}", v)),
        });
    }
    header
}

fn print_grid<F>(title: &str, usable_ace: bool, mut cell: F)
where
    F: FnMut(&State) -> String,
{
    println!("{} ({} usable ace)", title, if usable_ace { "with" } else { "no" });

    let mut table = Table::new();
    table.add_row(Row::new(dealer_header()));
    for player_total in PLAYER_TOTALS.rev() {
        let mut cells = Vec::new();
        cells.push(Cell::new(&format!("{}", player_total)));
        for dealer_card in DEALER_CARDS {
            let state = State {
                player_total: player_total,
                dealer_card: dealer_card,
                usable_ace: usable_ace,
            };
            cells.push(Cell::new(&cell(&state)));
        }
        table.add_row(Row::new(cells));
    }
    table.printstd();
}

pub fn print_policy<P: TabularPolicy + ?Sized>(policy: &P) {
    for usable_ace in &[false, true] {
        print_grid("Policy", *usable_ace, |state| {
            match StateSpace::id_of(state).map(|id| policy.greedy_action(id)) {
                Ok(Action::Hit) => "H".to_string(),
                Ok(Action::Stick) => "S".to_string(),
                Err(_) => "".to_string(),
            }
        });
    }
}

pub fn print_action_values(values: &ActionValues) {
    for usable_ace in &[false, true] {
        print_grid("Q(stick) / Q(hit)", *usable_ace, |state| {
            match StateSpace::id_of(state) {
                Ok(id) => format!(
                    "{:.2}/{:.2}",
                    values.value(id, Action::Stick),
                    values.value(id, Action::Hit)
                ),
                Err(_) => "".to_string(),
            }
        });
    }
}

#[cfg(test)]
pub(crate) fn cards(tokens: &[&str]) -> Vec<Card> {
    tokens.iter().map(|t| t.parse().unwrap()).collect()
}

#[cfg(test)]
pub(crate) fn hand(tokens: &[&str]) -> Hand {
    Hand::from_cards(&cards(tokens))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hand_value_test() {
        assert_eq!(hand(&["A", "K"]).value(), 21);
        assert_eq!(hand(&["A", "A"]).value(), 12);
        assert_eq!(hand(&["10", "10", "5"]).value(), 25);
        assert_eq!(hand(&["A", "9"]).value(), 20);
        assert_eq!(hand(&["A", "A", "9"]).value(), 21);
        assert_eq!(hand(&["A", "A", "A", "A"]).value(), 14);
        assert_eq!(hand(&["J", "Q", "A"]).value(), 21);

        for card in Card::ALL.iter().filter(|c| !c.is_ace()) {
            assert_eq!(Hand::from_cards(&[*card]).value(), card.value());
        }
        assert_eq!(hand(&["A"]).value(), 11);
    }

    #[test]
    fn ace_as_one_test() {
        assert_eq!(hand(&["A", "9"]).value_with(true), 10);
        assert_eq!(hand(&["A", "A", "9"]).value_with(true), 11);
        assert_eq!(hand(&["K", "7"]).value_with(true), 17);
    }

    #[test]
    fn bust_and_blackjack_test() {
        assert!(hand(&["10", "10", "5"]).is_bust());
        assert!(!hand(&["10", "A"]).is_bust());
        assert!(hand(&["10", "A"]).is_blackjack());
        assert!(hand(&["7", "7", "7"]).is_blackjack());
        assert!(!hand(&["10", "9"]).is_blackjack());
    }

    #[test]
    fn usable_ace_test() {
        assert!(hand(&["A", "6"]).has_usable_ace());
        assert!(!hand(&["A", "6", "5"]).has_usable_ace());
        assert!(hand(&["A", "A", "9"]).has_usable_ace());
        assert!(!hand(&["10", "6"]).has_usable_ace());
        assert!(hand(&["A", "10"]).has_usable_ace());
    }

    #[test]
    fn dealer_must_hit_test() {
        for total in 4..=16 {
            let h = if total <= 11 {
                Hand::from_cards(&[Card::Value(2), Card::Value(total - 2)])
            } else {
                Hand::from_cards(&[Card::King, Card::Value(total - 10)])
            };
            assert_eq!(h.value(), total);
            assert!(h.dealer_must_hit(), "total {}", total);
        }
        for total in 17..=21 {
            let h = Hand::from_cards(&[Card::King, Card::Value(total - 10 - 2), Card::Value(2)]);
            assert_eq!(h.value(), total);
            assert!(!h.dealer_must_hit(), "total {}", total);
        }
        // Soft 17 stands.
        assert!(!hand(&["A", "6"]).dealer_must_hit());
    }

    #[test]
    fn card_token_test() {
        for card in Card::ALL.iter() {
            assert_eq!(card.to_string().parse::<Card>(), Ok(*card));
        }
        assert!("1".parse::<Card>().is_err());
        assert!("11".parse::<Card>().is_err());
        assert!("X".parse::<Card>().is_err());
    }

    #[test]
    fn infinite_deck_test() {
        let mut deck = InfiniteDeck::new(StdRng::seed_from_u64(7));
        let mut replay = InfiniteDeck::new(StdRng::seed_from_u64(7));
        let mut seen = std::collections::HashSet::new();
        for _ in 0..2000 {
            let card = deck.draw();
            assert_eq!(card, replay.draw());
            seen.insert(card);
        }
        assert_eq!(seen.len(), 13);
    }
}
