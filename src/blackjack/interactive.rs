use std::io::{BufRead, ErrorKind, Write};

use crate::blackjack::state::State;
use crate::blackjack::Action;
use crate::error::{Error, Result};
use crate::solver::{fixed_action, Policy};

pub fn parse_yes_no(text: &str) -> Result<bool> {
    match text.trim().to_lowercase().as_str() {
        "y" | "yes" => Ok(true),
        "n" | "no" => Ok(false),
        _ => Err(Error::InvalidResponse(text.trim().to_string())),
    }
}

/// Asks a human whether to hit, re-prompting until the answer parses.
pub struct InteractivePolicy<R: BufRead, W: Write> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> InteractivePolicy<R, W> {
    pub fn new(input: R, output: W) -> InteractivePolicy<R, W> {
        InteractivePolicy {
            input: input,
            output: output,
        }
    }

    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    fn show_state(&mut self, state: &State) -> Result<()> {
        writeln!(self.output, "--------------------------------------")?;
        writeln!(
            self.output,
            "Your hand value: {}{}",
            state.player_total,
            if state.usable_ace { " (usable ace)" } else { "" }
        )?;
        match state.dealer_card {
            11 => writeln!(self.output, "Dealer shows: A")?,
            v => writeln!(self.output, "Dealer shows: {}", v)?,
        }
        writeln!(self.output, "--------------------------------------")?;
        Ok(())
    }
}

impl<R: BufRead, W: Write> Policy for InteractivePolicy<R, W> {
    fn select(&mut self, state: &State) -> Result<Action> {
        if let Some(action) = fixed_action(state) {
            return Ok(action);
        }
        self.show_state(state)?;
        loop {
            write!(self.output, "Would you like to hit (yes/no)? ")?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Err(Error::Io(ErrorKind::UnexpectedEof.into()));
            }
            match parse_yes_no(&line) {
                Ok(true) => {
                    writeln!(self.output, "Hit!")?;
                    return Ok(Action::Hit);
                }
                Ok(false) => {
                    writeln!(self.output, "Stick!")?;
                    return Ok(Action::Stick);
                }
                Err(e) => {
                    log::warn!("{}", e);
                    writeln!(self.output, "{}", e)?;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::blackjack::game::tests::ScriptedDeck;
    use crate::blackjack::game::{BlackjackGame, Outcome};

    #[test]
    fn parse_yes_no_test() {
        for text in &["y", "Y", "yes", "YES", "Yes", " yes\n"] {
            assert!(parse_yes_no(text).unwrap());
        }
        for text in &["n", "N", "no", "No", "NO\n"] {
            assert!(!parse_yes_no(text).unwrap());
        }
        for text in &["", "maybe", "yep", "nope", "1"] {
            match parse_yes_no(text) {
                Err(Error::InvalidResponse(_)) => {}
                other => panic!("{:?} parsed as {:?}", text, other),
            }
        }
    }

    #[test]
    fn reprompt_test() {
        let mut policy = InteractivePolicy::new(Cursor::new("what\nsure\nn\n"), Vec::new());
        let action = policy.select(&State::new(15, 10, false)).unwrap();
        assert_eq!(action, Action::Stick);

        let transcript = String::from_utf8(policy.output().clone()).unwrap();
        assert_eq!(transcript.matches("Would you like to hit").count(), 3);
        assert!(transcript.contains("Dealer shows: 10"));
    }

    #[test]
    fn end_of_input_test() {
        let mut policy = InteractivePolicy::new(Cursor::new("maybe\n"), Vec::new());
        match policy.select(&State::new(15, 11, true)) {
            Err(Error::Io(e)) => assert_eq!(e.kind(), ErrorKind::UnexpectedEof),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn interactive_round_test() {
        let mut policy = InteractivePolicy::new(Cursor::new("yes\nno\n"), Vec::new());
        let mut game = BlackjackGame::new(ScriptedDeck::new(&["10", "2", "9", "9", "6"]));
        let episode = game.play(&mut policy).unwrap();
        assert_eq!(episode.player.value(), 18);
        assert_eq!(episode.outcome, Outcome::Draw);
    }
}
