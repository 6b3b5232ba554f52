//! The engine puts all pieces together: it plays a game of Connect Four
//! against a human over a text console, searching while it is its turn and
//! while the opponent is thinking.
//!
//! [`Engine::play`] is the "main loop" of the engine which communicates with
//! the opponent through the input and output streams.

use std::io::{BufRead, Write};
use std::time::Duration;

use itertools::Itertools;

use crate::environment::Outcome;
use crate::game::{Dimensions, Game};
use crate::mcts::{Config, SearchTree};

mod command;

use command::Command;

/// How long the engine searches at different stages of the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeControl {
    /// Search from the empty board before the first move.
    pub warmup: Duration,
    /// Search before each of the engine's moves.
    pub engine: Duration,
    /// Search before the opponent is asked for a move.
    pub opponent: Duration,
}

impl Default for TimeControl {
    fn default() -> Self {
        Self {
            warmup: Duration::from_secs(30),
            engine: Duration::from_secs(15),
            opponent: Duration::from_secs(2),
        }
    }
}

/// Result of asking the opponent for a move.
enum Reply {
    Played(Option<Outcome>),
    Quit,
}

/// The Engine connects everything together and handles the opponent's
/// commands, including I/O. The engine is always the first player.
pub struct Engine<R: BufRead, W: Write> {
    game: Game,
    tree: SearchTree,
    time: TimeControl,
    show_stats: bool,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Engine<R, W> {
    /// Creates a new instance of the engine with an empty board and provided
    /// I/O.
    #[must_use]
    pub fn new(
        dimensions: Dimensions,
        config: Config,
        time: TimeControl,
        input: R,
        output: W,
    ) -> Self {
        let game = Game::new(dimensions);
        let tree = SearchTree::new(game.board().clone(), config);
        Self {
            game,
            tree,
            time,
            show_stats: false,
            input,
            output,
        }
    }

    /// Print the statistics of the root children after every search.
    #[must_use]
    pub fn with_stats(mut self, show_stats: bool) -> Self {
        self.show_stats = show_stats;
        self
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn game(&self) -> &Game {
        &self.game
    }

    /// Plays a full game and returns its outcome, or `None` if the opponent
    /// quit or the input ended before the game was decided.
    ///
    /// Malformed input and illegal moves are reported and the opponent is
    /// asked again.
    ///
    /// # Errors
    ///
    /// Propagates I/O errors of the input and output streams.
    pub fn play(&mut self) -> anyhow::Result<Option<Outcome>> {
        writeln!(self.output, "Let's play Connect Four!")?;
        writeln!(self.output, "One moment to initialize the game please.")?;
        self.tree.run_search(self.time.warmup, self.tree.root());
        // Warm-up is not a turn of the game.
        self.tree.reset_turn_depth();

        loop {
            if let Some(outcome) = self.engine_turn()? {
                return self.finish(outcome);
            }
            match self.opponent_turn()? {
                Reply::Played(Some(outcome)) => return self.finish(outcome),
                Reply::Played(None) => {},
                Reply::Quit => {
                    writeln!(self.output, "Bye!")?;
                    return Ok(None);
                },
            }
        }
    }

    fn engine_turn(&mut self) -> anyhow::Result<Option<Outcome>> {
        writeln!(self.output)?;
        writeln!(self.output, "Engine is thinking...")?;
        self.tree.run_search(self.time.engine, self.tree.root());
        if self.show_stats {
            self.write_stats()?;
        }
        if log::log_enabled!(log::Level::Trace) {
            for stats in self.tree.child_stats(self.tree.root()) {
                log::trace!("{stats}");
            }
        }
        let column = match self.tree.best_move() {
            Some(column) => column,
            None => {
                log::warn!("no search statistics at the root, playing the first legal column");
                self.game.board().legal_columns()[0]
            },
        };
        let outcome = self.game.play(column)?;
        writeln!(self.output, "Engine plays column {column}")?;
        self.write_board()?;
        self.tree.advance(self.game.board());
        Ok(outcome)
    }

    fn opponent_turn(&mut self) -> anyhow::Result<Reply> {
        self.tree.run_search(self.time.opponent, self.tree.root());
        loop {
            write!(self.output, "column: ")?;
            self.output.flush()?;
            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                writeln!(self.output)?;
                return Ok(Reply::Quit);
            }
            match Command::parse(&line) {
                Command::Move(column) => match self.game.play(column) {
                    Ok(outcome) => {
                        self.write_board()?;
                        self.tree.advance(self.game.board());
                        return Ok(Reply::Played(outcome));
                    },
                    Err(e) => writeln!(self.output, "Illegal move: {e}")?,
                },
                Command::Board => self.write_board()?,
                Command::Stats => self.write_stats()?,
                Command::Help => self.write_help()?,
                Command::Quit => return Ok(Reply::Quit),
                Command::Unknown(input) => writeln!(
                    self.output,
                    "Expected a column number between 0 and {}, got '{input}'",
                    self.game.board().dimensions().columns() - 1
                )?,
            }
        }
    }

    fn finish(&mut self, outcome: Outcome) -> anyhow::Result<Option<Outcome>> {
        writeln!(self.output, "Game over: {outcome}")?;
        log::info!(
            "game finished after {} plies: {}",
            self.game.history().len(),
            self.game.history().iter().join(" ")
        );
        Ok(Some(outcome))
    }

    fn write_board(&mut self) -> anyhow::Result<()> {
        writeln!(self.output, "{}", self.game.board().render())?;
        Ok(())
    }

    fn write_stats(&mut self) -> anyhow::Result<()> {
        writeln!(self.output, "Child statistics:")?;
        for stats in self.tree.child_stats(self.tree.root()) {
            writeln!(self.output, "  {stats}")?;
        }
        Ok(())
    }

    fn write_help(&mut self) -> anyhow::Result<()> {
        writeln!(
            self.output,
            "Type a column number (0-{}) to drop your piece, 'board' to show the board, \
             'stats' to show the engine's statistics or 'quit' to leave.",
            self.game.board().dimensions().columns() - 1
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use pretty_assertions::assert_eq;

    use super::*;

    fn quick() -> TimeControl {
        TimeControl {
            warmup: Duration::ZERO,
            engine: Duration::from_millis(20),
            opponent: Duration::ZERO,
        }
    }

    fn run(dimensions: Dimensions, input: &str) -> (Option<Outcome>, Vec<u8>, String) {
        let mut output = Vec::new();
        let mut engine = Engine::new(
            dimensions,
            Config::default().with_seed(7),
            quick(),
            Cursor::new(input.as_bytes()),
            &mut output,
        );
        let outcome = engine.play().unwrap();
        let history = engine.game().history().to_vec();
        drop(engine);
        (outcome, history, String::from_utf8(output).unwrap())
    }

    #[test]
    fn malformed_input_is_reprompted() {
        let (outcome, history, output) = run(Dimensions::STANDARD, "abc\n9\nquit\n");
        assert_eq!(outcome, None);
        assert_eq!(history.len(), 1);
        assert!(output.contains("Expected a column number between 0 and 6, got 'abc'"));
        assert!(output.contains("Illegal move: column 9 is out of range"));
        assert!(output.contains("Bye!"));
    }

    #[test]
    fn end_of_input_stops_the_game() {
        let (outcome, _, output) = run(Dimensions::STANDARD, "");
        assert_eq!(outcome, None);
        assert!(output.contains("Engine plays column"));
    }

    #[test]
    fn game_runs_to_completion() {
        // Every column is tried until it is full, so the board fills up
        // before the input runs out.
        let input = "3\n".repeat(4) + &"2\n".repeat(4) + &"1\n".repeat(4) + &"0\n".repeat(4);
        let (outcome, history, output) = run(Dimensions::new(4, 4).unwrap(), &input);
        assert!(outcome.is_some());
        assert!(output.contains("Game over"));
        assert!(history.len() <= 16);
    }

    #[test]
    fn tiny_board_ends_in_a_tie() {
        // A single row can not fit a vertical or diagonal run and two columns
        // are too narrow for a horizontal one.
        let (outcome, history, output) = run(Dimensions::new(1, 2).unwrap(), "1\n0\n");
        assert_eq!(outcome, Some(Outcome::Tie));
        assert_eq!(history.len(), 2);
        assert!(output.contains("Game over: tie"));
    }
}
