//! Rules of Connect Four and the bookkeeping of a real match.

mod board;

use anyhow::bail;
pub use board::{Board, Columns, Dimensions, MAX_COLUMNS, MAX_ROWS, RUN_LENGTH};

use crate::environment::{Outcome, Player};

/// The game actually being played: the current board, the columns played so
/// far and the final outcome once it is known.
#[derive(Clone, Debug)]
pub struct Game {
    board: Board,
    history: Vec<u8>,
    outcome: Option<Outcome>,
}

impl Game {
    /// Starts a new game on an empty board.
    #[must_use]
    pub fn new(dimensions: Dimensions) -> Self {
        Self {
            board: Board::new(dimensions),
            history: Vec::new(),
            outcome: None,
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// Columns played since the start of the game, in order.
    #[must_use]
    pub fn history(&self) -> &[u8] {
        &self.history
    }

    /// Returns the result of the game if it is over.
    #[must_use]
    pub const fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn to_move(&self) -> Player {
        self.board.to_move()
    }

    /// Drops a piece of the player to move into `column` and returns the
    /// outcome if this move ended the game.
    ///
    /// # Errors
    ///
    /// The move is rejected without changing the game if it is illegal or the
    /// game is already over.
    pub fn play(&mut self, column: u8) -> anyhow::Result<Option<Outcome>> {
        if let Some(outcome) = self.outcome {
            bail!("the game is already over: {outcome}");
        }
        let player = self.to_move();
        self.board.play(column, player)?;
        self.history.push(column);
        self.outcome = self.board.game_over();
        Ok(self.outcome)
    }
}
