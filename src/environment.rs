//! Players and game outcomes shared between the rules in [`crate::game`] and
//! the search in [`crate::mcts`].

use std::fmt;
use std::ops::Not;

use anyhow::bail;

/// Connect Four is played between two players: [`Player::First`] (having the
/// advantage of the first move, rendered as `X`) and [`Player::Second`]
/// (rendered as `O`).
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Player {
    First,
    Second,
}

impl Player {
    /// Returns the player moving at the given parity index. Even plies
    /// belong to [`Player::First`], odd ones to [`Player::Second`].
    #[must_use]
    pub const fn from_parity(count: u32) -> Self {
        if count % 2 == 0 {
            Self::First
        } else {
            Self::Second
        }
    }

    /// Numeric identifier of the player: 1 or 2.
    #[must_use]
    pub const fn index(self) -> u8 {
        match self {
            Self::First => 1,
            Self::Second => 2,
        }
    }

    /// Symbol used in the board notation and when rendering the board.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::First => 'X',
            Self::Second => 'O',
        }
    }
}

impl Not for Player {
    type Output = Self;

    fn not(self) -> Self::Output {
        match self {
            Self::First => Self::Second,
            Self::Second => Self::First,
        }
    }
}

impl TryFrom<char> for Player {
    type Error = anyhow::Error;

    fn try_from(symbol: char) -> anyhow::Result<Self> {
        match symbol {
            'X' | 'x' => Ok(Self::First),
            'O' | 'o' => Ok(Self::Second),
            _ => bail!("player should be 'X' or 'O', got '{symbol}'"),
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Final result of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// One of the players completed a run of four.
    Win(Player),
    /// The board is full and nobody has won.
    Tie,
}

impl Outcome {
    /// Returns the winner code: 0 for a tie, 1 or 2 for the winning player.
    #[must_use]
    pub const fn winner_code(self) -> u8 {
        match self {
            Self::Win(player) => player.index(),
            Self::Tie => 0,
        }
    }

    /// Returns `true` if `player` won the game.
    #[must_use]
    pub fn is_win_for(self, player: Player) -> bool {
        self == Self::Win(player)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Win(player) => write!(f, "player {} ({player}) wins", player.index()),
            Self::Tie => write!(f, "tie"),
        }
    }
}
