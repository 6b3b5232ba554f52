//! Board representation and the rules of Connect Four: dropping pieces into
//! columns, detecting runs of [`RUN_LENGTH`] pieces and full-board ties.

use std::fmt::{self, Write};
use std::str::FromStr;

use anyhow::{bail, Context};
use arrayvec::ArrayVec;
use itertools::Itertools;

use crate::environment::{Outcome, Player};

/// Number of consecutive pieces of one player that wins the game.
pub const RUN_LENGTH: usize = 4;
/// Widest supported board.
pub const MAX_COLUMNS: usize = 16;
/// Tallest supported board.
pub const MAX_ROWS: usize = 16;

/// Column indices, at most one entry per column of the board.
pub type Columns = ArrayVec<u8, MAX_COLUMNS>;

/// Directions of the runs as `(column delta, row delta)`: horizontal,
/// vertical, ascending diagonal and descending diagonal.
const DIRECTIONS: [(i32, i32); 4] = [(1, 0), (0, 1), (1, 1), (1, -1)];

/// Size of the board. Threaded explicitly through every [`Board`] so that
/// nothing depends on global constants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Dimensions {
    rows: u8,
    columns: u8,
}

impl Dimensions {
    /// Classic 6 rows × 7 columns board.
    pub const STANDARD: Self = Self {
        rows: 6,
        columns: 7,
    };

    /// Validates and creates board dimensions.
    ///
    /// # Errors
    ///
    /// Returns an error if either dimension is zero or exceeds [`MAX_ROWS`] or
    /// [`MAX_COLUMNS`].
    pub fn new(rows: u8, columns: u8) -> anyhow::Result<Self> {
        if rows == 0 || usize::from(rows) > MAX_ROWS {
            bail!("number of rows should be within 1..={MAX_ROWS}, got {rows}");
        }
        if columns == 0 || usize::from(columns) > MAX_COLUMNS {
            bail!("number of columns should be within 1..={MAX_COLUMNS}, got {columns}");
        }
        Ok(Self { rows, columns })
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn rows(self) -> u8 {
        self.rows
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn columns(self) -> u8 {
        self.columns
    }

    /// Total number of cells on the board.
    #[must_use]
    pub fn cells(self) -> usize {
        usize::from(self.rows) * usize::from(self.columns)
    }

    fn contains(self, column: i32, row: i32) -> bool {
        (0..i32::from(self.columns)).contains(&column) && (0..i32::from(self.rows)).contains(&row)
    }
}

impl Default for Dimensions {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.columns)
    }
}

/// Snapshot of the board. Each [`Board`] owns its cells: copies are never
/// shared between search tree nodes.
///
/// Two boards are equal iff their dimensions and every cell match (column
/// heights are derived from the cells).
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Board {
    dimensions: Dimensions,
    /// Row-major cells, row 0 is the bottom of the board.
    cells: Vec<Option<Player>>,
    /// Number of pieces in each column.
    heights: ArrayVec<u8, MAX_COLUMNS>,
}

impl Board {
    /// Creates an empty board.
    #[must_use]
    pub fn new(dimensions: Dimensions) -> Self {
        Self {
            dimensions,
            cells: vec![None; dimensions.cells()],
            heights: (0..dimensions.columns).map(|_| 0).collect(),
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    fn index(&self, row: u8, column: u8) -> usize {
        usize::from(row) * usize::from(self.dimensions.columns) + usize::from(column)
    }

    /// Returns the piece at given cell. Row 0 is the bottom row.
    ///
    /// # Panics
    ///
    /// Panics if the cell is outside of the board.
    #[must_use]
    pub fn cell(&self, row: u8, column: u8) -> Option<Player> {
        assert!(row < self.dimensions.rows && column < self.dimensions.columns);
        self.cells[self.index(row, column)]
    }

    /// Returns the row the next piece dropped into `column` would land on, or
    /// `None` if the column is full or does not exist.
    #[must_use]
    pub fn drop_row(&self, column: u8) -> Option<u8> {
        let height = *self.heights.get(usize::from(column))?;
        (height < self.dimensions.rows).then_some(height)
    }

    /// Columns outside of the board are never playable and are reported as
    /// full.
    #[must_use]
    pub fn is_column_full(&self, column: u8) -> bool {
        self.drop_row(column).is_none()
    }

    /// Columns that can accept another piece, in ascending order.
    #[must_use]
    pub fn legal_columns(&self) -> Columns {
        (0..self.dimensions.columns)
            .filter(|&column| !self.is_column_full(column))
            .collect()
    }

    /// Number of pieces on the board.
    #[must_use]
    pub fn plies(&self) -> u32 {
        self.heights.iter().map(|&height| u32::from(height)).sum()
    }

    /// Player to move, assuming [`Player::First`] started the game.
    #[must_use]
    pub fn to_move(&self) -> Player {
        Player::from_parity(self.plies())
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.heights.iter().all(|&height| height == self.dimensions.rows)
    }

    /// Drops a piece of `player` into `column`.
    ///
    /// # Errors
    ///
    /// Illegal moves (column out of range or full) are rejected and the board
    /// is left untouched.
    pub fn play(&mut self, column: u8, player: Player) -> anyhow::Result<()> {
        if column >= self.dimensions.columns {
            bail!(
                "column {column} is out of range, expected 0..{}",
                self.dimensions.columns
            );
        }
        let Some(row) = self.drop_row(column) else {
            bail!("column {column} is full");
        };
        let index = self.index(row, column);
        self.cells[index] = Some(player);
        self.heights[usize::from(column)] += 1;
        Ok(())
    }

    /// Returns a copy of the board with the move applied.
    ///
    /// # Errors
    ///
    /// Same as [`Board::play`].
    pub fn apply_move(&self, column: u8, player: Player) -> anyhow::Result<Self> {
        let mut board = self.clone();
        board.play(column, player)?;
        Ok(board)
    }

    /// Checks whether the game is decided: a run of [`RUN_LENGTH`] pieces in
    /// any direction or a completely filled board.
    #[must_use]
    pub fn game_over(&self) -> Option<Outcome> {
        for row in 0..self.dimensions.rows {
            for column in 0..self.dimensions.columns {
                let Some(player) = self.cell(row, column) else {
                    continue;
                };
                let starts_run = DIRECTIONS.iter().any(|&direction| {
                    self.run_length(column, row, direction, player) >= RUN_LENGTH
                });
                if starts_run {
                    return Some(Outcome::Win(player));
                }
            }
        }
        if self.is_full() {
            return Some(Outcome::Tie);
        }
        None
    }

    /// Returns `true` if `player` dropping a piece into `column` completes a
    /// run. Only the lines through the landing cell are inspected.
    #[must_use]
    pub fn is_winning_move(&self, column: u8, player: Player) -> bool {
        let Some(row) = self.drop_row(column) else {
            return false;
        };
        DIRECTIONS.iter().any(|&(d_column, d_row)| {
            let forward = self.run_length(column, row, (d_column, d_row), player);
            let backward = self.run_length(column, row, (-d_column, -d_row), player);
            // Both runs include the landing cell.
            forward + backward - 1 >= RUN_LENGTH
        })
    }

    /// Counts consecutive pieces of `player` starting at `(column, row)` and
    /// moving in `direction`. The starting cell is counted as if it belonged
    /// to `player`.
    fn run_length(&self, column: u8, row: u8, direction: (i32, i32), player: Player) -> usize {
        let (d_column, d_row) = direction;
        let mut length = 1;
        let (mut column, mut row) = (i32::from(column) + d_column, i32::from(row) + d_row);
        while self.dimensions.contains(column, row)
            && self.cells[self.index(row as u8, column as u8)] == Some(player)
        {
            length += 1;
            column += d_column;
            row += d_row;
        }
        length
    }

    /// Parses the board notation: rows from top to bottom separated by `/`,
    /// `.` for empty cells, `X` and `O` for the pieces of the first and second
    /// player.
    ///
    /// # Errors
    ///
    /// Rejects rows of different widths, unsupported dimensions, unknown
    /// symbols, pieces hanging above empty cells and piece counts that could
    /// not be reached with players alternating moves.
    pub fn from_notation(input: &str) -> anyhow::Result<Self> {
        let rows = input.trim().split('/').collect_vec();
        let width = rows.first().map_or(0, |row| row.chars().count());
        if let Some(row) = rows.iter().find(|row| row.chars().count() != width) {
            bail!("all rows should have {width} cells, got '{row}'");
        }
        let dimensions = Dimensions::new(
            u8::try_from(rows.len()).context("too many rows")?,
            u8::try_from(width).context("too many columns")?,
        )?;
        let mut board = Self::new(dimensions);
        for (row, symbols) in rows.iter().rev().enumerate() {
            for (column, symbol) in symbols.chars().enumerate() {
                let piece = match symbol {
                    '.' => None,
                    _ => Some(Player::try_from(symbol)?),
                };
                let index = row * usize::from(dimensions.columns) + column;
                board.cells[index] = piece;
            }
        }
        for column in 0..dimensions.columns {
            let height = (0..dimensions.rows)
                .take_while(|&row| board.cell(row, column).is_some())
                .count();
            if (0..dimensions.rows)
                .skip(height)
                .any(|row| board.cell(row, column).is_some())
            {
                bail!("column {column} has pieces above an empty cell");
            }
            board.heights[usize::from(column)] = height as u8;
        }
        let first = board.cells.iter().filter(|&&cell| cell == Some(Player::First)).count();
        let second = board.cells.iter().filter(|&&cell| cell == Some(Player::Second)).count();
        if first != second && first != second + 1 {
            bail!("players should alternate moves, got {first} 'X' and {second} 'O' pieces");
        }
        Ok(board)
    }

    /// Human-friendly rendering: `_` for empty cells, a separator line and
    /// the column indices that can be typed in.
    #[must_use]
    pub fn render(&self) -> String {
        let mut result = String::new();
        for row in (0..self.dimensions.rows).rev() {
            let line = (0..self.dimensions.columns)
                .map(|column| self.cell(row, column).map_or('_', Player::symbol))
                .join("  ");
            result.push_str(&line);
            result.push('\n');
        }
        let width = 3 * usize::from(self.dimensions.columns) - 2;
        result.push_str(&"-".repeat(width));
        result.push('\n');
        result.push_str(&(0..self.dimensions.columns).join("  "));
        result
    }
}

impl TryFrom<&str> for Board {
    type Error = anyhow::Error;

    fn try_from(input: &str) -> anyhow::Result<Self> {
        Self::from_notation(input)
    }
}

impl FromStr for Board {
    type Err = anyhow::Error;

    fn from_str(input: &str) -> anyhow::Result<Self> {
        Self::from_notation(input)
    }
}

impl fmt::Display for Board {
    /// Serializes the board in the notation accepted by
    /// [`Board::from_notation`].
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..self.dimensions.rows).rev() {
            for column in 0..self.dimensions.columns {
                f.write_char(self.cell(row, column).map_or('.', Player::symbol))?;
            }
            if row > 0 {
                f.write_char('/')?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.render())?;
        writeln!(f, "Player to move: {}", self.to_move())?;
        write!(f, "Notation: {self}")
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn empty() -> Board {
        Board::new(Dimensions::STANDARD)
    }

    #[test]
    fn dimensions() {
        assert_eq!(Dimensions::default(), Dimensions::new(6, 7).unwrap());
        assert_eq!(Dimensions::STANDARD.cells(), 42);
        assert!(Dimensions::new(0, 7).is_err());
        assert!(Dimensions::new(6, 0).is_err());
        assert!(Dimensions::new(6, 17).is_err());
        assert_eq!(Dimensions::new(5, 4).unwrap().to_string(), "5x4");
    }

    #[test]
    fn pieces_stack_from_the_bottom() {
        let mut board = empty();
        assert_eq!(board.drop_row(3), Some(0));
        board.play(3, Player::First).unwrap();
        board.play(3, Player::Second).unwrap();
        assert_eq!(board.cell(0, 3), Some(Player::First));
        assert_eq!(board.cell(1, 3), Some(Player::Second));
        assert_eq!(board.cell(2, 3), None);
        assert_eq!(board.drop_row(3), Some(2));
        assert_eq!(board.plies(), 2);
        assert_eq!(board.to_move(), Player::First);
    }

    #[test]
    fn illegal_moves_do_not_mutate() {
        let mut board = empty();
        for _ in 0..6 {
            board.play(0, Player::First).unwrap();
        }
        let snapshot = board.clone();
        assert!(board.is_column_full(0));
        assert!(board.play(0, Player::Second).is_err());
        assert!(board.play(7, Player::Second).is_err());
        assert_eq!(board, snapshot);
        assert!(board.is_column_full(7));
        assert_eq!(board.legal_columns().as_slice(), &[1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn apply_move_keeps_original() {
        let board = empty();
        let next = board.apply_move(2, Player::First).unwrap();
        assert_ne!(board, next);
        assert_eq!(board.plies(), 0);
        assert_eq!(next.cell(0, 2), Some(Player::First));
    }

    #[test]
    fn runs_in_all_directions() {
        let horizontal = Board::from_notation(
            "......./......./......./......./OOO..../XXXX...",
        )
        .unwrap();
        assert_eq!(horizontal.game_over(), Some(Outcome::Win(Player::First)));

        let vertical =
            Board::from_notation("......./......./.O...../.OX..../.OX..../.OX.X..").unwrap();
        assert_eq!(vertical.game_over(), Some(Outcome::Win(Player::Second)));

        let ascending =
            Board::from_notation("......./......./...X.../..XO.../.XOO.../XOOXX..").unwrap();
        assert_eq!(ascending.game_over(), Some(Outcome::Win(Player::First)));

        let descending =
            Board::from_notation("......./......./O....../XO...../XXO..../XXOOX..").unwrap();
        assert_eq!(descending.game_over(), Some(Outcome::Win(Player::Second)));
    }

    #[test]
    fn no_run_of_three() {
        let board = Board::from_notation("......./......./......./......./OO...../XXX....").unwrap();
        assert_eq!(board.game_over(), None);
    }

    #[test]
    fn full_board_tie() {
        let board = Board::from_notation(
            "OOXXOOX/XXOOXXO/OOXXOOX/XXOOXXO/OOXXOOX/XXOOXXO",
        )
        .unwrap();
        assert!(board.is_full());
        assert!(board.legal_columns().is_empty());
        assert_eq!(board.game_over(), Some(Outcome::Tie));
    }

    #[test]
    fn winning_moves() {
        let board = Board::from_notation("......./......./......./......./OO...../XXX....").unwrap();
        assert!(board.is_winning_move(3, Player::First));
        assert!(!board.is_winning_move(3, Player::Second));
        assert!(!board.is_winning_move(4, Player::First));

        // Filling the gap in the middle of a run.
        let board = Board::from_notation("......./......./......./......./OO.O.../XX.XX..").unwrap();
        assert!(board.is_winning_move(2, Player::First));
        assert!(!board.is_winning_move(2, Player::Second));
    }

    #[test]
    fn notation() {
        let input = "......./......./......./......./...O.../..XX...";
        let board = Board::from_notation(input).unwrap();
        assert_eq!(board.to_string(), input);
        assert_eq!(board.plies(), 3);
        assert_eq!(board.to_move(), Player::Second);
        assert_eq!(Board::try_from(input).unwrap(), board);
        assert_eq!(input.parse::<Board>().unwrap(), board);
        assert_eq!(empty().to_string(), "......./......./......./......./......./.......");
    }

    #[test]
    fn invalid_notation() {
        assert!(Board::from_notation("..../...").is_err());
        assert!(Board::from_notation("X../.../...").is_err());
        assert!(Board::from_notation(".../.../XX.").is_err());
        assert!(Board::from_notation(".../.../.Z.").is_err());
        assert!(Board::from_notation(".../.../O..").is_err());
    }

    #[test]
    fn render() {
        let board = Board::from_notation("..../..../.O../XX..").unwrap();
        assert_eq!(
            board.render(),
            "_  _  _  _\n_  _  _  _\n_  O  _  _\nX  X  _  _\n----------\n0  1  2  3"
        );
    }
}
