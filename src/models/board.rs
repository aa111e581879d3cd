//! Board, Cell, Mark, WinLine and GameOutcome for a 3x3 game.

use serde::{Deserialize, Serialize};
use std::ops::Index;

/// Number of cells on the board.
pub const CELL_COUNT: usize = 9;

/// A player's symbol.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    /// The other player's symbol.
    pub fn opponent(self) -> Mark {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }

    /// The cell occupied by this mark.
    pub fn cell(self) -> Cell {
        match self {
            Mark::X => Cell::X,
            Mark::O => Cell::O,
        }
    }
}

/// One square of the board.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    X,
    O,
}

impl Cell {
    /// The mark in this cell, if any.
    pub fn mark(self) -> Option<Mark> {
        match self {
            Cell::Empty => None,
            Cell::X => Some(Mark::X),
            Cell::O => Some(Mark::O),
        }
    }

    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }
}

/// Three cell indices forming a row, column or diagonal.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct WinLine(pub [usize; 3]);

/// Every line that wins the game, rows first, then columns, then diagonals.
/// Win detection reports the first complete line in this order.
pub const WIN_LINES: [WinLine; 8] = [
    WinLine([0, 1, 2]),
    WinLine([3, 4, 5]),
    WinLine([6, 7, 8]),
    WinLine([0, 3, 6]),
    WinLine([1, 4, 7]),
    WinLine([2, 5, 8]),
    WinLine([0, 4, 8]),
    WinLine([2, 4, 6]),
];

/// Status of a game, always derived from a board.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameOutcome {
    InProgress,
    Won(Mark),
    Drawn,
}

impl GameOutcome {
    pub fn is_over(self) -> bool {
        !matches!(self, GameOutcome::InProgress)
    }
}

/// Nine cells, index 0..8 mapped row-major onto the 3x3 grid.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct Board([Cell; CELL_COUNT]);

impl Board {
    /// An empty board.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cells(cells: [Cell; CELL_COUNT]) -> Self {
        Self(cells)
    }

    /// Parse a board from 9 characters: `X`, `O`, anything else is empty.
    /// Whitespace is ignored, so `"XO. ... ..."` style layouts work.
    pub fn parse(layout: &str) -> Option<Self> {
        let cells: Vec<Cell> = layout
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| match c {
                'X' | 'x' => Cell::X,
                'O' | 'o' => Cell::O,
                _ => Cell::Empty,
            })
            .collect();
        let cells: [Cell; CELL_COUNT] = cells.try_into().ok()?;
        Some(Self(cells))
    }

    pub fn cells(&self) -> &[Cell; CELL_COUNT] {
        &self.0
    }

    /// Cell at `index`, `None` when out of range.
    pub fn get(&self, index: usize) -> Option<Cell> {
        self.0.get(index).copied()
    }

    /// Overwrite a cell. The caller is responsible for keeping the board legal.
    ///
    /// # Panics
    ///
    /// Panics if `index >= CELL_COUNT`. [`Board::get`] is the checked read.
    pub fn set(&mut self, index: usize, cell: Cell) {
        self.0[index] = cell;
    }

    /// Copy of this board with `mark` placed at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= CELL_COUNT`.
    pub fn with_mark(mut self, index: usize, mark: Mark) -> Self {
        self.0[index] = mark.cell();
        self
    }

    /// Number of occupied cells.
    pub fn occupied(&self) -> usize {
        self.0.iter().filter(|c| !c.is_empty()).count()
    }

    pub fn is_full(&self) -> bool {
        self.0.iter().all(|c| !c.is_empty())
    }
}

/// # Panics
///
/// Indexing panics if `index >= CELL_COUNT`; use [`Board::get`] for a checked read.
impl Index<usize> for Board {
    type Output = Cell;

    fn index(&self, index: usize) -> &Cell {
        &self.0[index]
    }
}

/// Why a placement was refused. The session is left unchanged.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum MoveError {
    /// Index outside 0..8.
    OutOfBounds(usize),
    /// Cell already taken.
    Occupied(usize),
    /// The game is already won or drawn.
    GameOver,
}

impl std::fmt::Display for MoveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MoveError::OutOfBounds(i) => write!(f, "Cell {} is outside the board", i),
            MoveError::Occupied(i) => write!(f, "Cell {} is already occupied", i),
            MoveError::GameOver => write!(f, "The game is already over"),
        }
    }
}

impl std::error::Error for MoveError {}
