//! Board state representation and basic operations

use std::fmt;

use serde::{Deserialize, Serialize};

use super::lines::LineAnalyzer;
use crate::types::{Action, StateKey};

/// Number of rows (and columns) on the board.
pub const BOARD_SIZE: usize = 4;

/// Number of cells on the board.
pub const CELL_COUNT: usize = BOARD_SIZE * BOARD_SIZE;

/// A cell on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    Player,
    Agent,
}

impl Cell {
    pub fn to_char(self) -> char {
        match self {
            Cell::Empty => '-',
            Cell::Player => 'X',
            Cell::Agent => 'O',
        }
    }

    pub fn from_char(c: char) -> Option<Cell> {
        match c {
            '-' => Some(Cell::Empty),
            'X' => Some(Cell::Player),
            'O' => Some(Cell::Agent),
            _ => None,
        }
    }
}

/// The mark a participant places on the board.
///
/// The human or the teacher always plays [`Mark::Player`] (`X`); the learning
/// agent always plays [`Mark::Agent`] (`O`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mark {
    Player,
    Agent,
}

impl Mark {
    /// Get the opposing mark
    pub fn opponent(self) -> Mark {
        match self {
            Mark::Player => Mark::Agent,
            Mark::Agent => Mark::Player,
        }
    }

    /// Convert mark to cell
    pub fn to_cell(self) -> Cell {
        match self {
            Mark::Player => Cell::Player,
            Mark::Agent => Cell::Agent,
        }
    }

    pub fn symbol(self) -> char {
        self.to_cell().to_char()
    }
}

/// A 4x4 grid of cells.
///
/// The board is mutated in place by [`Board::apply_move`]. Cells only ever
/// go from [`Cell::Empty`] to a mark, never back. Heuristic lookahead works
/// on a [`Board::snapshot`], which is a plain copy (the type is `Copy`, 16
/// bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    cells: [Cell; CELL_COUNT],
}

impl Board {
    /// Create an empty board
    pub fn new() -> Self {
        Board {
            cells: [Cell::Empty; CELL_COUNT],
        }
    }

    /// Build a board from a 16 character string in row-major order.
    ///
    /// Whitespace is ignored, so boards can be written one row per line.
    /// Unlike a live game, no turn-order validation is performed; this is
    /// meant for constructing positions in tests and for decoding keys.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidStateKey`] if the cleaned string is not
    /// exactly 16 characters of `-`, `X` or `O`.
    pub fn from_string(s: &str) -> Result<Self, crate::Error> {
        let cleaned: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        let key = StateKey::parse(&cleaned)?;
        let mut cells = [Cell::Empty; CELL_COUNT];
        for (cell, c) in cells.iter_mut().zip(key.as_str().chars()) {
            // parse already rejected unknown characters
            *cell = Cell::from_char(c).unwrap_or(Cell::Empty);
        }
        Ok(Board { cells })
    }

    pub fn cells(&self) -> &[Cell; CELL_COUNT] {
        &self.cells
    }

    /// Get the cell targeted by an action
    pub fn get(&self, action: Action) -> Cell {
        self.cells[action.index()]
    }

    /// Check if the cell targeted by an action is empty
    pub fn is_empty(&self, action: Action) -> bool {
        self.get(action) == Cell::Empty
    }

    /// Place `mark` on the cell targeted by `action`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::CellOccupied`] if the cell already holds a mark.
    /// The board is left untouched on error.
    pub fn apply_move(&mut self, action: Action, mark: Mark) -> Result<(), crate::Error> {
        if !self.is_empty(action) {
            return Err(crate::Error::CellOccupied {
                row: action.row(),
                col: action.col(),
            });
        }
        self.cells[action.index()] = mark.to_cell();
        Ok(())
    }

    /// Place `mark` at raw coordinates, validating them first.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::OutOfBounds`] for coordinates outside 0-3 and
    /// [`crate::Error::CellOccupied`] for an occupied cell.
    pub fn place(&mut self, row: usize, col: usize, mark: Mark) -> Result<(), crate::Error> {
        let action = Action::new(row, col)?;
        self.apply_move(action, mark)
    }

    /// Actions whose target cell is empty, in row-major order
    pub fn legal_actions(&self) -> Vec<Action> {
        Action::all().filter(|&action| self.is_empty(action)).collect()
    }

    /// Count the number of occupied cells on the board.
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&cell| cell != Cell::Empty).count()
    }

    /// True iff any of the ten lines is filled entirely with `mark`
    pub fn check_win(&self, mark: Mark) -> bool {
        LineAnalyzer::has_won(&self.cells, mark)
    }

    /// True iff no empty cell remains.
    ///
    /// Only meaningful after a win has been ruled out.
    pub fn check_draw(&self) -> bool {
        !self.cells.contains(&Cell::Empty)
    }

    /// Immutable copy for lookahead or encoding
    pub fn snapshot(&self) -> Board {
        *self
    }

    /// Canonical lookup key for the current cell contents
    pub fn state_key(&self) -> StateKey {
        StateKey::from_cells(&self.cells)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "   ")?;
        for col in 0..BOARD_SIZE {
            write!(f, " {col}  ")?;
        }
        writeln!(f)?;
        for (row, cells) in self.cells.chunks(BOARD_SIZE).enumerate() {
            write!(f, "{row}  ")?;
            for cell in cells {
                write!(f, " {}  ", cell.to_char())?;
            }
            if row + 1 < BOARD_SIZE {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
