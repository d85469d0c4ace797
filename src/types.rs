//! Newtype wrappers for board coordinates and state keys.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::tictactoe::{BOARD_SIZE, CELL_COUNT, Cell};

/// A target cell on the 4x4 board.
///
/// Ordering is row-major, so sorting a set of actions yields the same order
/// in which [`Action::all`] enumerates them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawAction")]
pub struct Action {
    row: usize,
    col: usize,
}

/// Unchecked wire form of [`Action`].
#[derive(Deserialize)]
struct RawAction {
    row: usize,
    col: usize,
}

impl TryFrom<RawAction> for Action {
    type Error = crate::Error;

    fn try_from(raw: RawAction) -> Result<Self, Self::Error> {
        Self::new(raw.row, raw.col)
    }
}

impl Action {
    /// Create a new action, validating both coordinates are within the board.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::OutOfBounds`] if either coordinate is >= 4.
    pub fn new(row: usize, col: usize) -> Result<Self, crate::Error> {
        if row < BOARD_SIZE && col < BOARD_SIZE {
            Ok(Action { row, col })
        } else {
            Err(crate::Error::OutOfBounds { row, col })
        }
    }

    /// Create an action from a row-major cell index (0-15).
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::OutOfBounds`] if the index is >= 16.
    pub fn from_index(index: usize) -> Result<Self, crate::Error> {
        Self::new(index / BOARD_SIZE, index % BOARD_SIZE)
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn col(&self) -> usize {
        self.col
    }

    /// Row-major cell index (0-15).
    pub fn index(&self) -> usize {
        self.row * BOARD_SIZE + self.col
    }

    /// All 16 actions in row-major order.
    pub fn all() -> impl Iterator<Item = Action> {
        (0..CELL_COUNT).map(|index| Action {
            row: index / BOARD_SIZE,
            col: index % BOARD_SIZE,
        })
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.row, self.col)
    }
}

/// Canonical lookup key for a board configuration.
///
/// The key is the concatenation of the 16 cell symbols in row-major order
/// (`-` empty, `X` player, `O` agent). It depends only on cell contents, never
/// on the order of moves that produced them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StateKey(String);

impl StateKey {
    /// Build a key from the cells of a board.
    pub(crate) fn from_cells(cells: &[Cell; CELL_COUNT]) -> Self {
        StateKey(cells.iter().map(|cell| cell.to_char()).collect())
    }

    /// Parse a key from its string form.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidStateKey`] if the string is not exactly
    /// 16 characters drawn from `-`, `X` and `O`.
    pub fn parse(s: &str) -> Result<Self, crate::Error> {
        let count = s.chars().count();
        if count != CELL_COUNT {
            return Err(crate::Error::InvalidStateKey {
                key: s.to_string(),
                reason: format!("expected {CELL_COUNT} cells, got {count}"),
            });
        }
        if let Some(bad) = s.chars().find(|&c| Cell::from_char(c).is_none()) {
            return Err(crate::Error::InvalidStateKey {
                key: s.to_string(),
                reason: format!("unexpected character '{bad}'"),
            });
        }
        Ok(StateKey(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the cell targeted by `action` is empty in this state.
    pub fn is_open(&self, action: Action) -> bool {
        self.0.as_bytes()[action.index()] == b'-'
    }

    /// Actions whose target cell is empty in this state, in row-major order.
    pub fn legal_actions(&self) -> Vec<Action> {
        Action::all().filter(|&action| self.is_open(action)).collect()
    }
}

impl TryFrom<String> for StateKey {
    type Error = crate::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<StateKey> for String {
    fn from(key: StateKey) -> Self {
        key.0
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
