//! Mapping between boards and value-table lookup keys

use super::Board;
use crate::{Result, types::StateKey};

/// Deterministic board <-> key codec.
///
/// Keys depend only on cell contents: two boards with identical cells map to
/// the same key no matter which move order produced them.
#[derive(Debug, Clone, Copy, Default)]
pub struct StateCodec;

impl StateCodec {
    pub fn encode(board: &Board) -> StateKey {
        board.state_key()
    }

    /// Rebuild the board a key was produced from.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidStateKey`] if the key does not describe
    /// a 4x4 board.
    pub fn decode(key: &StateKey) -> Result<Board> {
        Board::from_string(key.as_str())
    }
}
