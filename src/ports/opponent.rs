//! Opponent port - whoever sits across the board from the learning agent
//!
//! The episode runner only needs a move for the current position and a
//! notification when the game ends. The heuristic teacher and the
//! interactive human player both implement this trait.

use rand::RngCore;

use crate::{
    Result,
    tictactoe::{Board, GameOutcome},
    types::Action,
};

/// Opponent trait - plays the `X` mark against the agent
pub trait Opponent {
    /// Choose a legal move for `board`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NoLegalActions`] when the board is full, or an
    /// I/O error for interactive opponents whose input stream fails.
    fn select_move(&mut self, board: &Board, rng: &mut dyn RngCore) -> Result<Action>;

    /// Called once the episode has a final outcome.
    fn observe_outcome(&mut self, _outcome: GameOutcome) {}

    fn name(&self) -> &str;
}
