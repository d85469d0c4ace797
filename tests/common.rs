//! Shared helpers for the integration test suite.

#![allow(dead_code)]

use std::collections::VecDeque;

use rand::RngCore;
use tetrad::{
    Action, Board, GameOutcome, Result, StateKey,
    ports::Opponent,
};

/// Parse a board written one row per whitespace-separated group.
pub fn board(cells: &str) -> Board {
    Board::from_string(cells).unwrap()
}

pub fn key(cells: &str) -> StateKey {
    board(cells).state_key()
}

pub fn action(row: usize, col: usize) -> Action {
    Action::new(row, col).unwrap()
}

/// Opponent replaying a fixed list of moves and remembering the outcomes it
/// was told about.
pub struct ScriptedOpponent {
    moves: VecDeque<Action>,
    pub outcomes: Vec<GameOutcome>,
}

impl ScriptedOpponent {
    pub fn new(moves: &[(usize, usize)]) -> Self {
        Self {
            moves: moves.iter().map(|&(row, col)| action(row, col)).collect(),
            outcomes: Vec::new(),
        }
    }
}

impl Opponent for ScriptedOpponent {
    fn select_move(&mut self, board: &Board, _rng: &mut dyn RngCore) -> Result<Action> {
        // Fall back to the first open cell once the script runs out
        match self.moves.pop_front() {
            Some(action) => Ok(action),
            None => board
                .legal_actions()
                .first()
                .copied()
                .ok_or(tetrad::Error::NoLegalActions),
        }
    }

    fn observe_outcome(&mut self, outcome: GameOutcome) {
        self.outcomes.push(outcome);
    }

    fn name(&self) -> &str {
        "Scripted"
    }
}
