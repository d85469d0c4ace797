//! Heuristic teacher opponent
//!
//! The teacher plays the `X` mark against the learning agent. Each move is
//! drawn from a fixed priority of one-ply tactical rules (win, block,
//! row setup, block row setup), gated by an ability level that decides how
//! often the rules are consulted at all instead of a uniformly random move.

use std::collections::VecDeque;

use rand::{Rng, RngCore, seq::IndexedRandom};
use tracing::trace;

use crate::{
    error::{Error, Result},
    ports::Opponent,
    tictactoe::{Board, GameOutcome, LineAnalyzer, Mark},
    types::Action,
};

/// Maximum number of outcomes kept in the teacher's memory.
pub const OUTCOME_MEMORY: usize = 100;

/// The rule that produced a teacher move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeacherRule {
    /// Complete four-in-a-line for the teacher.
    Win,
    /// Occupy the cell that would complete the opponent's line.
    Block,
    /// Play into a row holding two teacher marks and two empty cells.
    Fork,
    /// Play into a row holding two opponent marks and two empty cells.
    BlockFork,
    /// Uniformly random legal cell.
    Random,
}

/// Rule-based opponent with a fixed ability level.
#[derive(Debug, Clone)]
pub struct Teacher {
    ability_level: f64,
    mark: Mark,
    memory: VecDeque<GameOutcome>,
}

impl Teacher {
    /// Create a teacher playing [`Mark::Player`].
    ///
    /// `ability_level` is the probability of consulting the tactical rules
    /// on a given move; the remaining probability mass goes to a uniformly
    /// random legal move.
    pub fn new(ability_level: f64) -> Self {
        Self {
            ability_level,
            mark: Mark::Player,
            memory: VecDeque::with_capacity(OUTCOME_MEMORY),
        }
    }

    pub fn ability_level(&self) -> f64 {
        self.ability_level
    }

    pub fn mark(&self) -> Mark {
        self.mark
    }

    /// Most recent game outcomes, oldest first.
    ///
    /// Recorded for inspection only; nothing reads it back to adjust the
    /// ability level.
    pub fn memory(&self) -> &VecDeque<GameOutcome> {
        &self.memory
    }

    /// Remember a finished game, forgetting the oldest beyond [`OUTCOME_MEMORY`].
    pub fn record_outcome(&mut self, outcome: GameOutcome) {
        self.memory.push_back(outcome);
        while self.memory.len() > OUTCOME_MEMORY {
            self.memory.pop_front();
        }
    }

    /// Choose a move for `board`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoLegalActions`] if the board is full.
    pub fn make_move(&self, board: &Board, rng: &mut dyn RngCore) -> Result<Action> {
        self.decide(board, rng).map(|(action, _)| action)
    }

    /// Choose a move and report which rule produced it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoLegalActions`] if the board is full.
    pub fn decide(&self, board: &Board, rng: &mut dyn RngCore) -> Result<(Action, TeacherRule)> {
        let legal = board.legal_actions();
        if legal.is_empty() {
            return Err(Error::NoLegalActions);
        }

        // u >= 1.0 never holds, and u >= 0.0 always does
        let use_rules = rng.random::<f64>() < self.ability_level;
        let decision = if use_rules {
            self.tactical_move(board)
        } else {
            None
        };

        let decision = match decision {
            Some(found) => found,
            None => {
                let action = *legal.choose(rng).ok_or(Error::NoLegalActions)?;
                (action, TeacherRule::Random)
            }
        };

        trace!(rule = ?decision.1, action = %decision.0, "teacher move");
        Ok(decision)
    }

    /// Rules 2-5 of the cascade, without the random fallback.
    fn tactical_move(&self, board: &Board) -> Option<(Action, TeacherRule)> {
        let cells = board.cells();
        let own = self.mark;
        let opponent = own.opponent();

        let found = LineAnalyzer::completing_move(cells, own)
            .map(|idx| (idx, TeacherRule::Win))
            .or_else(|| {
                LineAnalyzer::completing_move(cells, opponent).map(|idx| (idx, TeacherRule::Block))
            })
            .or_else(|| LineAnalyzer::row_setup_move(cells, own).map(|idx| (idx, TeacherRule::Fork)))
            .or_else(|| {
                LineAnalyzer::row_setup_move(cells, opponent)
                    .map(|idx| (idx, TeacherRule::BlockFork))
            })?;

        Action::from_index(found.0).ok().map(|action| (action, found.1))
    }
}

impl Default for Teacher {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl Opponent for Teacher {
    fn select_move(&mut self, board: &Board, rng: &mut dyn RngCore) -> Result<Action> {
        self.make_move(board, rng)
    }

    fn observe_outcome(&mut self, outcome: GameOutcome) {
        self.record_outcome(outcome);
    }

    fn name(&self) -> &str {
        "Teacher"
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    fn action(row: usize, col: usize) -> Action {
        Action::new(row, col).unwrap()
    }

    #[test]
    fn test_expert_takes_win() {
        let teacher = Teacher::new(1.0);
        let board = Board::from_string("XX-X OO-- O--- ----").unwrap();
        let mut rng = StdRng::seed_from_u64(0);

        for _ in 0..50 {
            let (chosen, rule) = teacher.decide(&board, &mut rng).unwrap();
            assert_eq!(chosen, action(0, 2));
            assert_eq!(rule, TeacherRule::Win);
        }
    }

    #[test]
    fn test_expert_prefers_win_over_block() {
        let teacher = Teacher::new(1.0);
        // Agent threatens row 0, teacher can finish row 2
        let board = Board::from_string("OOO- ---- XXX- ----").unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(teacher.make_move(&board, &mut rng).unwrap(), action(2, 3));
    }

    #[test]
    fn test_expert_blocks() {
        let teacher = Teacher::new(1.0);
        let board = Board::from_string("O--- -O-- --O- X-X-").unwrap();
        let mut rng = StdRng::seed_from_u64(2);
        let (chosen, rule) = teacher.decide(&board, &mut rng).unwrap();
        assert_eq!(chosen, action(3, 3));
        assert_eq!(rule, TeacherRule::Block);
    }

    #[test]
    fn test_expert_builds_row_setup() {
        let teacher = Teacher::new(1.0);
        let board = Board::from_string("O--- -X-X ---- ----").unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let (chosen, rule) = teacher.decide(&board, &mut rng).unwrap();
        assert_eq!(chosen, action(1, 0));
        assert_eq!(rule, TeacherRule::Fork);
    }

    #[test]
    fn test_expert_blocks_row_setup() {
        let teacher = Teacher::new(1.0);
        let board = Board::from_string("X--- ---- O--O ----").unwrap();
        let mut rng = StdRng::seed_from_u64(4);
        let (chosen, rule) = teacher.decide(&board, &mut rng).unwrap();
        assert_eq!(chosen, action(2, 1));
        assert_eq!(rule, TeacherRule::BlockFork);
    }

    #[test]
    fn test_setup_rules_ignore_columns() {
        let teacher = Teacher::new(1.0);
        // Two X in column 0 only; no row pattern applies, so the move is random
        let board = Board::from_string("X--- X--- ---- ----").unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let (_, rule) = teacher.decide(&board, &mut rng).unwrap();
        assert_eq!(rule, TeacherRule::Random);
    }

    #[test]
    fn test_zero_ability_is_uniform() {
        let teacher = Teacher::new(0.0);
        let board = Board::from_string("XX-X ---- ---- ----").unwrap();
        let mut rng = StdRng::seed_from_u64(6);

        let trials = 13_000;
        let mut counts: HashMap<Action, usize> = HashMap::new();
        for _ in 0..trials {
            let (chosen, rule) = teacher.decide(&board, &mut rng).unwrap();
            assert_eq!(rule, TeacherRule::Random);
            *counts.entry(chosen).or_default() += 1;
        }

        let legal = board.legal_actions();
        assert_eq!(counts.len(), legal.len());
        let expected = trials as f64 / legal.len() as f64;
        for count in counts.values() {
            assert!((*count as f64 - expected).abs() < expected * 0.15);
        }
    }

    #[test]
    fn test_full_board_is_an_error() {
        let teacher = Teacher::new(1.0);
        let board = Board::from_string("XXOO OOXX XXOO OOXX").unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        assert!(matches!(
            teacher.make_move(&board, &mut rng),
            Err(Error::NoLegalActions)
        ));
    }

    #[test]
    fn test_memory_is_bounded() {
        let mut teacher = Teacher::new(0.5);
        for i in 0..150 {
            let outcome = if i < 50 {
                GameOutcome::Draw
            } else {
                GameOutcome::Win(Mark::Agent)
            };
            teacher.record_outcome(outcome);
        }
        assert_eq!(teacher.memory().len(), OUTCOME_MEMORY);
        assert!(
            teacher
                .memory()
                .iter()
                .all(|&o| o == GameOutcome::Win(Mark::Agent))
        );
        assert_eq!(teacher.ability_level(), 0.5);
    }
}
