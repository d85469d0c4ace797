//! Episode runner - one full game between the agent and an opponent
//!
//! The runner alternates plies, checks for terminal positions after every
//! move and drives the agent's temporal difference updates:
//!
//! - every non-terminal round (agent move, opponent reply) ends with a
//!   reward-0 update bootstrapped from the freshly observed state and the
//!   action the agent selects for it
//! - the last update of the episode always takes the terminal form, with
//!   reward +1 (agent win), -1 (player win) or 0 (draw)

use std::fmt;

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::{
    Result,
    ports::{Learner, Opponent},
    tictactoe::{Board, GameOutcome, Mark},
    types::Action,
};

/// Who places the first mark of an episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FirstMover {
    Agent,
    Opponent,
}

impl FirstMover {
    /// Fair coin flip between the two sides.
    pub fn random(rng: &mut dyn RngCore) -> Self {
        if rng.random_bool(0.5) {
            FirstMover::Opponent
        } else {
            FirstMover::Agent
        }
    }
}

impl fmt::Display for FirstMover {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FirstMover::Agent => write!(f, "agent"),
            FirstMover::Opponent => write!(f, "opponent"),
        }
    }
}

/// Lifecycle of a single episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpisodeState {
    NotStarted,
    InProgress,
    AgentWin,
    PlayerWin,
    Draw,
}

impl EpisodeState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            EpisodeState::AgentWin | EpisodeState::PlayerWin | EpisodeState::Draw
        )
    }

    /// Final outcome, or `None` while the episode is still running.
    pub fn outcome(self) -> Option<GameOutcome> {
        match self {
            EpisodeState::AgentWin => Some(GameOutcome::Win(Mark::Agent)),
            EpisodeState::PlayerWin => Some(GameOutcome::Win(Mark::Player)),
            EpisodeState::Draw => Some(GameOutcome::Draw),
            EpisodeState::NotStarted | EpisodeState::InProgress => None,
        }
    }
}

impl From<GameOutcome> for EpisodeState {
    fn from(outcome: GameOutcome) -> Self {
        match outcome {
            GameOutcome::Win(Mark::Agent) => EpisodeState::AgentWin,
            GameOutcome::Win(Mark::Player) => EpisodeState::PlayerWin,
            GameOutcome::Draw => EpisodeState::Draw,
        }
    }
}

/// What happened in a finished episode.
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeSummary {
    pub outcome: GameOutcome,
    /// Marks placed by both sides
    pub plies: usize,
    pub first_mover: FirstMover,
    pub final_board: Board,
    /// Terminal state the runner finished in
    pub final_state: EpisodeState,
}

impl EpisodeSummary {
    /// Reward the agent received on its terminal update.
    pub fn agent_reward(&self) -> f64 {
        self.outcome.reward_for(Mark::Agent)
    }
}

/// Plays exactly one episode on a fresh board.
#[derive(Debug)]
pub struct EpisodeRunner {
    board: Board,
    state: EpisodeState,
    first_mover: FirstMover,
    plies: usize,
}

impl EpisodeRunner {
    pub fn new(first_mover: FirstMover) -> Self {
        Self {
            board: Board::new(),
            state: EpisodeState::NotStarted,
            first_mover,
            plies: 0,
        }
    }

    pub fn state(&self) -> EpisodeState {
        self.state
    }

    /// Play the episode to completion.
    ///
    /// The opponent is notified of the outcome before this returns.
    ///
    /// # Errors
    ///
    /// Propagates an illegal move from the opponent, an I/O failure of an
    /// interactive opponent, or [`crate::Error::NoLegalActions`] if the
    /// board fills without a terminal check firing.
    pub fn run(
        mut self,
        agent: &mut dyn Learner,
        opponent: &mut dyn Opponent,
        rng: &mut dyn RngCore,
    ) -> Result<EpisodeSummary> {
        self.transition(EpisodeState::InProgress);

        if self.first_mover == FirstMover::Opponent {
            let action = opponent.select_move(&self.board, rng)?;
            self.play(action, Mark::Player)?;
        }

        let mut prev_state = self.board.state_key();
        let mut prev_action = agent.select_action(&self.board, rng)?;

        let outcome = loop {
            self.play(prev_action, Mark::Agent)?;
            if self.board.check_win(Mark::Agent) {
                break GameOutcome::Win(Mark::Agent);
            }
            if self.board.check_draw() {
                break GameOutcome::Draw;
            }

            let reply = opponent.select_move(&self.board, rng)?;
            self.play(reply, Mark::Player)?;
            if self.board.check_win(Mark::Player) {
                break GameOutcome::Win(Mark::Player);
            }
            if self.board.check_draw() {
                break GameOutcome::Draw;
            }

            let next_state = self.board.state_key();
            let next_action = agent.select_action(&self.board, rng)?;
            agent.update(&prev_state, prev_action, Some((&next_state, next_action)), 0.0);
            prev_state = next_state;
            prev_action = next_action;
        };
        self.transition(EpisodeState::from(outcome));

        agent.update(&prev_state, prev_action, None, outcome.reward_for(Mark::Agent));
        opponent.observe_outcome(outcome);

        Ok(EpisodeSummary {
            outcome,
            plies: self.plies,
            first_mover: self.first_mover,
            final_board: self.board,
            final_state: self.state,
        })
    }

    fn play(&mut self, action: Action, mark: Mark) -> Result<()> {
        self.board.apply_move(action, mark)?;
        self.plies += 1;
        trace!(ply = self.plies, mark = %mark.symbol(), %action, "move");
        Ok(())
    }

    fn transition(&mut self, next: EpisodeState) {
        trace!(from = ?self.state, to = ?next, "episode state");
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::{
        q_learning::{Hyperparameters, QLearningAgent, SarsaAgent, TdAlgorithm, TdCore},
        teacher::Teacher,
        tictactoe::Cell,
        types::{Action, StateKey},
    };

    fn script(moves: &[(usize, usize)]) -> Vec<Action> {
        moves
            .iter()
            .rev()
            .map(|&(r, c)| Action::new(r, c).unwrap())
            .collect()
    }

    /// Opponent replaying a fixed list of moves.
    struct ScriptedOpponent {
        moves: Vec<Action>,
        seen: Vec<GameOutcome>,
    }

    impl ScriptedOpponent {
        fn new(moves: &[(usize, usize)]) -> Self {
            Self {
                moves: script(moves),
                seen: Vec::new(),
            }
        }
    }

    impl Opponent for ScriptedOpponent {
        fn select_move(&mut self, _board: &Board, _rng: &mut dyn RngCore) -> Result<Action> {
            self.moves.pop().ok_or(crate::Error::NoLegalActions)
        }

        fn observe_outcome(&mut self, outcome: GameOutcome) {
            self.seen.push(outcome);
        }

        fn name(&self) -> &str {
            "Scripted"
        }
    }

    /// Q-learning agent whose moves are fixed in advance.
    struct ScriptedAgent {
        inner: QLearningAgent,
        moves: Vec<Action>,
    }

    impl Learner for ScriptedAgent {
        fn core(&self) -> &TdCore {
            self.inner.core()
        }

        fn core_mut(&mut self) -> &mut TdCore {
            self.inner.core_mut()
        }

        fn update(
            &mut self,
            prev_state: &StateKey,
            prev_action: Action,
            next: Option<(&StateKey, Action)>,
            reward: f64,
        ) {
            self.inner.update(prev_state, prev_action, next, reward);
        }

        fn algorithm(&self) -> TdAlgorithm {
            self.inner.algorithm()
        }

        fn name(&self) -> &str {
            "Scripted"
        }

        fn select_action(&mut self, _board: &Board, _rng: &mut dyn RngCore) -> Result<Action> {
            self.moves.pop().ok_or(crate::Error::NoLegalActions)
        }
    }

    /// Greedy agent that prefers column 0 top to bottom in the game below.
    fn column_zero_agent() -> QLearningAgent {
        let mut agent = QLearningAgent::new(Hyperparameters::new(0.5, 0.9, 0.0));
        let mut board = Board::new();
        let game = [(0, 0), (0, 1), (1, 0), (1, 1), (2, 0), (2, 1), (3, 0)];
        for (i, &(r, c)) in game.iter().enumerate() {
            let action = Action::new(r, c).unwrap();
            if i % 2 == 0 {
                agent
                    .core_mut()
                    .q_table
                    .set(action, board.state_key(), 0.01);
                board.apply_move(action, Mark::Agent).unwrap();
            } else {
                board.apply_move(action, Mark::Player).unwrap();
            }
        }
        agent
    }

    #[test]
    fn test_agent_win_sequence() {
        let mut agent = column_zero_agent();
        let mut opponent = ScriptedOpponent::new(&[(0, 1), (1, 1), (2, 1)]);
        let mut rng = StdRng::seed_from_u64(1);

        let summary = EpisodeRunner::new(FirstMover::Agent)
            .run(&mut agent, &mut opponent, &mut rng)
            .unwrap();

        assert_eq!(summary.outcome, GameOutcome::Win(Mark::Agent));
        assert_eq!(summary.final_state, EpisodeState::AgentWin);
        assert_eq!(summary.plies, 7);
        assert_eq!(summary.agent_reward(), 1.0);
        // Three bootstrapped updates and one terminal update
        assert_eq!(agent.rewards(), &[0.0, 0.0, 0.0, 1.0]);
        assert_eq!(opponent.seen, vec![GameOutcome::Win(Mark::Agent)]);

        let last_state = StateKey::parse("OX--OX--OX------").unwrap();
        let winning = Action::new(3, 0).unwrap();
        let expected = 0.01 + 0.5 * (1.0 - 0.01);
        assert!((agent.value(winning, &last_state) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_player_win_gets_negative_reward() {
        let mut agent = ScriptedAgent {
            inner: QLearningAgent::new(Hyperparameters::default()),
            moves: script(&[(0, 0), (1, 0), (2, 0)]),
        };
        let mut opponent = ScriptedOpponent::new(&[(3, 1), (3, 2), (3, 3), (3, 0)]);
        let mut rng = StdRng::seed_from_u64(2);

        let summary = EpisodeRunner::new(FirstMover::Opponent)
            .run(&mut agent, &mut opponent, &mut rng)
            .unwrap();

        assert_eq!(summary.first_mover, FirstMover::Opponent);
        assert_eq!(summary.outcome, GameOutcome::Win(Mark::Player));
        assert_eq!(summary.final_state, EpisodeState::PlayerWin);
        assert_eq!(summary.plies, 7);
        assert_eq!(agent.rewards(), &[0.0, 0.0, -1.0]);

        let agent_marks = summary
            .final_board
            .cells()
            .iter()
            .filter(|c| **c == Cell::Agent)
            .count();
        assert_eq!(agent_marks, agent.rewards().len());

        let last_state = StateKey::parse("O---O--------XXX").unwrap();
        let last_action = Action::new(2, 0).unwrap();
        assert_eq!(agent.value(last_action, &last_state), -0.5);
    }

    #[test]
    fn test_opponent_illegal_move_is_reported() {
        let mut agent = QLearningAgent::new(Hyperparameters::new(0.5, 0.9, 0.0));
        let mut opponent = ScriptedOpponent::new(&[(0, 0), (0, 0)]);
        let mut rng = StdRng::seed_from_u64(3);

        let result =
            EpisodeRunner::new(FirstMover::Opponent).run(&mut agent, &mut opponent, &mut rng);
        assert!(matches!(result, Err(e) if e.is_illegal_move()));
    }

    #[test]
    fn test_episode_against_teacher_terminates() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut teacher = Teacher::new(0.5);

        for i in 0..50 {
            let mut agent = SarsaAgent::new(Hyperparameters::default());
            let first = if i % 2 == 0 {
                FirstMover::Agent
            } else {
                FirstMover::Opponent
            };
            let summary = EpisodeRunner::new(first)
                .run(&mut agent, &mut teacher, &mut rng)
                .unwrap();

            assert!((7..=16).contains(&summary.plies));
            assert_eq!(summary.final_board.occupied_count(), summary.plies);

            let rewards = agent.rewards();
            assert_eq!(rewards.last().copied(), Some(summary.agent_reward()));
            assert!(rewards[..rewards.len() - 1].iter().all(|r| *r == 0.0));
        }
        assert_eq!(teacher.memory().len(), 50);
    }

    #[test]
    fn test_state_outcomes() {
        assert!(!EpisodeState::NotStarted.is_terminal());
        assert!(!EpisodeState::InProgress.is_terminal());
        assert!(EpisodeState::AgentWin.is_terminal());
        assert_eq!(EpisodeState::InProgress.outcome(), None);
        assert_eq!(EpisodeState::Draw.outcome(), Some(GameOutcome::Draw));
        assert_eq!(
            EpisodeState::PlayerWin.outcome(),
            Some(GameOutcome::Win(Mark::Player))
        );
        assert_eq!(
            EpisodeRunner::new(FirstMover::Agent).state(),
            EpisodeState::NotStarted
        );
    }
}
