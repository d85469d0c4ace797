//! Learner port - the capability every tabular agent provides
//!
//! Action selection, value lookup and persistence are shared by all agents
//! through [`TdCore`]; the only polymorphic point is [`Learner::update`].

use rand::RngCore;

use crate::{
    Result,
    q_learning::{
        agent::{Hyperparameters, TdCore},
        q_table::QTable,
        serialization::{SavedAgent, TdAlgorithm, TrainingMetadata},
    },
    tictactoe::Board,
    types::{Action, StateKey},
};

/// Learner trait - unified interface for Q-learning and SARSA
///
/// # Examples
///
/// ```
/// use rand::{SeedableRng, rngs::StdRng};
/// use tetrad::{
///     ports::Learner,
///     q_learning::{Hyperparameters, QLearningAgent},
///     tictactoe::Board,
/// };
///
/// let mut agent = QLearningAgent::new(Hyperparameters::new(0.5, 0.9, 0.1));
/// let mut rng = StdRng::seed_from_u64(42);
/// let board = Board::new();
///
/// let action = agent.select_action(&board, &mut rng)?;
/// assert!(board.is_empty(action));
/// # Ok::<(), tetrad::Error>(())
/// ```
pub trait Learner: Send {
    /// Shared agent state.
    fn core(&self) -> &TdCore;

    /// Mutable access to the shared agent state.
    fn core_mut(&mut self) -> &mut TdCore;

    /// Update the value of `prev_action` taken in `prev_state`.
    ///
    /// `next` carries the freshly observed successor state and the action
    /// selected for it; `None` marks the terminal update, which has no
    /// bootstrap term:
    ///
    /// Q(s,a) ← Q(s,a) + α[r - Q(s,a)]
    ///
    /// Every call appends `reward` to the reward history.
    fn update(
        &mut self,
        prev_state: &StateKey,
        prev_action: Action,
        next: Option<(&StateKey, Action)>,
        reward: f64,
    );

    /// Which update rule this learner applies.
    fn algorithm(&self) -> TdAlgorithm;

    /// Get the learner's name.
    fn name(&self) -> &str;

    /// ε-greedy action selection.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NoLegalActions`] if the board has no empty cell.
    fn select_action(&mut self, board: &Board, rng: &mut dyn RngCore) -> Result<Action> {
        self.core_mut().select_action(board, rng)
    }

    /// Current estimate for a state-action pair (0.0 when never written).
    fn value(&self, action: Action, state: &StateKey) -> f64 {
        self.core().q_table().get(action, state)
    }

    /// Current exploration rate.
    fn epsilon(&self) -> f64 {
        self.core().params().epsilon
    }

    fn hyperparameters(&self) -> Hyperparameters {
        *self.core().params()
    }

    fn q_table(&self) -> &QTable {
        self.core().q_table()
    }

    /// Every reward passed to [`Learner::update`], in call order.
    fn rewards(&self) -> &[f64] {
        self.core().rewards()
    }

    /// Capture the full learned state in the persisted schema.
    fn to_saved(&self, metadata: TrainingMetadata) -> SavedAgent {
        SavedAgent::from_core(self.algorithm(), self.core(), metadata)
    }
}
