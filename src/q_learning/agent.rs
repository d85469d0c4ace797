//! Q-learning and SARSA agents
//!
//! Both agents share ε-greedy action selection, the value table and the
//! reward history through [`TdCore`]; they differ only in how the
//! non-terminal update bootstraps off the successor state.

use rand::{Rng, RngCore, seq::IndexedRandom};
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    ports::Learner,
    q_learning::{q_table::QTable, serialization::TdAlgorithm},
    tictactoe::Board,
    types::{Action, StateKey},
};

/// Scalar learning parameters.
///
/// `alpha` and `gamma` are expected in [0, 1] but are not validated here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hyperparameters {
    /// Learning rate α
    pub alpha: f64,
    /// Discount factor γ
    pub gamma: f64,
    /// Current exploration rate ε (decays on every action selection)
    pub epsilon: f64,
    /// Geometric decay applied to ε after each selection: ε ← ε(1 - decay)
    pub eps_decay: f64,
}

impl Hyperparameters {
    pub fn new(alpha: f64, gamma: f64, epsilon: f64) -> Self {
        Self {
            alpha,
            gamma,
            epsilon,
            eps_decay: 0.0,
        }
    }

    pub fn with_eps_decay(mut self, eps_decay: f64) -> Self {
        self.eps_decay = eps_decay;
        self
    }
}

impl Default for Hyperparameters {
    fn default() -> Self {
        Self::new(0.5, 0.9, 0.1)
    }
}

/// State shared by every temporal difference agent.
#[derive(Debug, Clone, PartialEq)]
pub struct TdCore {
    pub(crate) q_table: QTable,
    pub(crate) params: Hyperparameters,
    pub(crate) rewards: Vec<f64>,
}

impl TdCore {
    pub fn new(params: Hyperparameters) -> Self {
        Self {
            q_table: QTable::new(),
            params,
            rewards: Vec::new(),
        }
    }

    pub(crate) fn from_parts(q_table: QTable, params: Hyperparameters, rewards: Vec<f64>) -> Self {
        Self {
            q_table,
            params,
            rewards,
        }
    }

    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    /// Direct access to the value table, for seeding known positions.
    pub fn q_table_mut(&mut self) -> &mut QTable {
        &mut self.q_table
    }

    pub fn params(&self) -> &Hyperparameters {
        &self.params
    }

    pub fn rewards(&self) -> &[f64] {
        &self.rewards
    }

    /// ε-greedy action selection over the empty cells of `board`.
    ///
    /// With probability ε a uniformly random legal action is returned;
    /// otherwise one of the actions tied for the highest value, chosen
    /// uniformly among the ties. ε decays after every call, whichever branch
    /// was taken.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoLegalActions`] if the board is full.
    pub fn select_action(&mut self, board: &Board, rng: &mut dyn RngCore) -> Result<Action> {
        let legal = board.legal_actions();
        if legal.is_empty() {
            return Err(Error::NoLegalActions);
        }

        let action = if rng.random::<f64>() < self.params.epsilon {
            // Explore
            legal.choose(rng).copied()
        } else {
            // Exploit, breaking ties at random
            let state = board.state_key();
            self.q_table.best_actions(&state, &legal).choose(rng).copied()
        }
        .ok_or(Error::NoLegalActions)?;

        self.params.epsilon *= 1.0 - self.params.eps_decay;
        Ok(action)
    }

    /// Apply Q(s,a) ← Q(s,a) + α[target - Q(s,a)] and record the reward.
    pub(crate) fn apply_update(
        &mut self,
        prev_state: &StateKey,
        prev_action: Action,
        target: f64,
        reward: f64,
    ) {
        self.q_table
            .step_toward(prev_action, prev_state, target, self.params.alpha);
        self.rewards.push(reward);
    }
}

/// Q-learning agent (off-policy TD control)
///
/// Bootstraps off the maximum value over all actions legal in the successor
/// state, regardless of the action actually taken next.
#[derive(Debug, Clone, PartialEq)]
pub struct QLearningAgent {
    core: TdCore,
}

impl QLearningAgent {
    /// Create a new Q-learning agent with an empty value table
    pub fn new(params: Hyperparameters) -> Self {
        Self {
            core: TdCore::new(params),
        }
    }

    pub(crate) fn from_core(core: TdCore) -> Self {
        Self { core }
    }
}

impl Learner for QLearningAgent {
    fn core(&self) -> &TdCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut TdCore {
        &mut self.core
    }

    fn update(
        &mut self,
        prev_state: &StateKey,
        prev_action: Action,
        next: Option<(&StateKey, Action)>,
        reward: f64,
    ) {
        let target = match next {
            Some((next_state, _)) => {
                let next_legal = next_state.legal_actions();
                reward + self.core.params.gamma * self.core.q_table.max_value(next_state, &next_legal)
            }
            None => reward,
        };
        self.core.apply_update(prev_state, prev_action, target, reward);
    }

    fn algorithm(&self) -> TdAlgorithm {
        TdAlgorithm::QLearning
    }

    fn name(&self) -> &str {
        "Q-Learning"
    }
}

/// SARSA agent (on-policy TD control)
///
/// Bootstraps off the value of the action actually selected for the
/// successor state, exploration included.
#[derive(Debug, Clone, PartialEq)]
pub struct SarsaAgent {
    core: TdCore,
}

impl SarsaAgent {
    /// Create a new SARSA agent with an empty value table
    pub fn new(params: Hyperparameters) -> Self {
        Self {
            core: TdCore::new(params),
        }
    }

    pub(crate) fn from_core(core: TdCore) -> Self {
        Self { core }
    }
}

impl Learner for SarsaAgent {
    fn core(&self) -> &TdCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut TdCore {
        &mut self.core
    }

    fn update(
        &mut self,
        prev_state: &StateKey,
        prev_action: Action,
        next: Option<(&StateKey, Action)>,
        reward: f64,
    ) {
        let target = match next {
            Some((next_state, next_action)) => {
                reward + self.core.params.gamma * self.core.q_table.get(next_action, next_state)
            }
            None => reward,
        };
        self.core.apply_update(prev_state, prev_action, target, reward);
    }

    fn algorithm(&self) -> TdAlgorithm {
        TdAlgorithm::Sarsa
    }

    fn name(&self) -> &str {
        "SARSA"
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::tictactoe::Mark;

    fn action(row: usize, col: usize) -> Action {
        Action::new(row, col).unwrap()
    }

    /// Next state with exactly three open cells: (0,0), (0,1), (0,2).
    fn three_open_state() -> StateKey {
        StateKey::parse("---XOXOXOXOXOXOX").unwrap()
    }

    fn seeded_next_values(core: &mut TdCore, next: &StateKey) {
        core.q_table.set(action(0, 0), next.clone(), 0.2);
        core.q_table.set(action(0, 1), next.clone(), 0.5);
        core.q_table.set(action(0, 2), next.clone(), 0.1);
    }

    #[test]
    fn test_q_learning_bootstraps_off_max() {
        let mut agent = QLearningAgent::new(Hyperparameters::new(0.5, 0.9, 0.0));
        let prev = StateKey::parse("----------------").unwrap();
        let next = three_open_state();
        seeded_next_values(agent.core_mut(), &next);

        agent.update(&prev, action(3, 3), Some((&next, action(0, 2))), 0.0);

        let updated = agent.value(action(3, 3), &prev);
        assert!((updated - 0.225).abs() < 1e-12);
    }

    #[test]
    fn test_sarsa_bootstraps_off_next_action() {
        let mut agent = SarsaAgent::new(Hyperparameters::new(0.5, 0.9, 0.0));
        let prev = StateKey::parse("----------------").unwrap();
        let next = three_open_state();
        seeded_next_values(agent.core_mut(), &next);

        agent.update(&prev, action(3, 3), Some((&next, action(0, 2))), 0.0);

        let updated = agent.value(action(3, 3), &prev);
        assert!((updated - 0.045).abs() < 1e-12);
    }

    #[test]
    fn test_terminal_update_ignores_gamma() {
        for gamma in [0.0, 0.5, 0.99] {
            let mut q_agent = QLearningAgent::new(Hyperparameters::new(0.5, gamma, 0.0));
            let mut sarsa = SarsaAgent::new(Hyperparameters::new(0.5, gamma, 0.0));
            let prev = StateKey::parse("X---------------").unwrap();

            q_agent.core_mut().q_table.set(action(1, 1), prev.clone(), 0.2);
            sarsa.core_mut().q_table.set(action(1, 1), prev.clone(), 0.2);

            q_agent.update(&prev, action(1, 1), None, 1.0);
            sarsa.update(&prev, action(1, 1), None, 1.0);

            assert!((q_agent.value(action(1, 1), &prev) - 0.6).abs() < 1e-12);
            assert!((sarsa.value(action(1, 1), &prev) - 0.6).abs() < 1e-12);
        }
    }

    #[test]
    fn test_every_update_records_reward() {
        let mut agent = SarsaAgent::new(Hyperparameters::default());
        let prev = StateKey::parse("----------------").unwrap();
        let next = three_open_state();

        agent.update(&prev, action(0, 0), Some((&next, action(0, 1))), 0.0);
        agent.update(&next, action(0, 1), None, -1.0);

        assert_eq!(agent.rewards(), &[0.0, -1.0]);
    }

    #[test]
    fn test_select_action_fails_on_full_board() {
        let mut agent = QLearningAgent::new(Hyperparameters::default());
        let board = Board::from_string("XXOO OOXX XXOO OOXX").unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            agent.select_action(&board, &mut rng),
            Err(Error::NoLegalActions)
        ));
    }

    #[test]
    fn test_select_action_only_returns_legal_moves() {
        let mut agent = QLearningAgent::new(Hyperparameters::new(0.5, 0.9, 0.5));
        let mut board = Board::new();
        board.apply_move(action(0, 0), Mark::Player).unwrap();
        board.apply_move(action(1, 1), Mark::Agent).unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..200 {
            let chosen = agent.select_action(&board, &mut rng).unwrap();
            assert!(board.is_empty(chosen));
        }
    }

    #[test]
    fn test_greedy_picks_unique_best() {
        let mut agent = SarsaAgent::new(Hyperparameters::new(0.5, 0.9, 0.0));
        let board = Board::new();
        agent
            .core_mut()
            .q_table
            .set(action(2, 1), board.state_key(), 0.4);
        let mut rng = StdRng::seed_from_u64(3);

        for _ in 0..20 {
            assert_eq!(agent.select_action(&board, &mut rng).unwrap(), action(2, 1));
        }
    }

    #[test]
    fn test_greedy_ties_are_broken_randomly() {
        let mut agent = QLearningAgent::new(Hyperparameters::new(0.5, 0.9, 0.0));
        let board = Board::new();
        let state = board.state_key();
        agent.core_mut().q_table.set(action(0, 3), state.clone(), 0.9);
        agent.core_mut().q_table.set(action(3, 0), state, 0.9);
        let mut rng = StdRng::seed_from_u64(11);

        let mut seen = std::collections::HashSet::new();
        for _ in 0..100 {
            seen.insert(agent.select_action(&board, &mut rng).unwrap());
        }
        assert_eq!(
            seen,
            [action(0, 3), action(3, 0)].into_iter().collect()
        );
    }

    #[test]
    fn test_epsilon_decays_geometrically() {
        let params = Hyperparameters::new(0.5, 0.9, 0.8).with_eps_decay(0.01);
        let mut agent = QLearningAgent::new(params);
        let board = Board::new();
        let mut rng = StdRng::seed_from_u64(5);

        let n = 50;
        for _ in 0..n {
            agent.select_action(&board, &mut rng).unwrap();
        }

        let expected = 0.8 * (1.0f64 - 0.01).powi(n);
        assert!((agent.epsilon() - expected).abs() < 1e-12);
    }
}
