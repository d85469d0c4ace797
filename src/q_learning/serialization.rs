//! Persisted schema for temporal difference agents.
//!
//! The value table is stored as an explicit list of (action, state, value)
//! entries next to a hyperparameter record and the reward history, so the
//! on-disk format does not depend on the in-memory map layout.

use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    ports::Learner,
    q_learning::{
        agent::{Hyperparameters, QLearningAgent, SarsaAgent, TdCore},
        q_table::{QTable, ValueEntry},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TdAlgorithm {
    QLearning,
    Sarsa,
}

impl TdAlgorithm {
    /// Default file name used when no explicit path is configured.
    pub fn default_file_name(self) -> &'static str {
        match self {
            TdAlgorithm::QLearning => "q_agent.msgpack",
            TdAlgorithm::Sarsa => "sarsa_agent.msgpack",
        }
    }
}

/// Bookkeeping stored alongside the learned state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetadata {
    /// Games played against the teacher across all runs
    pub teacher_episodes: usize,
    /// Games played against a human across all runs
    pub human_games: usize,
    /// Teacher ability level used in the most recent training run
    pub ability_level: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedAgent {
    pub version: u32,
    pub algorithm: TdAlgorithm,
    pub hyperparameters: Hyperparameters,
    pub values: Vec<ValueEntry>,
    pub rewards: Vec<f64>,
    pub metadata: TrainingMetadata,
}

/// A restored agent of either variant.
#[derive(Debug, Clone)]
pub enum TdLearner {
    QLearning(QLearningAgent),
    Sarsa(SarsaAgent),
}

impl TdLearner {
    pub fn new(algorithm: TdAlgorithm, params: Hyperparameters) -> Self {
        match algorithm {
            TdAlgorithm::QLearning => TdLearner::QLearning(QLearningAgent::new(params)),
            TdAlgorithm::Sarsa => TdLearner::Sarsa(SarsaAgent::new(params)),
        }
    }

    pub fn into_box(self) -> Box<dyn Learner> {
        match self {
            TdLearner::QLearning(agent) => Box::new(agent),
            TdLearner::Sarsa(agent) => Box::new(agent),
        }
    }
}

impl SavedAgent {
    pub const VERSION: u32 = 1;

    pub(crate) fn from_core(
        algorithm: TdAlgorithm,
        core: &TdCore,
        metadata: TrainingMetadata,
    ) -> Self {
        Self {
            version: Self::VERSION,
            algorithm,
            hyperparameters: *core.params(),
            values: core.q_table().entries(),
            rewards: core.rewards().to_vec(),
            metadata,
        }
    }

    /// Rebuild the agent this record was captured from.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedVersion`] if the record was written by an
    /// incompatible format version.
    pub fn to_agent(&self) -> Result<TdLearner> {
        if self.version != Self::VERSION {
            return Err(Error::UnsupportedVersion {
                found: self.version,
                expected: Self::VERSION,
            });
        }

        let core = TdCore::from_parts(
            QTable::from_entries(self.values.iter().cloned()),
            self.hyperparameters,
            self.rewards.clone(),
        );

        Ok(match self.algorithm {
            TdAlgorithm::QLearning => TdLearner::QLearning(QLearningAgent::from_core(core)),
            TdAlgorithm::Sarsa => TdLearner::Sarsa(SarsaAgent::from_core(core)),
        })
    }
}
