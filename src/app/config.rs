//! Run configuration.

use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::{
    Error, Result, pipeline::TrainingConfig, q_learning::Hyperparameters,
    q_learning::TdAlgorithm,
};

/// Learning algorithm selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
pub enum AgentType {
    /// Q-learning (off-policy)
    #[value(name = "q")]
    Q,
    /// SARSA (on-policy)
    #[value(name = "sarsa", alias = "s")]
    Sarsa,
}

impl AgentType {
    pub fn algorithm(self) -> TdAlgorithm {
        match self {
            AgentType::Q => TdAlgorithm::QLearning,
            AgentType::Sarsa => TdAlgorithm::Sarsa,
        }
    }
}

/// What a run does once the agent is ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Train against the teacher for a number of episodes
    Train { episodes: usize },
    /// Interactive games against a human
    Play,
}

/// Validated configuration for one invocation.
///
/// # Examples
///
/// ```
/// use tetrad::app::{AgentType, RunConfig, RunMode};
///
/// let config = RunConfig::new(AgentType::Sarsa).with_teacher_episodes(5000);
/// assert_eq!(config.resolved_path().to_str(), Some("sarsa_agent.msgpack"));
/// assert_eq!(config.mode()?, RunMode::Train { episodes: 5000 });
/// # Ok::<(), tetrad::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub agent_type: AgentType,
    /// Agent file; defaults by agent type when absent
    pub path: Option<PathBuf>,
    /// Resume from the agent file instead of starting fresh
    pub load: bool,
    /// Train against the teacher for this many episodes; play when absent
    pub teacher_episodes: Option<i64>,
    /// Initial hyperparameters for a fresh agent
    pub hyperparameters: Hyperparameters,
    /// Teacher ability level in [0, 1]
    pub ability_level: f64,
    pub checkpoint_interval: usize,
    pub seed: Option<u64>,
}

impl RunConfig {
    pub fn new(agent_type: AgentType) -> Self {
        Self {
            agent_type,
            path: None,
            load: false,
            teacher_episodes: None,
            hyperparameters: Hyperparameters::default(),
            ability_level: 0.5,
            checkpoint_interval: 1000,
            seed: None,
        }
    }

    pub fn with_teacher_episodes(mut self, episodes: i64) -> Self {
        self.teacher_episodes = Some(episodes);
        self
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check the options that are not already constrained by their types.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if the teacher episode count
    /// is not positive, the checkpoint interval is zero, or the ability
    /// level lies outside [0, 1].
    pub fn validate(&self) -> Result<()> {
        if let Some(episodes) = self.teacher_episodes
            && episodes <= 0
        {
            return Err(Error::InvalidConfiguration {
                message: "number of teacher episodes must be a positive integer".to_string(),
            });
        }
        if self.checkpoint_interval == 0 {
            return Err(Error::InvalidConfiguration {
                message: "checkpoint interval must be a positive integer".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.ability_level) {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "ability level must be between 0 and 1, got {}",
                    self.ability_level
                ),
            });
        }
        Ok(())
    }

    /// Agent file location, falling back to the per-algorithm default.
    pub fn resolved_path(&self) -> PathBuf {
        self.path
            .clone()
            .unwrap_or_else(|| PathBuf::from(self.agent_type.algorithm().default_file_name()))
    }

    /// # Errors
    ///
    /// Returns the [`RunConfig::validate`] error for an invalid config.
    pub fn mode(&self) -> Result<RunMode> {
        self.validate()?;
        Ok(match self.teacher_episodes {
            Some(episodes) => RunMode::Train {
                episodes: usize::try_from(episodes).map_err(|_| Error::InvalidConfiguration {
                    message: format!("teacher episode count {episodes} is too large"),
                })?,
            },
            None => RunMode::Play,
        })
    }

    /// Training loop settings for `episodes` episodes.
    pub fn training_config(&self, episodes: usize) -> TrainingConfig {
        TrainingConfig {
            episodes,
            checkpoint_interval: self.checkpoint_interval,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths() {
        assert_eq!(
            RunConfig::new(AgentType::Q).resolved_path(),
            PathBuf::from("q_agent.msgpack")
        );
        assert_eq!(
            RunConfig::new(AgentType::Sarsa).resolved_path(),
            PathBuf::from("sarsa_agent.msgpack")
        );
        assert_eq!(
            RunConfig::new(AgentType::Q)
                .with_path("custom.bin")
                .resolved_path(),
            PathBuf::from("custom.bin")
        );
    }

    #[test]
    fn test_non_positive_episodes_rejected() {
        for episodes in [0, -1, -1000] {
            let config = RunConfig::new(AgentType::Q).with_teacher_episodes(episodes);
            assert!(matches!(
                config.validate(),
                Err(Error::InvalidConfiguration { .. })
            ));
            assert!(config.mode().is_err());
        }
    }

    #[test]
    fn test_mode_selection() {
        assert_eq!(RunConfig::new(AgentType::Q).mode().unwrap(), RunMode::Play);
        assert_eq!(
            RunConfig::new(AgentType::Q)
                .with_teacher_episodes(1)
                .mode()
                .unwrap(),
            RunMode::Train { episodes: 1 }
        );
    }

    #[test]
    fn test_ability_and_interval_bounds() {
        let mut config = RunConfig::new(AgentType::Q);
        config.ability_level = 1.5;
        assert!(config.validate().is_err());

        let mut config = RunConfig::new(AgentType::Q);
        config.checkpoint_interval = 0;
        assert!(config.validate().is_err());

        let mut config = RunConfig::new(AgentType::Q);
        config.ability_level = 0.0;
        assert!(config.validate().is_ok());
    }
}
