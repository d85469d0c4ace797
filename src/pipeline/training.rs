//! Training pipeline - repeated episodes against an automated opponent

use std::path::{Path, PathBuf};

use rand::RngCore;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::episode::{EpisodeRunner, FirstMover};
use crate::{
    Error, Result,
    ports::{AgentRepository, Learner, Observer, Opponent},
    q_learning::TrainingMetadata,
    tictactoe::{GameOutcome, Mark},
};

/// Training configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Number of training episodes
    pub episodes: usize,

    /// Persist the agent after every this many episodes
    pub checkpoint_interval: usize,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            episodes: 1000,
            checkpoint_interval: 1000,
        }
    }
}

impl TrainingConfig {
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] for zero episodes or a zero
    /// checkpoint interval.
    pub fn validate(&self) -> Result<()> {
        if self.episodes == 0 {
            return Err(Error::InvalidConfiguration {
                message: "number of teacher episodes must be a positive integer".to_string(),
            });
        }
        if self.checkpoint_interval == 0 {
            return Err(Error::InvalidConfiguration {
                message: "checkpoint interval must be a positive integer".to_string(),
            });
        }
        Ok(())
    }
}

/// Result of a training run, counted from the agent's side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingResult {
    /// Total episodes played
    pub total_episodes: usize,

    /// Number of agent wins
    pub wins: usize,

    /// Number of draws
    pub draws: usize,

    /// Number of agent losses
    pub losses: usize,

    /// Win rate
    pub win_rate: f64,

    /// Draw rate
    pub draw_rate: f64,

    /// Loss rate
    pub loss_rate: f64,

    /// Exploration rate after the last episode
    pub final_epsilon: f64,

    /// Number of checkpoints written
    pub checkpoints: usize,
}

impl TrainingResult {
    /// Create a new training result
    pub fn new(wins: usize, draws: usize, losses: usize) -> Self {
        let total_episodes = wins + draws + losses;
        let rate = |count: usize| {
            if total_episodes > 0 {
                count as f64 / total_episodes as f64
            } else {
                0.0
            }
        };

        Self {
            total_episodes,
            wins,
            draws,
            losses,
            win_rate: rate(wins),
            draw_rate: rate(draws),
            loss_rate: rate(losses),
            final_epsilon: 0.0,
            checkpoints: 0,
        }
    }

    /// Save result to JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = std::fs::File::create(path).map_err(|source| Error::Io {
            operation: format!("create summary file {path:?}"),
            source,
        })?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load result from JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| Error::Io {
            operation: format!("open summary file {path:?}"),
            source,
        })?;
        let result = serde_json::from_reader(file)?;
        Ok(result)
    }
}

/// Persists the agent at checkpoints.
pub trait Checkpointer {
    /// Save `agent`, returning where it was written.
    ///
    /// `episodes_completed` counts episodes finished in the current run.
    fn checkpoint(&mut self, agent: &dyn Learner, episodes_completed: usize) -> Result<PathBuf>;
}

/// Checkpointer writing through an [`AgentRepository`].
///
/// Metadata carried over from a loaded agent is extended with the episodes
/// played in this run.
pub struct RepositoryCheckpointer<'a, R: AgentRepository + ?Sized> {
    repository: &'a R,
    path: PathBuf,
    base: TrainingMetadata,
    ability_level: Option<f64>,
}

impl<'a, R: AgentRepository + ?Sized> RepositoryCheckpointer<'a, R> {
    pub fn new(repository: &'a R, path: impl Into<PathBuf>, base: TrainingMetadata) -> Self {
        Self {
            repository,
            path: path.into(),
            base,
            ability_level: None,
        }
    }

    /// Record the teacher's ability level in the saved metadata.
    pub fn with_ability_level(mut self, ability_level: f64) -> Self {
        self.ability_level = Some(ability_level);
        self
    }
}

impl<R: AgentRepository + ?Sized> Checkpointer for RepositoryCheckpointer<'_, R> {
    fn checkpoint(&mut self, agent: &dyn Learner, episodes_completed: usize) -> Result<PathBuf> {
        let metadata = TrainingMetadata {
            teacher_episodes: self.base.teacher_episodes + episodes_completed,
            human_games: self.base.human_games,
            ability_level: self.ability_level.or(self.base.ability_level),
        };
        self.repository
            .save(&agent.to_saved(metadata), &self.path)?;
        Ok(self.path.clone())
    }
}

/// Training pipeline for a single learner against an automated opponent
pub struct TrainingPipeline<'a> {
    config: TrainingConfig,
    observers: Vec<Box<dyn Observer>>,
    checkpointer: Option<Box<dyn Checkpointer + 'a>>,
}

impl<'a> TrainingPipeline<'a> {
    /// Create a new training pipeline
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
            checkpointer: None,
        }
    }

    /// Add an observer to the pipeline
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Persist the agent periodically and once at the end
    pub fn with_checkpointer(mut self, checkpointer: Box<dyn Checkpointer + 'a>) -> Self {
        self.checkpointer = Some(checkpointer);
        self
    }

    /// Run training with the given agent and opponent.
    ///
    /// Every episode starts on a fresh board with the first mover drawn
    /// from `rng`. The agent is checkpointed after every
    /// `checkpoint_interval` completed episodes and after the last one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] for an invalid config, and
    /// propagates episode, observer and checkpoint failures.
    pub fn run(
        &mut self,
        agent: &mut dyn Learner,
        opponent: &mut dyn Opponent,
        rng: &mut dyn RngCore,
    ) -> Result<TrainingResult> {
        self.config.validate()?;

        info!(
            agent = agent.name(),
            opponent = opponent.name(),
            episodes = self.config.episodes,
            "starting training"
        );

        let mut wins = 0;
        let mut draws = 0;
        let mut losses = 0;
        let mut checkpoints = 0;
        let mut last_saved = None;

        for observer in &mut self.observers {
            observer.on_training_start(self.config.episodes)?;
        }

        for episode in 0..self.config.episodes {
            let first_mover = FirstMover::random(rng);
            let summary = EpisodeRunner::new(first_mover).run(agent, opponent, rng)?;

            match summary.outcome {
                GameOutcome::Win(Mark::Agent) => wins += 1,
                GameOutcome::Win(Mark::Player) => losses += 1,
                GameOutcome::Draw => draws += 1,
            }

            debug!(
                episode,
                outcome = %summary.outcome,
                plies = summary.plies,
                first_mover = %summary.first_mover,
                "episode finished"
            );

            for observer in &mut self.observers {
                observer.on_episode_end(episode, &summary)?;
            }

            let completed = episode + 1;
            if completed.is_multiple_of(self.config.checkpoint_interval) {
                checkpoints += self.checkpoint(&*agent, completed)?;
                last_saved = Some(completed);
            }
        }

        if last_saved != Some(self.config.episodes) {
            checkpoints += self.checkpoint(&*agent, self.config.episodes)?;
        }

        for observer in &mut self.observers {
            observer.on_training_end()?;
        }

        let mut result = TrainingResult::new(wins, draws, losses);
        result.final_epsilon = agent.epsilon();
        result.checkpoints = checkpoints;

        info!(
            wins = result.wins,
            draws = result.draws,
            losses = result.losses,
            epsilon = result.final_epsilon,
            "training finished"
        );
        Ok(result)
    }

    /// Returns the number of checkpoints written (0 without a checkpointer).
    fn checkpoint(&mut self, agent: &dyn Learner, completed: usize) -> Result<usize> {
        let Some(checkpointer) = self.checkpointer.as_mut() else {
            return Ok(0);
        };

        let path = checkpointer.checkpoint(agent, completed)?;
        info!(episodes = completed, path = %path.display(), "checkpoint saved");

        for observer in &mut self.observers {
            observer.on_checkpoint(completed, &path)?;
        }
        Ok(1)
    }
}
