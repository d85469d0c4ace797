//! Repository port for agent persistence.
//!
//! This module defines the trait boundary between the domain and
//! infrastructure layers for storing trained agents.

use std::path::Path;

use crate::{Result, q_learning::SavedAgent};

/// Port for persisting and loading trained agents.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
///
/// use tetrad::{
///     ports::{AgentRepository, Learner},
///     q_learning::{Hyperparameters, QLearningAgent, TrainingMetadata},
/// };
///
/// fn checkpoint<R: AgentRepository>(repo: &R, agent: &QLearningAgent) -> tetrad::Result<()> {
///     repo.save(&agent.to_saved(TrainingMetadata::default()), Path::new("q_agent.msgpack"))
/// }
///
/// # let agent = QLearningAgent::new(Hyperparameters::default());
/// # checkpoint(&tetrad::adapters::MsgPackRepository::new(), &agent)?;
/// # Ok::<(), tetrad::Error>(())
/// ```
pub trait AgentRepository {
    /// Save an agent, replacing whatever was stored at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The path cannot be created or written to
    /// - Serialization fails
    fn save(&self, agent: &SavedAgent, path: &Path) -> Result<()>;

    /// Load an agent.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Nothing is stored at `path` ([`crate::Error::AgentFileMissing`])
    /// - The stored data cannot be decoded
    fn load(&self, path: &Path) -> Result<SavedAgent>;

    /// Whether an agent is stored at `path`.
    fn exists(&self, path: &Path) -> bool;
}
