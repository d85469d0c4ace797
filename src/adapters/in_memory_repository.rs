//! In-memory agent repository for testing.
//!
//! This adapter provides a pure in-memory implementation of AgentRepository,
//! enabling fast tests without any file system I/O.

use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, Mutex, MutexGuard},
};

use crate::{Result, error::Error, ports::AgentRepository, q_learning::SavedAgent};

/// In-memory repository for testing.
///
/// Stores encoded agents in a shared HashMap keyed by path. Clones share the
/// same storage, so a test can keep a handle while the application owns
/// another.
///
/// # Examples
///
/// ```
/// use std::path::Path;
///
/// use tetrad::{
///     adapters::InMemoryRepository,
///     ports::{AgentRepository, Learner},
///     q_learning::{Hyperparameters, QLearningAgent, TrainingMetadata},
/// };
///
/// let repo = InMemoryRepository::new();
/// let agent = QLearningAgent::new(Hyperparameters::default());
///
/// repo.save(&agent.to_saved(TrainingMetadata::default()), Path::new("q_agent"))?;
/// let loaded = repo.load(Path::new("q_agent"))?;
/// assert_eq!(loaded.values.len(), 0);
/// # Ok::<(), tetrad::Error>(())
/// ```
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    storage: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl InMemoryRepository {
    /// Create a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of agents currently stored.
    pub fn count(&self) -> usize {
        self.lock().len()
    }

    /// Clear all stored agents.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Vec<u8>>> {
        // A poisoned map still holds complete entries; each insert is atomic
        self.storage
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn key(path: &Path) -> String {
        path.to_string_lossy().to_string()
    }
}

impl AgentRepository for InMemoryRepository {
    fn save(&self, agent: &SavedAgent, path: &Path) -> Result<()> {
        let bytes = rmp_serde::to_vec_named(agent).map_err(|e| Error::SerializationContext {
            operation: "serialize agent for in-memory storage".to_string(),
            message: e.to_string(),
        })?;

        self.lock().insert(Self::key(path), bytes);
        Ok(())
    }

    fn load(&self, path: &Path) -> Result<SavedAgent> {
        let storage = self.lock();
        let bytes = storage
            .get(&Self::key(path))
            .ok_or_else(|| Error::AgentFileMissing {
                path: path.to_path_buf(),
            })?;

        rmp_serde::from_slice(bytes).map_err(|e| Error::SerializationContext {
            operation: "deserialize agent from in-memory storage".to_string(),
            message: e.to_string(),
        })
    }

    fn exists(&self, path: &Path) -> bool {
        self.lock().contains_key(&Self::key(path))
    }
}
