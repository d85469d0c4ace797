//! Dependency injection container for the tetrad application.
//!
//! The container owns infrastructure dependencies (the agent repository and
//! the source of randomness) and provides factory methods for creating,
//! loading and saving agents.

use std::{path::Path, sync::Arc};

use rand::{SeedableRng, rngs::StdRng};
use tracing::{info, warn};

use super::config::RunConfig;
use crate::{
    Result,
    adapters::MsgPackRepository,
    ports::{AgentRepository, Learner},
    q_learning::{Hyperparameters, TdAlgorithm, TdLearner, TrainingMetadata},
};

/// An agent together with the bookkeeping it was saved with.
pub struct PreparedAgent {
    pub agent: Box<dyn Learner>,
    pub metadata: TrainingMetadata,
}

/// Application with dependency injection.
///
/// # Examples
///
/// ## Production usage
///
/// ```
/// use tetrad::{
///     app::App,
///     ports::Learner,
///     q_learning::{Hyperparameters, TdAlgorithm},
/// };
///
/// let app = App::new();
/// let agent = app.create_agent(TdAlgorithm::QLearning, Hyperparameters::default());
/// assert_eq!(agent.name(), "Q-Learning");
/// ```
///
/// ## Testing with dependency injection
///
/// ```
/// use tetrad::adapters::InMemoryRepository;
/// use tetrad::app::App;
///
/// let app = App::for_testing()
///     .with_repository(InMemoryRepository::new())
///     .with_default_seed(42)
///     .build();
/// ```
pub struct App {
    /// Repository for agent persistence
    repository: Arc<dyn AgentRepository + Send + Sync>,
    /// Default random seed (None = non-deterministic)
    default_seed: Option<u64>,
}

impl App {
    /// Create a new app with production defaults.
    ///
    /// Uses:
    /// - `MsgPackRepository` for agent persistence
    /// - No default seed (non-deterministic RNG)
    pub fn new() -> Self {
        Self {
            repository: Arc::new(MsgPackRepository::new()),
            default_seed: None,
        }
    }

    /// Create a builder for constructing app with custom dependencies.
    pub fn for_testing() -> AppBuilder {
        AppBuilder::new()
    }

    /// Get the agent repository.
    pub fn repository(&self) -> Arc<dyn AgentRepository + Send + Sync> {
        Arc::clone(&self.repository)
    }

    /// Random source for a run: explicit seed, then the container default,
    /// then OS entropy.
    pub fn rng(&self, seed: Option<u64>) -> StdRng {
        match seed.or(self.default_seed) {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }

    /// Create a fresh agent.
    pub fn create_agent(&self, algorithm: TdAlgorithm, params: Hyperparameters) -> Box<dyn Learner> {
        TdLearner::new(algorithm, params).into_box()
    }

    /// Load an agent from persistent storage.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::AgentFileMissing`] if nothing is stored at
    /// `path`, or a decoding error for a corrupt or incompatible file.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::path::Path;
    ///
    /// use tetrad::app::App;
    ///
    /// let app = App::new();
    /// let prepared = app.load_agent(Path::new("q_agent.msgpack"))?;
    /// println!("{} games against the teacher", prepared.metadata.teacher_episodes);
    /// # Ok::<(), tetrad::Error>(())
    /// ```
    pub fn load_agent(&self, path: &Path) -> Result<PreparedAgent> {
        let saved = self.repository.load(path)?;
        let agent = saved.to_agent()?.into_box();
        info!(
            path = %path.display(),
            agent = agent.name(),
            entries = saved.values.len(),
            "loaded agent"
        );
        Ok(PreparedAgent {
            agent,
            metadata: saved.metadata,
        })
    }

    /// Load or create the agent a run configuration asks for.
    ///
    /// # Errors
    ///
    /// With `load` set, propagates [`App::load_agent`] failures.
    pub fn prepare_agent(&self, config: &RunConfig) -> Result<PreparedAgent> {
        let path = config.resolved_path();
        if config.load {
            let prepared = self.load_agent(&path)?;
            if prepared.agent.algorithm() != config.agent_type.algorithm() {
                warn!(
                    requested = ?config.agent_type,
                    stored = prepared.agent.name(),
                    "agent file holds a different algorithm; using the stored one"
                );
            }
            return Ok(prepared);
        }

        if self.repository.exists(&path) {
            warn!(path = %path.display(), "existing agent file will be overwritten");
        }
        Ok(PreparedAgent {
            agent: self.create_agent(config.agent_type.algorithm(), config.hyperparameters),
            metadata: TrainingMetadata::default(),
        })
    }

    /// Whether an agent is stored at `path`.
    pub fn agent_exists(&self, path: &Path) -> bool {
        self.repository.exists(path)
    }

    /// Save an agent to persistent storage.
    ///
    /// # Errors
    ///
    /// Propagates repository write failures.
    pub fn save_agent(
        &self,
        agent: &dyn Learner,
        metadata: TrainingMetadata,
        path: &Path,
    ) -> Result<()> {
        self.repository.save(&agent.to_saved(metadata), path)
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for constructing app with custom dependencies.
///
/// Primarily used for testing to inject in-memory repositories and control
/// randomness.
pub struct AppBuilder {
    repository: Option<Arc<dyn AgentRepository + Send + Sync>>,
    default_seed: Option<u64>,
}

impl AppBuilder {
    /// Create a new app builder.
    pub fn new() -> Self {
        Self {
            repository: None,
            default_seed: None,
        }
    }

    /// Set a custom agent repository.
    pub fn with_repository<R: AgentRepository + Send + Sync + 'static>(mut self, repo: R) -> Self {
        self.repository = Some(Arc::new(repo));
        self
    }

    /// Seed used whenever a run does not supply its own.
    pub fn with_default_seed(mut self, seed: u64) -> Self {
        self.default_seed = Some(seed);
        self
    }

    /// Build the app with the configured dependencies.
    ///
    /// If no repository was specified, uses `MsgPackRepository` by default.
    pub fn build(self) -> App {
        App {
            repository: self
                .repository
                .unwrap_or_else(|| Arc::new(MsgPackRepository::new())),
            default_seed: self.default_seed,
        }
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}
