//! MessagePack implementation of the agent repository.
//!
//! This adapter implements the AgentRepository port using rmp_serde for
//! compact binary serialization.

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::Path,
};

use tracing::debug;

use crate::{Result, error::Error, ports::AgentRepository, q_learning::SavedAgent};

/// MessagePack-based agent repository.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
///
/// use tetrad::{
///     adapters::MsgPackRepository,
///     ports::{AgentRepository, Learner},
///     q_learning::{Hyperparameters, SarsaAgent, TrainingMetadata},
/// };
///
/// let repo = MsgPackRepository::new();
/// let agent = SarsaAgent::new(Hyperparameters::default());
///
/// repo.save(&agent.to_saved(TrainingMetadata::default()), Path::new("sarsa_agent.msgpack"))?;
/// let saved = repo.load(Path::new("sarsa_agent.msgpack"))?;
/// # Ok::<(), tetrad::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MsgPackRepository;

impl MsgPackRepository {
    /// Create a new MessagePack repository.
    pub fn new() -> Self {
        Self
    }
}

impl AgentRepository for MsgPackRepository {
    fn save(&self, agent: &SavedAgent, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).map_err(|source| Error::Io {
                operation: format!("create directory {parent:?}"),
                source,
            })?;
        }

        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create file {path:?}"),
            source,
        })?;
        let mut writer = BufWriter::new(file);

        rmp_serde::encode::write_named(&mut writer, agent).map_err(|e| {
            Error::SerializationContext {
                operation: "serialize agent to MessagePack".to_string(),
                message: e.to_string(),
            }
        })?;
        writer.flush().map_err(|source| Error::Io {
            operation: format!("flush file {path:?}"),
            source,
        })?;

        debug!(path = %path.display(), entries = agent.values.len(), "saved agent");
        Ok(())
    }

    fn load(&self, path: &Path) -> Result<SavedAgent> {
        if !path.exists() {
            return Err(Error::AgentFileMissing {
                path: path.to_path_buf(),
            });
        }

        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open file {path:?}"),
            source,
        })?;

        let agent: SavedAgent =
            rmp_serde::decode::from_read(&file).map_err(|e| Error::SerializationContext {
                operation: "deserialize agent from MessagePack".to_string(),
                message: e.to_string(),
            })?;

        debug!(path = %path.display(), entries = agent.values.len(), "loaded agent");
        Ok(agent)
    }

    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }
}
