//! Observer port - abstraction for training observation
//!
//! This port defines the interface for observing training events, so that
//! progress display and metric collection stay decoupled from the training
//! loop itself.

use std::path::Path;

use crate::{Result, pipeline::EpisodeSummary};

/// Observer trait for monitoring training
///
/// # Event Sequence
///
/// 1. `on_training_start(total_episodes)` - Once at the beginning
/// 2. `on_episode_end(episode, summary)` - After every episode
/// 3. `on_checkpoint(episode, path)` - Whenever the agent is persisted
/// 4. `on_training_end()` - Once at the end
///
/// # Examples
///
/// ```no_run
/// use tetrad::{pipeline::EpisodeSummary, ports::Observer};
///
/// struct CountingObserver {
///     episodes: usize,
/// }
///
/// impl Observer for CountingObserver {
///     fn on_episode_end(
///         &mut self,
///         _episode: usize,
///         _summary: &EpisodeSummary,
///     ) -> tetrad::Result<()> {
///         self.episodes += 1;
///         Ok(())
///     }
/// }
/// ```
pub trait Observer: Send {
    /// Called when training starts.
    fn on_training_start(&mut self, _total_episodes: usize) -> Result<()> {
        Ok(())
    }

    /// Called after each episode with its 0-based index.
    fn on_episode_end(&mut self, _episode: usize, _summary: &EpisodeSummary) -> Result<()> {
        Ok(())
    }

    /// Called after the agent was written to `path`.
    ///
    /// `episodes_completed` counts episodes finished in this run.
    fn on_checkpoint(&mut self, _episodes_completed: usize, _path: &Path) -> Result<()> {
        Ok(())
    }

    /// Called when training completes.
    ///
    /// Use this to finalize outputs or display summaries.
    fn on_training_end(&mut self) -> Result<()> {
        Ok(())
    }
}
