//! Observer implementations for training pipelines
//!
//! Observers allow composable data collection during training without coupling
//! training logic to specific output formats.

use std::{
    path::Path,
    sync::{Arc, Mutex, MutexGuard},
};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use super::episode::{EpisodeSummary, FirstMover};
use crate::{
    Error, Result,
    ports::Observer,
    tictactoe::{GameOutcome, Mark},
};

/// Progress bar observer - Shows training progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    wins: usize,
    draws: usize,
    losses: usize,
}

impl ProgressObserver {
    /// Create a new progress observer
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            wins: 0,
            draws: 0,
            losses: 0,
        }
    }

    fn message(&self) -> String {
        format!("{} D:{} L:{}", self.wins, self.draws, self.losses)
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        let pb = ProgressBar::new(total_episodes as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes (W:{msg})")
                .map_err(|e| Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_episode_end(&mut self, episode: usize, summary: &EpisodeSummary) -> Result<()> {
        match summary.outcome {
            GameOutcome::Win(Mark::Agent) => self.wins += 1,
            GameOutcome::Win(Mark::Player) => self.losses += 1,
            GameOutcome::Draw => self.draws += 1,
        }

        if let Some(pb) = &self.progress_bar {
            pb.set_position(episode as u64 + 1);
            pb.set_message(self.message());
        }
        Ok(())
    }

    fn on_checkpoint(&mut self, episodes_completed: usize, path: &Path) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.println(format!(
                "Episodes played: {episodes_completed} (saved to {})",
                path.display()
            ));
        }
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(self.message());
        }
        Ok(())
    }
}

/// Summary of training metrics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub total_episodes: usize,
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,
    pub win_rate: f64,
    pub draw_rate: f64,
    pub loss_rate: f64,
    pub avg_episode_length: f64,
    /// Agent win rate in episodes the agent opened
    pub win_rate_moving_first: f64,
    /// Agent win rate in episodes the opponent opened
    pub win_rate_moving_second: f64,
}

#[derive(Debug, Default)]
struct Metrics {
    wins: usize,
    draws: usize,
    losses: usize,
    plies: Vec<usize>,
    first: (usize, usize),
    second: (usize, usize),
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 { 0.0 } else { num as f64 / den as f64 }
}

/// Metrics observer - Tracks training metrics
///
/// Clones share the same counters, so a caller can hand one clone to the
/// pipeline and read the summary from another afterwards.
#[derive(Clone, Default)]
pub struct MetricsObserver {
    metrics: Arc<Mutex<Metrics>>,
}

impl MetricsObserver {
    /// Create a new metrics observer
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Metrics> {
        self.metrics
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Get metrics summary
    pub fn summary(&self) -> MetricsSummary {
        let m = self.lock();
        let total = m.plies.len();
        MetricsSummary {
            total_episodes: total,
            wins: m.wins,
            draws: m.draws,
            losses: m.losses,
            win_rate: ratio(m.wins, total),
            draw_rate: ratio(m.draws, total),
            loss_rate: ratio(m.losses, total),
            avg_episode_length: ratio(m.plies.iter().sum(), total),
            win_rate_moving_first: ratio(m.first.0, m.first.1),
            win_rate_moving_second: ratio(m.second.0, m.second.1),
        }
    }
}

impl Observer for MetricsObserver {
    fn on_episode_end(&mut self, _episode: usize, summary: &EpisodeSummary) -> Result<()> {
        let mut m = self.lock();
        let won = summary.outcome == GameOutcome::Win(Mark::Agent);
        match summary.outcome {
            GameOutcome::Win(Mark::Agent) => m.wins += 1,
            GameOutcome::Win(Mark::Player) => m.losses += 1,
            GameOutcome::Draw => m.draws += 1,
        }
        m.plies.push(summary.plies);

        let bucket = match summary.first_mover {
            FirstMover::Agent => &mut m.first,
            FirstMover::Opponent => &mut m.second,
        };
        bucket.0 += usize::from(won);
        bucket.1 += 1;
        Ok(())
    }
}
