//! Episode and training pipeline
//!
//! This module provides:
//! - The episode runner that plays one game and drives agent updates
//! - The training loop against an automated opponent, with checkpointing
//! - Observers recording progress and metrics during training

pub mod episode;
pub mod observers;
pub mod training;

pub use episode::{EpisodeRunner, EpisodeState, EpisodeSummary, FirstMover};
pub use observers::{MetricsObserver, MetricsSummary, ProgressObserver};
pub use training::{
    Checkpointer, RepositoryCheckpointer, TrainingConfig, TrainingPipeline, TrainingResult,
};

pub use crate::ports::{Learner, Observer, Opponent};
