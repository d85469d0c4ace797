//! Tabular reinforcement learning for 4x4 tic-tac-toe
//!
//! This crate provides:
//! - A 4x4 board with four-in-a-line win detection and row-major state keys
//! - Q-learning and SARSA agents with ε-greedy selection and random tie-breaks
//! - A heuristic teacher mixing one-ply tactics with random play
//! - An episode runner and training loop with periodic checkpoints
//! - MessagePack persistence behind a repository port
//!
//! # Example
//!
//! ```
//! use rand::{SeedableRng, rngs::StdRng};
//! use tetrad::{
//!     pipeline::{TrainingConfig, TrainingPipeline},
//!     q_learning::{Hyperparameters, QLearningAgent},
//!     teacher::Teacher,
//! };
//!
//! let mut agent = QLearningAgent::new(Hyperparameters::default());
//! let mut teacher = Teacher::new(0.5);
//! let mut rng = StdRng::seed_from_u64(7);
//!
//! let result = TrainingPipeline::new(TrainingConfig {
//!     episodes: 20,
//!     checkpoint_interval: 10,
//! })
//! .run(&mut agent, &mut teacher, &mut rng)?;
//! assert_eq!(result.total_episodes, 20);
//! # Ok::<(), tetrad::Error>(())
//! ```

pub mod adapters;
pub mod app;
pub mod cli;
pub mod error;
pub mod pipeline;
pub mod ports;
pub mod q_learning;
pub mod teacher;
pub mod tictactoe;
pub mod types;

pub use error::{Error, Result};
pub use q_learning::{Hyperparameters, QLearningAgent, SarsaAgent};
pub use teacher::Teacher;
pub use tictactoe::{Board, GameOutcome, Mark, StateCodec};
pub use types::{Action, StateKey};
