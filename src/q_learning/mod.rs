//! Q-learning and SARSA temporal difference learning
//!
//! Tabular agents that learn action values for 4x4 tic-tac-toe positions.
//! Both variants select moves ε-greedily and share the same value table;
//! they differ only in the bootstrap term of the non-terminal update.
//!
//! ## Key Differences
//!
//! | Aspect | Q-learning | SARSA |
//! |--------|------------|-------|
//! | Policy | Off-policy | On-policy |
//! | Bootstrap | max_a Q(s',a) over legal a | Q(s',a') for the selected a' |
//! | Exploration | Ignored by the target | Included in the target |
//!
//! ## Usage Example
//!
//! ```
//! use tetrad::q_learning::{Hyperparameters, QLearningAgent, SarsaAgent};
//!
//! let params = Hyperparameters::new(
//!     0.5, // alpha (learning rate)
//!     0.9, // gamma (discount)
//!     0.1, // epsilon (exploration)
//! )
//! .with_eps_decay(0.0001);
//!
//! let q_agent = QLearningAgent::new(params);
//! let sarsa_agent = SarsaAgent::new(params);
//! ```

pub mod agent;
pub mod q_table;
pub mod serialization;

// Public re-exports
pub use agent::{Hyperparameters, QLearningAgent, SarsaAgent, TdCore};
pub use q_table::{QTable, ValueEntry};
pub use serialization::{SavedAgent, TdAlgorithm, TdLearner, TrainingMetadata};
