//! Trait seams between the game loop and its collaborators.
//!
//! Agents, opponents (teacher or human), training observers and agent
//! storage each sit behind one trait here.

pub mod learner;
pub mod observer;
pub mod opponent;
pub mod repository;

pub use learner::Learner;
pub use observer::Observer;
pub use opponent::Opponent;
pub use repository::AgentRepository;
