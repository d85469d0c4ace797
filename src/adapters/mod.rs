//! Storage backends for saved agents.
//!
//! [`MsgPackRepository`] writes agent files to disk; [`InMemoryRepository`]
//! keeps them in a shared map for tests.

pub mod in_memory_repository;
pub mod msgpack_repository;

pub use in_memory_repository::InMemoryRepository;
pub use msgpack_repository::MsgPackRepository;
