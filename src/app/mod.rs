//! Application layer with dependency injection container.
//!
//! The container owns infrastructure dependencies (agent persistence and the
//! random source) and provides factory methods for creating domain objects.
//! Swapping the repository is how tests avoid touching the file system.
//!
//! # Usage
//!
//! ## Production
//!
//! ```no_run
//! use tetrad::app::{AgentType, App, RunConfig};
//!
//! let app = App::new();
//! let config = RunConfig::new(AgentType::Q).with_teacher_episodes(10_000);
//! let prepared = app.prepare_agent(&config)?;
//! # Ok::<(), tetrad::Error>(())
//! ```
//!
//! ## Testing
//!
//! ```
//! use tetrad::adapters::InMemoryRepository;
//! use tetrad::app::App;
//!
//! let app = App::for_testing()
//!     .with_repository(InMemoryRepository::new())
//!     .with_default_seed(42)
//!     .build();
//! ```

pub mod config;
pub mod container;

pub use config::{AgentType, RunConfig, RunMode};
pub use container::{App, AppBuilder, PreparedAgent};
