//! Command-line interface
//!
//! A single command: with `--teacher-episodes` the agent trains against the
//! heuristic teacher, otherwise a human plays it interactively. Either way
//! the agent keeps learning and is saved to its agent file.

pub mod commands;
pub mod human;
pub mod output;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::warn;

use self::{commands::train::TrainOptions, human::Console};
use crate::{
    app::{AgentType, App, RunConfig, RunMode},
    q_learning::Hyperparameters,
};

#[derive(Parser, Debug, Clone)]
#[command(name = "tetrad")]
#[command(
    version,
    about = "Train a Q-learning or SARSA agent to play 4x4 tic-tac-toe",
    allow_negative_numbers = true
)]
pub struct Cli {
    /// Learning algorithm for the computer agent
    #[arg(short = 'a', long, value_enum, default_value = "q")]
    pub agent_type: AgentType,

    /// Agent file (defaults to q_agent.msgpack or sarsa_agent.msgpack)
    #[arg(short = 'p', long)]
    pub path: Option<PathBuf>,

    /// Resume from the agent file instead of starting a new agent
    #[arg(short = 'l', long)]
    pub load: bool,

    /// Train against the teacher for this many games instead of playing
    #[arg(short = 't', long)]
    pub teacher_episodes: Option<i64>,

    /// Learning rate
    #[arg(long, default_value_t = 0.5)]
    pub alpha: f64,

    /// Discount factor
    #[arg(long, default_value_t = 0.9)]
    pub gamma: f64,

    /// Exploration rate
    #[arg(long, default_value_t = 0.1)]
    pub epsilon: f64,

    /// Geometric decay applied to epsilon after every action selection
    #[arg(long, default_value_t = 0.0)]
    pub eps_decay: f64,

    /// Probability that the teacher uses its tactics instead of a random move
    #[arg(long, default_value_t = 0.5)]
    pub ability_level: f64,

    /// Save the agent after every this many teacher episodes
    #[arg(long, default_value_t = 1000)]
    pub checkpoint_interval: usize,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Overwrite an existing agent file without asking
    #[arg(long)]
    pub force: bool,

    /// Show progress bar
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub progress: bool,

    /// Optional path for writing a training summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

impl Cli {
    /// The run configuration these arguments describe (not yet validated).
    pub fn run_config(&self) -> RunConfig {
        RunConfig {
            agent_type: self.agent_type,
            path: self.path.clone(),
            load: self.load,
            teacher_episodes: self.teacher_episodes,
            hyperparameters: Hyperparameters::new(self.alpha, self.gamma, self.epsilon)
                .with_eps_decay(self.eps_decay),
            ability_level: self.ability_level,
            checkpoint_interval: self.checkpoint_interval,
            seed: self.seed,
        }
    }

    fn train_options(&self) -> TrainOptions {
        TrainOptions {
            progress: self.progress,
            summary: self.summary.clone(),
        }
    }
}

/// Install the stderr log subscriber.
///
/// `RUST_LOG` takes precedence over `level` when set.
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init()
        .context("failed to install the log subscriber")?;

    Ok(())
}

/// Run the command described by `cli` with production dependencies.
pub fn execute(cli: Cli) -> Result<()> {
    execute_with(&App::new(), cli)
}

/// Run the command described by `cli` against `app`.
pub fn execute_with(app: &App, cli: Cli) -> Result<()> {
    let config = cli.run_config();
    let mode = config.mode()?;
    let path = config.resolved_path();

    if !config.load && app.agent_exists(&path) {
        warn!(path = %path.display(), "agent file already exists");
        if !cli.force && !confirm_overwrite(&path)? {
            println!("OK. Exiting.");
            return Ok(());
        }
    }

    let prepared = app
        .prepare_agent(&config)
        .with_context(|| format!("cannot load agent from {}", path.display()))?;

    match mode {
        RunMode::Train { episodes } => {
            commands::train::execute(app, &config, prepared, episodes, &cli.train_options())
        }
        RunMode::Play => commands::play::execute(app, &config, prepared),
    }
}

fn confirm_overwrite(path: &std::path::Path) -> Result<bool> {
    let mut console = Console::stdio();
    console.say(format!("An agent is already saved at {}.", path.display()))?;
    Ok(console.ask_yes_no("Are you sure you want to overwrite it? [y/n]: ")?)
}
