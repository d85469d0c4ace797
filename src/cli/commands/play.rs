//! Play command - interactive games between a human and the agent

use std::{
    io::{BufRead, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use rand::RngCore;
use tracing::info;

use crate::{
    app::{App, PreparedAgent, RunConfig},
    cli::{
        human::{Console, HumanOpponent},
        output,
    },
    pipeline::{EpisodeRunner, FirstMover},
    ports::Learner,
    q_learning::TrainingMetadata,
};

/// A sequence of human games; the agent keeps learning and is saved after
/// every game.
pub struct PlaySession<'a, R, W> {
    app: &'a App,
    path: PathBuf,
    agent: Box<dyn Learner>,
    metadata: TrainingMetadata,
    console: Console<R, W>,
    games_played: usize,
}

impl<'a, R: BufRead, W: Write> PlaySession<'a, R, W> {
    pub fn new(
        app: &'a App,
        path: PathBuf,
        prepared: PreparedAgent,
        console: Console<R, W>,
    ) -> Self {
        Self {
            app,
            path,
            agent: prepared.agent,
            metadata: prepared.metadata,
            console,
            games_played: 0,
        }
    }

    pub fn games_played(&self) -> usize {
        self.games_played
    }

    pub fn agent(&self) -> &dyn Learner {
        self.agent.as_ref()
    }

    /// Consume the session, returning the console.
    pub fn into_console(self) -> Console<R, W> {
        self.console
    }

    /// Play games until the human declines another one.
    ///
    /// Returns the number of games played in this session.
    pub fn run(&mut self, rng: &mut dyn RngCore) -> Result<usize> {
        self.console.say(
            "Welcome to 4x4 tic-tac-toe. You are 'X' and the computer is 'O'.",
        )?;

        loop {
            self.play_one(rng)?;

            self.console
                .say(format!("Games played: {}", self.games_played))?;
            if !self
                .console
                .ask_yes_no("Do you want to play again? [y/n]: ")?
            {
                self.console.say("OK. Exiting.")?;
                return Ok(self.games_played);
            }
        }
    }

    fn play_one(&mut self, rng: &mut dyn RngCore) -> Result<()> {
        let first_mover = if self.console.ask_yes_no("Do you want to go first? [y/n]: ")? {
            FirstMover::Opponent
        } else {
            FirstMover::Agent
        };

        let summary = {
            let mut human = HumanOpponent::new(&mut self.console);
            EpisodeRunner::new(first_mover).run(self.agent.as_mut(), &mut human, rng)?
        };

        self.console.say(summary.final_board)?;
        self.console.say(output::game_result_message(&summary))?;

        self.games_played += 1;
        self.metadata.human_games += 1;
        self.app
            .save_agent(self.agent.as_ref(), self.metadata.clone(), &self.path)
            .with_context(|| format!("failed to save agent to {}", self.path.display()))?;
        info!(
            games = self.games_played,
            outcome = %summary.outcome,
            path = %self.path.display(),
            "saved agent after game"
        );
        Ok(())
    }
}

/// Run an interactive session on stdin/stdout.
pub fn execute(app: &App, config: &RunConfig, prepared: PreparedAgent) -> Result<()> {
    let mut rng = app.rng(config.seed);
    let mut session = PlaySession::new(app, config.resolved_path(), prepared, Console::stdio());
    session.run(&mut rng)?;
    Ok(())
}
