//! tetrad - tabular Q-learning and SARSA agents for 4x4 tic-tac-toe
//!
//! Train against the heuristic teacher:
//!
//! ```text
//! tetrad -a q -t 20000
//! ```
//!
//! Play the trained agent:
//!
//! ```text
//! tetrad -a q -l
//! ```

use anyhow::Result;
use clap::Parser;
use tetrad::cli::{self, Cli};

fn main() -> Result<()> {
    let args = Cli::parse();
    cli::init_tracing(&args.log_level)?;
    cli::execute(args)
}
