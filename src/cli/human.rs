//! Interactive console collaborator
//!
//! Reads moves and yes/no answers from a line-oriented input and writes
//! prompts to an output stream. Malformed input never escapes: the prompt is
//! repeated until the answer is usable or the input ends.

use std::io::{self, BufRead, StdinLock, Stdout, Write};

use rand::RngCore;

use crate::{Error, Result, ports::Opponent, tictactoe::Board, types::Action};

/// Line-oriented prompt over any reader/writer pair.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl Console<StdinLock<'static>, Stdout> {
    /// Console bound to the process's stdin and stdout.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Consume the console, returning the output stream.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Write one line of text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the output stream fails.
    pub fn say(&mut self, text: impl std::fmt::Display) -> Result<()> {
        writeln!(self.output, "{text}").map_err(|source| Error::Io {
            operation: "write to console".to_string(),
            source,
        })
    }

    /// Show `prompt` and read one trimmed line.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] on a stream failure or when the input is
    /// exhausted.
    pub fn read_line(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{prompt}")
            .and_then(|()| self.output.flush())
            .map_err(|source| Error::Io {
                operation: "write prompt".to_string(),
                source,
            })?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .map_err(|source| Error::Io {
                operation: "read console input".to_string(),
                source,
            })?;
        if read == 0 {
            return Err(Error::Io {
                operation: "read console input".to_string(),
                source: io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"),
            });
        }
        Ok(line.trim().to_string())
    }

    /// Ask a yes/no question until the answer is one of y, yes, n, no.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the input ends before a valid answer.
    pub fn ask_yes_no(&mut self, prompt: &str) -> Result<bool> {
        loop {
            let answer = self.read_line(prompt)?;
            match answer.to_ascii_lowercase().as_str() {
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => self.say("Invalid input. Please enter 'y' or 'n'.")?,
            }
        }
    }

    /// Ask for a move until the answer names an empty cell of `board`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the input ends before a legal move.
    pub fn ask_move(&mut self, board: &Board) -> Result<Action> {
        loop {
            let answer =
                self.read_line("Your turn! Choose a row and column from 0-3 as row,col: ")?;
            match parse_move(&answer) {
                Ok(action) if board.is_empty(action) => return Ok(action),
                Ok(action) => self.say(format!("Cell {action} is taken. Please choose again."))?,
                Err(err) => self.say(format!("INVALID INPUT! {err}"))?,
            }
        }
    }
}

/// Parse `row,col` with both coordinates in 0..=3.
///
/// # Errors
///
/// Returns [`Error::InvalidMoveInput`] for anything else.
///
/// # Examples
///
/// ```
/// use tetrad::cli::human::parse_move;
///
/// let action = parse_move(" 2, 3 ")?;
/// assert_eq!((action.row(), action.col()), (2, 3));
/// assert!(parse_move("4,0").is_err());
/// # Ok::<(), tetrad::Error>(())
/// ```
pub fn parse_move(input: &str) -> Result<Action> {
    let invalid = |reason: &str| Error::InvalidMoveInput {
        input: input.to_string(),
        reason: reason.to_string(),
    };

    let (row, col) = input
        .split_once(',')
        .ok_or_else(|| invalid("expected the format row,col"))?;
    let row: usize = row
        .trim()
        .parse()
        .map_err(|_| invalid("row is not a number"))?;
    let col: usize = col
        .trim()
        .parse()
        .map_err(|_| invalid("column is not a number"))?;

    Action::new(row, col).map_err(|_| invalid("row and column must be between 0 and 3"))
}

/// A human at the console, playing `X`.
pub struct HumanOpponent<'a, R, W> {
    console: &'a mut Console<R, W>,
}

impl<'a, R: BufRead, W: Write> HumanOpponent<'a, R, W> {
    pub fn new(console: &'a mut Console<R, W>) -> Self {
        Self { console }
    }
}

impl<R: BufRead, W: Write> Opponent for HumanOpponent<'_, R, W> {
    fn select_move(&mut self, board: &Board, _rng: &mut dyn RngCore) -> Result<Action> {
        self.console.say(board)?;
        self.console.ask_move(board)
    }

    fn name(&self) -> &str {
        "Human"
    }
}
