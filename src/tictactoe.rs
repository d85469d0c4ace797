//! 4x4 tic-tac-toe game implementation

pub mod board;
pub mod codec;
pub mod game;
pub mod lines;

pub use board::{BOARD_SIZE, Board, CELL_COUNT, Cell, Mark};
pub use codec::StateCodec;
pub use game::GameOutcome;
pub use lines::{LINES, LineAnalyzer};
