//! Winning line analysis for 4x4 tic-tac-toe

use super::{CELL_COUNT, Cell, Mark};

/// The ten winning lines as row-major cell indices: four rows, four
/// columns, then the main and anti diagonal.
pub const LINES: [[usize; 4]; 10] = [
    [0, 1, 2, 3],
    [4, 5, 6, 7],
    [8, 9, 10, 11],
    [12, 13, 14, 15], // rows
    [0, 4, 8, 12],
    [1, 5, 9, 13],
    [2, 6, 10, 14],
    [3, 7, 11, 15], // columns
    [0, 5, 10, 15],
    [3, 6, 9, 12], // diagonals
];

/// The row lines only, used by the two-in-a-row setup scan.
const ROWS: &[[usize; 4]] = &[LINES[0], LINES[1], LINES[2], LINES[3]];

/// Utility for analyzing lines on the board
pub struct LineAnalyzer;

impl LineAnalyzer {
    /// Check if `mark` fills any complete line
    pub fn has_won(cells: &[Cell; CELL_COUNT], mark: Mark) -> bool {
        let target = mark.to_cell();
        LINES
            .iter()
            .any(|line| line.iter().all(|&idx| cells[idx] == target))
    }

    /// First cell (in line order) that would complete four-in-a-line for `mark`
    pub fn completing_move(cells: &[Cell; CELL_COUNT], mark: Mark) -> Option<usize> {
        LINES
            .iter()
            .find_map(|line| Self::open_cell_with(cells, mark, line, 3))
    }

    /// First empty cell of the first row holding exactly two `mark`s and two
    /// empty cells.
    ///
    /// Only rows are scanned; columns and diagonals are not considered.
    pub fn row_setup_move(cells: &[Cell; CELL_COUNT], mark: Mark) -> Option<usize> {
        ROWS.iter()
            .find_map(|line| Self::open_cell_with(cells, mark, line, 2))
    }

    /// Returns the first empty cell of `line` when it holds exactly `count`
    /// marks and the rest of the line is empty.
    fn open_cell_with(
        cells: &[Cell; CELL_COUNT],
        mark: Mark,
        line: &[usize; 4],
        count: usize,
    ) -> Option<usize> {
        let target = mark.to_cell();
        let mut owned = 0;
        let mut first_empty = None;

        for &idx in line {
            match cells[idx] {
                Cell::Empty => {
                    first_empty.get_or_insert(idx);
                }
                c if c == target => owned += 1,
                _ => return None, // Opponent piece in line
            }
        }

        if owned == count {
            first_empty
        } else {
            None
        }
    }
}
