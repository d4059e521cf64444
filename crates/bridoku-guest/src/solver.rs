//! Backtracking solver over row/column/box bitmasks.

use bridoku_core::{BOARD_LEN, Board, Digit};

/// Why a board has no solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum SolveError {
    /// Two givens in one house share a digit.
    #[display("digit {digit} repeats in the house of cell {index}")]
    Conflict {
        /// Cell index of the second occurrence.
        index: usize,
        /// The repeated digit.
        digit: Digit,
    },
    /// The givens are consistent but admit no completion.
    #[display("board has no solution")]
    NoSolution,
}

const ALL_CANDIDATES: u16 = 0x1ff;

/// A partially filled grid with house occupancy masks.
///
/// Bit `d - 1` of a mask is set when digit `d` is already placed in that house.
#[derive(Debug, Clone)]
pub struct Grid {
    cells: [u8; BOARD_LEN],
    rows: [u16; 9],
    columns: [u16; 9],
    boxes: [u16; 9],
}

impl Grid {
    /// Creates an empty grid.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cells: [0; BOARD_LEN],
            rows: [0; 9],
            columns: [0; 9],
            boxes: [0; 9],
        }
    }

    /// Builds a grid from a board, rejecting givens that repeat in a house.
    ///
    /// # Errors
    ///
    /// Returns [`SolveError::Conflict`] for the first repeated given.
    pub fn from_board(board: &Board) -> Result<Self, SolveError> {
        let mut grid = Self::new();
        for (index, cell) in board.cells().enumerate() {
            if let Some(digit) = cell {
                if grid.candidates(index) & bit(digit.value()) == 0 {
                    return Err(SolveError::Conflict { index, digit });
                }
                grid.place(index, digit.value());
            }
        }
        Ok(grid)
    }

    /// Converts the grid back into a board.
    #[must_use]
    pub fn to_board(&self) -> Board {
        self.cells
            .iter()
            .enumerate()
            .fold(Board::EMPTY, |board, (index, &value)| {
                board.with_cell(index, (value != 0).then(|| Digit::from_value(value)))
            })
    }

    /// Returns the digit value at `index`, or 0 for an empty cell.
    #[must_use]
    pub fn value(&self, index: usize) -> u8 {
        self.cells[index]
    }

    /// Places `value` (1-9) at `index`, which must be empty.
    pub fn place(&mut self, index: usize, value: u8) {
        debug_assert_eq!(self.cells[index], 0);
        let (row, column, bx) = houses(index);
        self.cells[index] = value;
        self.rows[row] |= bit(value);
        self.columns[column] |= bit(value);
        self.boxes[bx] |= bit(value);
    }

    /// Empties the cell at `index`.
    pub fn clear(&mut self, index: usize) {
        let value = self.cells[index];
        if value == 0 {
            return;
        }
        let (row, column, bx) = houses(index);
        self.cells[index] = 0;
        self.rows[row] &= !bit(value);
        self.columns[column] &= !bit(value);
        self.boxes[bx] &= !bit(value);
    }

    /// Returns the candidate mask for the cell at `index`.
    #[must_use]
    pub fn candidates(&self, index: usize) -> u16 {
        let (row, column, bx) = houses(index);
        !(self.rows[row] | self.columns[column] | self.boxes[bx]) & ALL_CANDIDATES
    }

    /// Finds the empty cell with the fewest candidates.
    ///
    /// Returns `None` when the grid is full.
    #[must_use]
    pub fn most_constrained(&self) -> Option<(usize, u16)> {
        let mut best: Option<(usize, u16)> = None;
        for index in (0..BOARD_LEN).filter(|&index| self.cells[index] == 0) {
            let candidates = self.candidates(index);
            if best.is_none_or(|(_, current)| candidates.count_ones() < current.count_ones()) {
                best = Some((index, candidates));
                if candidates.count_ones() <= 1 {
                    break;
                }
            }
        }
        best
    }

    /// Counts completions, stopping once `limit` is reached.
    ///
    /// The grid is left as it was found.
    pub fn count_solutions(&mut self, limit: usize) -> usize {
        let mut count = 0;
        self.search(limit, &mut count, &mut None);
        count
    }

    /// Fills the grid with its first completion in ascending digit order.
    ///
    /// # Errors
    ///
    /// Returns [`SolveError::NoSolution`] if no completion exists; the grid is
    /// left unchanged in that case.
    pub fn solve(&mut self) -> Result<(), SolveError> {
        let mut first = None;
        let mut count = 0;
        self.search(1, &mut count, &mut first);
        let cells = first.ok_or(SolveError::NoSolution)?;
        for (index, &value) in cells.iter().enumerate() {
            if self.cells[index] == 0 {
                self.place(index, value);
            }
        }
        Ok(())
    }

    fn search(
        &mut self,
        limit: usize,
        count: &mut usize,
        first: &mut Option<[u8; BOARD_LEN]>,
    ) {
        let Some((index, candidates)) = self.most_constrained() else {
            *count += 1;
            first.get_or_insert(self.cells);
            return;
        };
        for value in 1..=9 {
            if candidates & bit(value) == 0 {
                continue;
            }
            self.place(index, value);
            self.search(limit, count, first);
            self.clear(index);
            if *count >= limit {
                return;
            }
        }
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

/// Solves `board`, returning its first completion.
///
/// An already complete, consistent board is returned unchanged.
///
/// # Errors
///
/// Returns [`SolveError`] if the givens conflict or admit no completion.
pub fn solve(board: &Board) -> Result<Board, SolveError> {
    let mut grid = Grid::from_board(board)?;
    grid.solve()?;
    Ok(grid.to_board())
}

pub(crate) fn bit(value: u8) -> u16 {
    1 << (value - 1)
}

pub(crate) fn houses(index: usize) -> (usize, usize, usize) {
    let (row, column) = (index / 9, index % 9);
    (row, column, (row / 3) * 3 + column / 3)
}
