//! The 81-character board text format.
//!
//! A [`Board`] is the only data that crosses the foreign-module boundary. The
//! format has no delimiters and no whitespace: exactly [`BOARD_LEN`] ASCII
//! bytes, row-major, `'1'..='9'` for filled cells and [`EMPTY_CELL`] (`'.'`)
//! for empty ones.

use std::{
    fmt::{self, Display, Write as _},
    str::FromStr,
};

use crate::Digit;

/// Number of cells (and bytes) in a board.
pub const BOARD_LEN: usize = 81;

/// The byte that marks an empty cell.
pub const EMPTY_CELL: u8 = b'.';

/// Errors produced when bytes do not form a valid board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum BoardError {
    /// The input is not exactly [`BOARD_LEN`] bytes long.
    #[display("board must be {BOARD_LEN} characters long, got {len}")]
    InvalidLength {
        /// Byte length of the rejected input.
        len: usize,
    },
    /// A byte outside `'1'..='9'` and `'.'` was found.
    #[display("invalid board character {:?} at index {index}", char::from(*byte))]
    InvalidCharacter {
        /// Cell index of the offending byte.
        index: usize,
        /// The offending byte.
        byte: u8,
    },
}

/// A sudoku board in its 81-byte wire representation.
///
/// Every `Board` value upholds the format invariant: exactly 81 bytes, each
/// one of `b'1'..=b'9'` or `b'.'`. Construction goes through
/// [`Board::from_bytes`] or [`FromStr`], both of which check the length before
/// looking at any byte.
///
/// # Examples
///
/// ```
/// use bridoku_core::{Board, BoardError, Digit};
///
/// let board = Board::EMPTY.with_cell(40, Some(Digit::D5));
/// assert_eq!(board.cell(40), Some(Digit::D5));
/// assert_eq!(board.filled_count(), 1);
///
/// assert_eq!(
///     "123".parse::<Board>(),
///     Err(BoardError::InvalidLength { len: 3 }),
/// );
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [u8; BOARD_LEN],
}

impl Board {
    /// A board with every cell empty.
    pub const EMPTY: Self = Self {
        cells: [EMPTY_CELL; BOARD_LEN],
    };

    /// Parses a board from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::InvalidLength`] if `bytes` is not exactly
    /// [`BOARD_LEN`] long, otherwise [`BoardError::InvalidCharacter`] for the
    /// first byte outside the board alphabet.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, BoardError> {
        let cells: [u8; BOARD_LEN] = bytes
            .try_into()
            .map_err(|_| BoardError::InvalidLength { len: bytes.len() })?;
        if let Some((index, &byte)) = cells
            .iter()
            .enumerate()
            .find(|(_, byte)| !is_board_byte(**byte))
        {
            return Err(BoardError::InvalidCharacter { index, byte });
        }
        Ok(Self { cells })
    }

    /// Returns the wire bytes of this board.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; BOARD_LEN] {
        &self.cells
    }

    /// Returns the digit at `index` (row-major), or `None` for an empty cell.
    ///
    /// # Panics
    ///
    /// Panics if `index >= 81`.
    #[must_use]
    pub fn cell(&self, index: usize) -> Option<Digit> {
        assert!(index < BOARD_LEN, "Cell index must be 0-80, got {index}");
        Digit::from_ascii(self.cells[index])
    }

    /// Returns a copy of this board with the cell at `index` replaced.
    ///
    /// This is the edit path of the board view: clicking an empty cell fills
    /// it, clicking a filled cell clears it.
    ///
    /// # Panics
    ///
    /// Panics if `index >= 81`.
    #[must_use]
    pub fn with_cell(mut self, index: usize, digit: Option<Digit>) -> Self {
        assert!(index < BOARD_LEN, "Cell index must be 0-80, got {index}");
        self.cells[index] = digit.map_or(EMPTY_CELL, Digit::to_ascii);
        self
    }

    /// Returns an iterator over all cells in row-major order.
    pub fn cells(&self) -> impl ExactSizeIterator<Item = Option<Digit>> + '_ {
        self.cells.iter().map(|&byte| Digit::from_ascii(byte))
    }

    /// Returns the number of filled cells.
    #[must_use]
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|&&byte| byte != EMPTY_CELL).count()
    }

    /// Returns `true` if no cell is empty.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.cells.contains(&EMPTY_CELL)
    }

    /// Returns a multi-line rendering with box separators.
    ///
    /// ```
    /// use bridoku_core::Board;
    ///
    /// let text = Board::EMPTY.grid().to_string();
    /// assert_eq!(text.lines().count(), 11);
    /// assert_eq!(text.lines().next(), Some(". . . | . . . | . . ."));
    /// ```
    #[must_use]
    pub fn grid(&self) -> BoardGrid<'_> {
        BoardGrid { board: self }
    }
}

fn is_board_byte(byte: u8) -> bool {
    byte == EMPTY_CELL || Digit::from_ascii(byte).is_some()
}

impl Default for Board {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl FromStr for Board {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_bytes(s.as_bytes())
    }
}

impl TryFrom<&[u8]> for Board {
    type Error = BoardError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Self::from_bytes(bytes)
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.cells
            .iter()
            .try_for_each(|&byte| f.write_char(char::from(byte)))
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Board").field(&self.to_string()).finish()
    }
}

/// Grid rendering of a [`Board`], returned by [`Board::grid`].
#[derive(Debug, Clone, Copy)]
pub struct BoardGrid<'a> {
    board: &'a Board,
}

impl Display for BoardGrid<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (y, row) in self.board.cells.chunks_exact(9).enumerate() {
            if y > 0 && y % 3 == 0 {
                writeln!(f, "------+-------+------")?;
            }
            for (x, &byte) in row.iter().enumerate() {
                match x {
                    0 => {}
                    3 | 6 => f.write_str(" | ")?,
                    _ => f.write_char(' ')?,
                }
                f.write_char(char::from(byte))?;
            }
            if y < 8 {
                f.write_char('\n')?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    const PUZZLE: &str =
        "53..7....6..195....98....6.8...6...34..8.3..17...2...6.6....28....419..5....8..79";

    #[test]
    fn test_parse_and_display() {
        let board: Board = PUZZLE.parse().unwrap();
        assert_eq!(board.to_string(), PUZZLE);
        assert_eq!(board.as_bytes(), PUZZLE.as_bytes());
        assert_eq!(board.filled_count(), 30);
        assert!(!board.is_complete());
    }

    #[test]
    fn test_length_checked_before_alphabet() {
        assert_eq!(
            "x".repeat(80).parse::<Board>(),
            Err(BoardError::InvalidLength { len: 80 })
        );
        assert_eq!(
            Board::from_bytes(&[]),
            Err(BoardError::InvalidLength { len: 0 })
        );
        // multi-byte characters count by bytes
        let wide = format!("{}５", ".".repeat(80));
        assert_eq!(
            wide.parse::<Board>(),
            Err(BoardError::InvalidLength { len: 83 })
        );
    }

    #[test]
    fn test_invalid_character() {
        let mut text = PUZZLE.to_owned();
        text.replace_range(4..5, "0");
        assert_eq!(
            text.parse::<Board>(),
            Err(BoardError::InvalidCharacter {
                index: 4,
                byte: b'0'
            })
        );
        let err = BoardError::InvalidCharacter {
            index: 4,
            byte: b'0',
        };
        assert_eq!(err.to_string(), "invalid board character '0' at index 4");
    }

    #[test]
    fn test_cell_access_and_edit() {
        let board: Board = PUZZLE.parse().unwrap();
        assert_eq!(board.cell(0), Some(Digit::D5));
        assert_eq!(board.cell(80), Some(Digit::D9));
        assert_eq!(board.cell(2), None);

        let edited = board.with_cell(2, Some(Digit::D4));
        assert_eq!(edited.cell(2), Some(Digit::D4));
        assert_eq!(edited.filled_count(), 31);

        let cleared = edited.with_cell(2, None);
        assert_eq!(cleared, board);
    }

    #[test]
    #[should_panic(expected = "Cell index must be 0-80")]
    fn test_cell_out_of_range_panics() {
        let _ = Board::EMPTY.cell(81);
    }

    #[test]
    fn test_grid_rendering() {
        let board: Board = PUZZLE.parse().unwrap();
        let text = board.grid().to_string();
        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 11);
        assert_eq!(lines[0], "5 3 . | . 7 . | . . .");
        assert_eq!(lines[3], "------+-------+------");
        assert_eq!(lines[10], ". . . | . 8 . | . 7 9");
    }

    fn board_byte() -> impl Strategy<Value = u8> {
        prop_oneof![Just(EMPTY_CELL), (b'1'..=b'9')]
    }

    proptest! {
        #[test]
        fn test_any_alphabet_string_parses(bytes in prop::collection::vec(board_byte(), BOARD_LEN)) {
            let board = Board::from_bytes(&bytes).unwrap();
            prop_assert_eq!(&board.as_bytes()[..], &bytes[..]);
            prop_assert_eq!(board.cells().filter(Option::is_some).count(), board.filled_count());
        }

        #[test]
        fn test_wrong_length_is_rejected(len in 0usize..200) {
            prop_assume!(len != BOARD_LEN);
            let bytes = vec![EMPTY_CELL; len];
            prop_assert_eq!(Board::from_bytes(&bytes), Err(BoardError::InvalidLength { len }));
        }
    }
}
