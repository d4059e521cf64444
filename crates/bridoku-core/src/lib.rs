//! Board types shared by the Bridoku host and its reference guest module.
//!
//! Everything that crosses the foreign-module boundary is a [`Board`]: exactly
//! 81 ASCII bytes in row-major order, `'1'..='9'` for filled cells and `'.'`
//! for empty ones. This crate owns that text format and nothing else; it knows
//! no sudoku rules.
//!
//! # Overview
//!
//! - [`digit`]: [`Digit`], a type-safe cell value 1-9 with its ASCII mapping
//! - [`board`]: [`Board`], its parser ([`BoardError`]) and a grid renderer
//! - [`generated`]: [`GeneratedPuzzle`], the solved/puzzle pair a guest
//!   module produces from a seed
//!
//! # Examples
//!
//! ```
//! use bridoku_core::{Board, Digit};
//!
//! let board: Board = "53..7....6..195....98....6.8...6...34..8.3..17...2...6.6....28....419..5....8..79"
//!     .parse()?;
//! assert_eq!(board.cell(0), Some(Digit::D5));
//! assert_eq!(board.cell(2), None);
//! assert!(!board.is_complete());
//! # Ok::<(), bridoku_core::BoardError>(())
//! ```

pub mod board;
pub mod digit;
pub mod generated;

pub use self::{
    board::{BOARD_LEN, Board, BoardError, BoardGrid, EMPTY_CELL},
    digit::Digit,
    generated::GeneratedPuzzle,
};
