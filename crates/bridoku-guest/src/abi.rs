//! Status-code entry points over a linear memory.
//!
//! Both entry points take byte offsets into the module's memory and return
//! [`STATUS_OK`] or a non-zero failure status. Output buffers are written only
//! on success.

use bridoku_core::{BOARD_LEN, Board};

use crate::{generator, solver};

/// The call succeeded and the output buffers hold boards.
pub const STATUS_OK: i32 = 0;
/// A buffer range does not fit in linear memory.
pub const STATUS_OUT_OF_BOUNDS: i32 = 1;
/// The input bytes are not a board.
pub const STATUS_INVALID_BOARD: i32 = 2;
/// The board has conflicting givens or no completion.
pub const STATUS_UNSOLVABLE: i32 = 3;

/// Solves the board at `input` and writes the solution at `output`.
#[must_use]
pub fn solve_in_memory(memory: &mut [u8], input: usize, output: usize) -> i32 {
    let Some(input) = board_range(memory.len(), input) else {
        return STATUS_OUT_OF_BOUNDS;
    };
    let Some(output) = board_range(memory.len(), output) else {
        return STATUS_OUT_OF_BOUNDS;
    };
    match solve_bytes(&memory[input]) {
        Ok(solved) => {
            memory[output].copy_from_slice(solved.as_bytes());
            STATUS_OK
        }
        Err(status) => status,
    }
}

/// Generates a puzzle from `seed`, writing the solution at `solved` and the
/// puzzle at `puzzle`.
#[must_use]
pub fn generate_in_memory(memory: &mut [u8], seed: u64, solved: usize, puzzle: usize) -> i32 {
    let Some(solved) = board_range(memory.len(), solved) else {
        return STATUS_OUT_OF_BOUNDS;
    };
    let Some(puzzle) = board_range(memory.len(), puzzle) else {
        return STATUS_OUT_OF_BOUNDS;
    };
    let generated = generator::generate(seed);
    memory[solved].copy_from_slice(generated.solved.as_bytes());
    memory[puzzle].copy_from_slice(generated.puzzle.as_bytes());
    STATUS_OK
}

/// Solves raw board bytes, mapping failures to their status code.
///
/// # Errors
///
/// Returns [`STATUS_INVALID_BOARD`] or [`STATUS_UNSOLVABLE`].
pub fn solve_bytes(input: &[u8]) -> Result<Board, i32> {
    let board = Board::from_bytes(input).map_err(|_| STATUS_INVALID_BOARD)?;
    solver::solve(&board).map_err(|_| STATUS_UNSOLVABLE)
}

fn board_range(size: usize, offset: usize) -> Option<std::ops::Range<usize>> {
    let end = offset.checked_add(BOARD_LEN)?;
    (end <= size).then_some(offset..end)
}
