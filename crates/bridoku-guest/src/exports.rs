//! `wasm32` exports.
//!
//! Addresses arrive as byte offsets into this module's linear memory, and the
//! host starts allocating at offset 0, which Rust treats as the null pointer.
//! Board bytes are therefore moved one volatile access at a time, which is
//! defined for any address outside Rust allocations, and never through a
//! reference or slice.

use core::{arch::wasm32, ptr};

use bridoku_core::BOARD_LEN;

use crate::{
    abi::{self, STATUS_OK, STATUS_OUT_OF_BOUNDS},
    generator,
};

const PAGE_SIZE: usize = 0x1_0000;

fn in_bounds(address: usize) -> bool {
    let size = wasm32::memory_size::<0>().saturating_mul(PAGE_SIZE);
    address
        .checked_add(BOARD_LEN)
        .is_some_and(|end| end <= size)
}

/// Copies the board bytes at `address` out of linear memory.
///
/// # Safety
///
/// `address..address + 81` must be inside linear memory and must not overlap
/// a Rust allocation.
unsafe fn read_board(address: usize) -> [u8; BOARD_LEN] {
    let src = ptr::with_exposed_provenance::<u8>(address);
    let mut bytes = [0; BOARD_LEN];
    for (i, byte) in bytes.iter_mut().enumerate() {
        // SAFETY: the caller guarantees the whole range is addressable.
        *byte = unsafe { src.wrapping_add(i).read_volatile() };
    }
    bytes
}

/// Copies `bytes` into linear memory at `address`.
///
/// # Safety
///
/// Same as [`read_board`].
unsafe fn write_board(address: usize, bytes: &[u8; BOARD_LEN]) {
    let dst = ptr::with_exposed_provenance_mut::<u8>(address);
    for (i, &byte) in bytes.iter().enumerate() {
        // SAFETY: the caller guarantees the whole range is addressable.
        unsafe { dst.wrapping_add(i).write_volatile(byte) };
    }
}

/// Solves the board at `input`, writing the solution to `output`.
///
/// # Safety
///
/// Both ranges must be reserved by the host for this call, outside any Rust
/// allocation of this module.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn abi_solve(input: usize, output: usize) -> i32 {
    if !in_bounds(input) || !in_bounds(output) {
        return STATUS_OUT_OF_BOUNDS;
    }
    // SAFETY: bounds checked above; the host reserved the range.
    let input = unsafe { read_board(input) };
    match abi::solve_bytes(&input) {
        Ok(solved) => {
            // SAFETY: as above.
            unsafe { write_board(output, solved.as_bytes()) };
            STATUS_OK
        }
        Err(status) => status,
    }
}

/// Generates a puzzle from `seed`, writing the solution to `solved` and the
/// puzzle to `puzzle`.
///
/// # Safety
///
/// Same as [`abi_solve`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn abi_generate_solved_puzzle(
    seed: u64,
    solved: usize,
    puzzle: usize,
) -> i32 {
    if !in_bounds(solved) || !in_bounds(puzzle) {
        return STATUS_OUT_OF_BOUNDS;
    }
    let generated = generator::generate(seed);
    // SAFETY: bounds checked above; the host reserved both ranges.
    unsafe {
        write_board(solved, generated.solved.as_bytes());
        write_board(puzzle, generated.puzzle.as_bytes());
    }
    STATUS_OK
}
