//! Reference guest module for the Bridoku host.
//!
//! This crate plays the part of the externally compiled sudoku module: it
//! owns the puzzle logic and exposes it only through the byte-addressed ABI
//! the host speaks.
//!
//! - [`solver`]: bitmask backtracking solver with solution counting
//! - [`generator`]: seeded generator producing a unique-solution puzzle
//! - [`abi`]: the status-code entry points working on a linear memory slice
//!
//! Built for `wasm32`, the crate exports `memory`, `abi_solve` and
//! `abi_generate_solved_puzzle` and imports nothing. Built natively, the same
//! [`abi`] functions back the host's in-process test module.

pub mod abi;
pub mod generator;
pub mod solver;

#[cfg(target_arch = "wasm32")]
mod exports;
