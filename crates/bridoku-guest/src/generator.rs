//! Seeded puzzle generation.
//!
//! A random complete grid is drawn first, then cells are emptied in random
//! order as long as the puzzle keeps exactly one solution. Everything is
//! driven by a PCG stream seeded from the caller's 64-bit seed, so the same
//! seed reproduces the same puzzle on every platform.

use bridoku_core::{BOARD_LEN, GeneratedPuzzle};
use rand::prelude::*;
use rand_pcg::Pcg64Mcg;

use crate::solver::{Grid, bit};

/// Generates a puzzle with a unique solution from `seed`.
///
/// # Examples
///
/// ```
/// use bridoku_guest::generator;
///
/// let generated = generator::generate(42);
/// assert!(generated.solved.is_complete());
/// assert!(generated.puzzle_matches_solution());
/// assert_eq!(generated, generator::generate(42));
/// ```
#[must_use]
pub fn generate(seed: u64) -> GeneratedPuzzle {
    let mut rng = Pcg64Mcg::seed_from_u64(seed);

    let mut grid = Grid::new();
    let filled = fill_random(&mut grid, &mut rng);
    debug_assert!(filled, "an empty grid always has a completion");
    let solved = grid.to_board();

    let mut order: Vec<usize> = (0..BOARD_LEN).collect();
    order.shuffle(&mut rng);
    for index in order {
        let value = grid.value(index);
        grid.clear(index);
        if grid.count_solutions(2) != 1 {
            grid.place(index, value);
        }
    }

    GeneratedPuzzle {
        seed,
        solved,
        puzzle: grid.to_board(),
    }
}

fn fill_random(grid: &mut Grid, rng: &mut Pcg64Mcg) -> bool {
    let Some((index, candidates)) = grid.most_constrained() else {
        return true;
    };
    let mut values: Vec<u8> = (1..=9).filter(|&v| candidates & bit(v) != 0).collect();
    values.shuffle(rng);
    for value in values {
        grid.place(index, value);
        if fill_random(grid, rng) {
            return true;
        }
        grid.clear(index);
    }
    false
}
