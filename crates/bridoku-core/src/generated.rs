//! Seeded puzzle generation results.

use crate::Board;

/// A puzzle and its unique solution, as produced by a guest module from a seed.
///
/// The same seed always yields the same pair from the same module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GeneratedPuzzle {
    /// The seed passed to the generator.
    pub seed: u64,
    /// The fully solved grid.
    pub solved: Board,
    /// The puzzle: `solved` with some cells emptied.
    pub puzzle: Board,
}

impl GeneratedPuzzle {
    /// Returns `true` if every filled cell of the puzzle agrees with the solution.
    ///
    /// ```
    /// use bridoku_core::{Board, Digit, GeneratedPuzzle};
    ///
    /// let solved = Board::EMPTY.with_cell(0, Some(Digit::D1));
    /// let generated = GeneratedPuzzle { seed: 0, solved, puzzle: Board::EMPTY };
    /// assert!(generated.puzzle_matches_solution());
    /// ```
    #[must_use]
    pub fn puzzle_matches_solution(&self) -> bool {
        self.puzzle
            .cells()
            .zip(self.solved.cells())
            .all(|(given, solved)| given.is_none() || given == solved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Digit;

    #[test]
    fn test_puzzle_matches_solution() {
        let solved = Board::EMPTY
            .with_cell(0, Some(Digit::D1))
            .with_cell(1, Some(Digit::D2));
        let puzzle = Board::EMPTY.with_cell(1, Some(Digit::D2));
        let generated = GeneratedPuzzle {
            seed: 1,
            solved,
            puzzle,
        };
        assert!(generated.puzzle_matches_solution());

        let wrong = GeneratedPuzzle {
            puzzle: Board::EMPTY.with_cell(1, Some(Digit::D3)),
            ..generated
        };
        assert!(!wrong.puzzle_matches_solution());
    }
}
