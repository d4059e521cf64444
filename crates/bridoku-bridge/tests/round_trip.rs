//! Round trips through the bridge into the reference guest module.

mod common;

use bridoku_bridge::{BridgeError, LinearMemory as _};
use bridoku_core::{Board, BoardError};
use proptest::prelude::*;

use self::common::{PUZZLE, SOLUTION, native_bridge};

#[test]
fn test_solves_canonical_puzzle() {
    let mut bridge = native_bridge();
    let solved = bridge.solve(PUZZLE).unwrap();
    assert_eq!(solved.to_string(), SOLUTION);
    assert_eq!(bridge.solve(SOLUTION).unwrap(), solved);
    assert_eq!(bridge.allocator().cursor(), 0);
}

#[test]
fn test_row_conflict_is_unsolvable() {
    let mut bridge = native_bridge();
    let board = format!("11{}", ".".repeat(79));
    let err = bridge.solve(&board).unwrap_err();
    assert!(err.is_unsolvable(), "unexpected error: {err}");
    assert_eq!(err.status_code(), Some(bridoku_guest::abi::STATUS_UNSOLVABLE));
    assert_eq!(bridge.allocator().cursor(), 0);
}

#[test]
fn test_wrong_length_crosses_nothing() {
    let mut bridge = native_bridge();
    for len in [0, 80, 82, 162] {
        let board = ".".repeat(len);
        assert_eq!(
            bridge.solve(&board),
            Err(BridgeError::InvalidInput(BoardError::InvalidLength { len }))
        );
    }
    assert!(bridge.module().memory().as_slice().iter().all(|&b| b == 0));
}

#[test]
fn test_fresh_allocation_after_call_starts_at_zero() {
    let mut bridge = native_bridge();
    bridge.solve(PUZZLE).unwrap();
    let _ = bridge.solve("11");
    let _ = bridge.solve(&format!("99{}", ".".repeat(79)));
    bridge.generate_puzzle(3).unwrap();

    let mut allocator = bridge.allocator().clone();
    let handle = allocator.allocate(bridge.module_mut(), 81).unwrap();
    assert_eq!(handle.address(), 0);
}

#[test]
fn test_memory_exhaustion_reported() {
    let mut bridge = bridoku_bridge::Bridge::new(
        common::NativeModule::new(120),
        bridoku_bridge::MemoryGrowth::Deny,
    );
    assert!(bridge.solve(PUZZLE).unwrap_err().is_out_of_memory());
    assert!(bridge.generate_puzzle(1).unwrap_err().is_out_of_memory());
    assert_eq!(bridge.module().size(), 120);
    assert_eq!(bridge.allocator().cursor(), 0);
}

#[test]
fn test_different_seeds_give_different_puzzles() {
    let mut bridge = native_bridge();
    let a = bridge.generate_puzzle(1).unwrap();
    let b = bridge.generate_puzzle(2).unwrap();
    assert_ne!(a.puzzle, b.puzzle);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn test_generation_is_deterministic(seed in any::<u64>()) {
        let mut bridge = native_bridge();
        let first = bridge.generate_puzzle(seed).unwrap();
        let second = bridge.generate_puzzle(seed).unwrap();
        prop_assert_eq!(first, second);
        prop_assert_eq!(first, bridoku_guest::generator::generate(seed));
    }

    #[test]
    fn test_puzzle_solves_to_its_solution(seed in any::<u64>()) {
        let mut bridge = native_bridge();
        let generated = bridge.generate_puzzle(seed).unwrap();
        prop_assert!(generated.puzzle_matches_solution());
        prop_assert_eq!(bridge.solve_board(&generated.puzzle).unwrap(), generated.solved);
        prop_assert_eq!(bridge.allocator().cursor(), 0);
    }

    #[test]
    fn test_solved_board_is_fixed_point(seed in any::<u64>()) {
        let mut bridge = native_bridge();
        let solved: Board = bridge.generate_puzzle(seed).unwrap().solved;
        prop_assert_eq!(bridge.solve(&solved.to_string()).unwrap(), solved);
    }
}
