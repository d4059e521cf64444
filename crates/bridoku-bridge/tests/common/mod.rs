//! The reference guest module run in-process.

#![allow(dead_code)]

use bridoku_bridge::{
    Bridge, BridgeError, BufferHandle, ForeignModule, LinearMemory, MemoryGrowth, VecMemory,
};
use bridoku_core::BOARD_LEN;
use bridoku_guest::abi;

pub const PUZZLE: &str =
    "53..7....6..195....98....6.8...6...34..8.3..17...2...6.6....28....419..5....8..79";
pub const SOLUTION: &str =
    "534678912672195348198342567859761423426853791713924856961537284287419635345286179";

/// A foreign module backed by the guest's entry points over a host-side memory.
#[derive(Debug, Clone)]
pub struct NativeModule {
    memory: VecMemory,
}

impl NativeModule {
    pub fn new(memory_size: usize) -> Self {
        Self {
            memory: VecMemory::new(memory_size),
        }
    }

    pub fn memory(&self) -> &VecMemory {
        &self.memory
    }
}

impl LinearMemory for NativeModule {
    fn size(&self) -> usize {
        self.memory.size()
    }

    fn grow_to(&mut self, min_size: usize) -> Result<(), BridgeError> {
        self.memory.grow_to(min_size)
    }

    fn read(&self, offset: usize, buf: &mut [u8]) -> Result<(), BridgeError> {
        self.memory.read(offset, buf)
    }

    fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), BridgeError> {
        self.memory.write(offset, data)
    }
}

impl ForeignModule for NativeModule {
    fn call_solve(&mut self, input: u32, output: u32) -> Result<i32, BridgeError> {
        let input = BufferHandle::from_abi(input, BOARD_LEN)?;
        let output = BufferHandle::from_abi(output, BOARD_LEN)?;
        Ok(abi::solve_in_memory(
            self.memory.as_mut_slice(),
            input.address(),
            output.address(),
        ))
    }

    fn call_generate(&mut self, seed: u64, solved: u32, puzzle: u32) -> Result<i32, BridgeError> {
        let solved = BufferHandle::from_abi(solved, BOARD_LEN)?;
        let puzzle = BufferHandle::from_abi(puzzle, BOARD_LEN)?;
        Ok(abi::generate_in_memory(
            self.memory.as_mut_slice(),
            seed,
            solved.address(),
            puzzle.address(),
        ))
    }
}

/// A bridge over one page of native guest memory.
pub fn native_bridge() -> Bridge<NativeModule> {
    Bridge::new(NativeModule::new(0x1_0000), MemoryGrowth::Deny)
}
