//! The public façade: one safe round trip per call.

use std::{
    ops::{Deref, DerefMut},
    path::Path,
};

use bridoku_core::{BOARD_LEN, Board, GeneratedPuzzle};
use log::debug;

use crate::{
    BridgeConfig, BridgeError, BumpAllocator, ForeignModule, MemoryGrowth, WasmModule, abi,
};

/// A loaded foreign module together with the allocator over its memory.
///
/// Every call allocates its buffers, invokes one entry point, decodes the
/// output, and resets the allocator, whatever the outcome. Calls take
/// `&mut self`, so at most one round trip is in flight per bridge.
///
/// # Examples
///
/// ```
/// use bridoku_bridge::{Bridge, MemoryGrowth, testing::ScriptedModule};
///
/// let solved = "534678912672195348198342567859761423426853791713924856961537284287419635345286179";
/// // the scripted module echoes its input on success
/// let mut bridge = Bridge::new(ScriptedModule::new(256), MemoryGrowth::Deny);
/// assert_eq!(bridge.solve(solved)?.to_string(), solved);
/// assert_eq!(bridge.allocator().cursor(), 0);
/// # Ok::<(), bridoku_bridge::BridgeError>(())
/// ```
#[derive(Debug)]
pub struct Bridge<M> {
    module: M,
    allocator: BumpAllocator,
}

impl Bridge<WasmModule> {
    /// Loads a WebAssembly module from its bytes.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::ModuleLoadFailed`] if the module cannot be
    /// compiled or instantiated, or lacks an expected export.
    pub fn load(bytes: &[u8], config: &BridgeConfig) -> Result<Self, BridgeError> {
        let module = WasmModule::load(bytes, config)?;
        Ok(Self::new(module, config.memory_growth))
    }

    /// Loads a WebAssembly module from a file.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::ModuleLoadFailed`] if the file cannot be read
    /// or the module cannot be loaded.
    pub fn load_file(path: impl AsRef<Path>, config: &BridgeConfig) -> Result<Self, BridgeError> {
        let module = WasmModule::load_file(path, config)?;
        Ok(Self::new(module, config.memory_growth))
    }
}

impl<M> Bridge<M>
where
    M: ForeignModule,
{
    /// Wraps a loaded module with a fresh allocator.
    #[must_use]
    pub const fn new(module: M, growth: MemoryGrowth) -> Self {
        Self {
            module,
            allocator: BumpAllocator::new(growth),
        }
    }

    /// Returns the allocator. Outside of a call its cursor is always zero.
    #[must_use]
    pub const fn allocator(&self) -> &BumpAllocator {
        &self.allocator
    }

    /// Returns the wrapped module.
    #[must_use]
    pub const fn module(&self) -> &M {
        &self.module
    }

    /// Returns the wrapped module mutably.
    pub const fn module_mut(&mut self) -> &mut M {
        &mut self.module
    }

    /// Unwraps the bridge, returning the module.
    #[must_use]
    pub fn into_inner(self) -> M {
        self.module
    }

    /// Solves a board given in its 81-character text form.
    ///
    /// The text is validated before anything is allocated.
    ///
    /// # Errors
    ///
    /// - [`BridgeError::InvalidInput`] if `board` is not 81 characters of
    ///   `'1'..='9'` and `'.'`
    /// - [`BridgeError::Unsolvable`] if the module returns a non-zero status
    /// - any other failure of the round trip
    pub fn solve(&mut self, board: &str) -> Result<Board, BridgeError> {
        let board = board.parse::<Board>().map_err(BridgeError::InvalidInput)?;
        self.solve_board(&board)
    }

    /// Solves an already parsed board.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Unsolvable`] if the module returns a non-zero
    /// status, or any other failure of the round trip.
    pub fn solve_board(&mut self, board: &Board) -> Result<Board, BridgeError> {
        let Self { module, allocator } = self;
        let mut allocator = ResetOnDrop(allocator);

        let input = allocator.allocate(module, BOARD_LEN)?;
        let output = allocator.allocate(module, BOARD_LEN)?;
        input.write(module, board.as_bytes())?;

        debug!(
            "solve: input at {}, output at {}",
            input.address(),
            output.address()
        );
        abi::call_solve(module, input, output).map_err(|err| match err {
            BridgeError::ForeignCallFailed { code } => BridgeError::Unsolvable { code },
            err => err,
        })?;
        output.read_board(&*module)
    }

    /// Asks the module for a solved board and a puzzle derived from `seed`.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::ForeignCallFailed`] if the module returns a
    /// non-zero status, or any other failure of the round trip.
    pub fn generate_puzzle(&mut self, seed: u64) -> Result<GeneratedPuzzle, BridgeError> {
        let Self { module, allocator } = self;
        let mut allocator = ResetOnDrop(allocator);

        let solved = allocator.allocate(module, BOARD_LEN)?;
        let puzzle = allocator.allocate(module, BOARD_LEN)?;

        debug!(
            "generate: seed {seed}, solved at {}, puzzle at {}",
            solved.address(),
            puzzle.address()
        );
        abi::call_generate(module, seed, solved, puzzle)?;
        Ok(GeneratedPuzzle {
            seed,
            solved: solved.read_board(&*module)?,
            puzzle: puzzle.read_board(&*module)?,
        })
    }
}

/// Resets the borrowed allocator when the round trip ends, on every path.
struct ResetOnDrop<'a>(&'a mut BumpAllocator);

impl Deref for ResetOnDrop<'_> {
    type Target = BumpAllocator;

    fn deref(&self) -> &Self::Target {
        self.0
    }
}

impl DerefMut for ResetOnDrop<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.0
    }
}

impl Drop for ResetOnDrop<'_> {
    fn drop(&mut self) {
        self.0.reset_all();
    }
}
