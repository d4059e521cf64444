//! A scripted foreign module for tests.
//!
//! [`ScriptedModule`] answers each entry-point call with the next reply from
//! a script, records the call, and writes canned outputs on success. It lets
//! tests drive the bridge through failure paths that a real module would only
//! reach with carefully crafted input.
//!
//! # Example
//!
//! ```
//! use bridoku_bridge::{Bridge, BridgeError, MemoryGrowth, testing::ScriptedModule};
//!
//! let module = ScriptedModule::new(1024).with_statuses([4]);
//! let mut bridge = Bridge::new(module, MemoryGrowth::Deny);
//!
//! let err = bridge.solve(&".".repeat(81)).unwrap_err();
//! assert_eq!(err, BridgeError::Unsolvable { code: 4 });
//! assert_eq!(bridge.allocator().cursor(), 0);
//! ```

use std::collections::VecDeque;

use bridoku_core::BOARD_LEN;

use crate::{BridgeError, BufferHandle, ForeignModule, LinearMemory, VecMemory};

/// An entry-point call observed by a [`ScriptedModule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    /// A call to the solve entry point.
    Solve {
        /// Input buffer address.
        input: u32,
        /// Output buffer address.
        output: u32,
    },
    /// A call to the generate entry point.
    Generate {
        /// Seed argument.
        seed: u64,
        /// Solved-board buffer address.
        solved: u32,
        /// Puzzle buffer address.
        puzzle: u32,
    },
}

#[derive(Debug, Clone)]
enum Reply {
    Status(i32),
    Trap(String),
}

/// A foreign module whose replies are scripted.
///
/// Replies are consumed in order; once the script is exhausted every call
/// returns status 0. On status 0 the solve entry point writes the canned
/// solve output, or echoes its input when none is set, and the generate
/// entry point writes the canned generate outputs if any.
#[derive(Debug, Clone)]
pub struct ScriptedModule {
    memory: VecMemory,
    replies: VecDeque<Reply>,
    solve_output: Option<Vec<u8>>,
    generate_output: Option<(Vec<u8>, Vec<u8>)>,
    calls: Vec<Call>,
}

impl ScriptedModule {
    /// Creates a module with `memory_size` bytes of zeroed memory.
    #[must_use]
    pub fn new(memory_size: usize) -> Self {
        Self::with_memory(VecMemory::new(memory_size))
    }

    /// Creates a module over an existing memory.
    #[must_use]
    pub fn with_memory(memory: VecMemory) -> Self {
        Self {
            memory,
            replies: VecDeque::new(),
            solve_output: None,
            generate_output: None,
            calls: Vec::new(),
        }
    }

    /// Appends status replies to the script.
    #[must_use]
    pub fn with_statuses(mut self, statuses: impl IntoIterator<Item = i32>) -> Self {
        self.replies.extend(statuses.into_iter().map(Reply::Status));
        self
    }

    /// Appends a trap to the script.
    #[must_use]
    pub fn with_trap(mut self, message: impl Into<String>) -> Self {
        self.replies.push_back(Reply::Trap(message.into()));
        self
    }

    /// Sets the bytes the solve entry point writes on success.
    #[must_use]
    pub fn with_solve_output(mut self, output: impl Into<Vec<u8>>) -> Self {
        self.solve_output = Some(output.into());
        self
    }

    /// Sets the bytes the generate entry point writes on success.
    #[must_use]
    pub fn with_generate_output(
        mut self,
        solved: impl Into<Vec<u8>>,
        puzzle: impl Into<Vec<u8>>,
    ) -> Self {
        self.generate_output = Some((solved.into(), puzzle.into()));
        self
    }

    /// Returns every call observed so far.
    #[must_use]
    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    /// Returns the module's memory.
    #[must_use]
    pub fn memory(&self) -> &VecMemory {
        &self.memory
    }

    fn next_status(&mut self) -> Result<i32, BridgeError> {
        match self.replies.pop_front() {
            None => Ok(0),
            Some(Reply::Status(status)) => Ok(status),
            Some(Reply::Trap(message)) => Err(BridgeError::Trapped { message }),
        }
    }
}

impl LinearMemory for ScriptedModule {
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

impl ForeignModule for ScriptedModule {
    fn call_solve(&mut self, input: u32, output: u32) -> Result<i32, BridgeError> {
        self.calls.push(Call::Solve { input, output });
        let status = self.next_status()?;
        if status == 0 {
            let input = BufferHandle::from_abi(input, BOARD_LEN)?;
            let output = BufferHandle::from_abi(output, BOARD_LEN)?;
            let bytes = match &self.solve_output {
                Some(bytes) => bytes.clone(),
                None => input.read(&self.memory)?,
            };
            output.write(&mut self.memory, &bytes)?;
        }
        Ok(status)
    }

    fn call_generate(&mut self, seed: u64, solved: u32, puzzle: u32) -> Result<i32, BridgeError> {
        self.calls.push(Call::Generate {
            seed,
            solved,
            puzzle,
        });
        let status = self.next_status()?;
        if status == 0 {
            if let Some((solved_bytes, puzzle_bytes)) = &self.generate_output {
                BufferHandle::from_abi(solved, BOARD_LEN)?.write(&mut self.memory, solved_bytes)?;
                BufferHandle::from_abi(puzzle, BOARD_LEN)?.write(&mut self.memory, puzzle_bytes)?;
            }
        }
        Ok(status)
    }
}
