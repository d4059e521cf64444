//! Monotonic allocation over linear memory.
//!
//! Calls into the foreign module are strictly request/response: a couple of
//! fixed-size buffers are reserved right before a call and abandoned right
//! after it. A cursor that only moves forward and is reset wholesale after
//! each round trip covers that pattern without free lists, fragmentation, or
//! leaks.

use log::trace;

use crate::{BridgeError, BufferHandle, LinearMemory, MemoryGrowth, memory::ADDRESS_SPACE};

/// A bump allocator over one foreign module's linear memory.
///
/// Handles issued between two resets never overlap. [`reset_all`] sets the
/// cursor back to zero and thereby invalidates every handle issued since the
/// previous reset.
///
/// # Examples
///
/// ```
/// use bridoku_bridge::{BumpAllocator, MemoryGrowth, VecMemory};
///
/// let mut memory = VecMemory::new(256);
/// let mut allocator = BumpAllocator::new(MemoryGrowth::Deny);
///
/// let input = allocator.allocate(&mut memory, 81)?;
/// let output = allocator.allocate(&mut memory, 81)?;
/// assert_eq!((input.address(), output.address()), (0, 81));
///
/// allocator.reset_all();
/// assert_eq!(allocator.allocate(&mut memory, 1)?.address(), 0);
/// # Ok::<(), bridoku_bridge::BridgeError>(())
/// ```
///
/// [`reset_all`]: Self::reset_all
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BumpAllocator {
    cursor: usize,
    growth: MemoryGrowth,
}

impl BumpAllocator {
    /// Creates an allocator with its cursor at zero.
    #[must_use]
    pub const fn new(growth: MemoryGrowth) -> Self {
        Self { cursor: 0, growth }
    }

    /// Returns the next free offset, which is also the high-water mark of
    /// the current round trip.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Returns the growth policy applied when memory runs out.
    #[must_use]
    pub const fn growth(&self) -> MemoryGrowth {
        self.growth
    }

    /// Reserves `len` contiguous bytes at the cursor.
    ///
    /// When the request runs past the end of `memory`, the memory is grown if
    /// the policy is [`MemoryGrowth::Allow`]. Growth keeps existing bytes in
    /// place, so handles issued earlier in the same round trip stay valid.
    /// A failed request leaves the cursor where it was.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::OutOfMemory`] if the request does not fit and
    /// growth is denied or fails, or if it would run past the 32-bit address
    /// space.
    pub fn allocate<M>(&mut self, memory: &mut M, len: usize) -> Result<BufferHandle, BridgeError>
    where
        M: LinearMemory + ?Sized,
    {
        let out_of_memory = |memory: &M| BridgeError::OutOfMemory {
            requested: len,
            available: memory.size().saturating_sub(self.cursor),
        };

        let end = self
            .cursor
            .checked_add(len)
            .filter(|&end| u64::try_from(end).is_ok_and(|end| end <= ADDRESS_SPACE))
            .ok_or_else(|| out_of_memory(memory))?;

        if end > memory.size() {
            match self.growth {
                MemoryGrowth::Deny => return Err(out_of_memory(memory)),
                MemoryGrowth::Allow => {
                    trace!("growing linear memory from {} to {end} bytes", memory.size());
                    memory.grow_to(end).map_err(|_| out_of_memory(memory))?;
                }
            }
        }

        let handle = BufferHandle::new(self.cursor, len);
        self.cursor = end;
        trace!("allocated {len} bytes at {}", handle.address());
        Ok(handle)
    }

    /// Moves the cursor back to zero, invalidating all issued handles.
    pub fn reset_all(&mut self) {
        self.cursor = 0;
    }
}
