//! Fixed-size byte ranges in linear memory.

use std::ops::Range;

use bridoku_core::Board;

use crate::{BridgeError, LinearMemory, memory::ADDRESS_SPACE};

/// An `(address, len)` range handed out by the
/// [`BumpAllocator`](crate::BumpAllocator).
///
/// A handle has no lifetime of its own: it stays meaningful only until the
/// allocator that issued it is reset. The bridge never keeps one past the
/// round trip it was allocated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferHandle {
    address: usize,
    len: usize,
}

impl BufferHandle {
    pub(crate) const fn new(address: usize, len: usize) -> Self {
        Self { address, len }
    }

    /// Returns the start offset in linear memory.
    #[must_use]
    pub const fn address(&self) -> usize {
        self.address
    }

    /// Returns the length in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` for a zero-length handle.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the covered byte range.
    #[must_use]
    pub const fn range(&self) -> Range<usize> {
        self.address..self.address + self.len
    }

    /// Returns the address as the 32-bit pointer passed across the ABI.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::OutOfBounds`] if the address does not fit a
    /// 32-bit address space.
    pub fn abi_address(&self) -> Result<u32, BridgeError> {
        u32::try_from(self.address).map_err(|_| BridgeError::OutOfBounds {
            address: self.address,
            len: self.len,
            size: usize::try_from(ADDRESS_SPACE).unwrap_or(usize::MAX),
        })
    }

    /// Rebuilds a handle from a 32-bit pointer received across the ABI.
    ///
    /// This is the module-side counterpart of [`abi_address`](Self::abi_address),
    /// for [`ForeignModule`](crate::ForeignModule) implementations that run
    /// in-process.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::OutOfBounds`] if the address does not fit in
    /// `usize` on this host.
    pub fn from_abi(address: u32, len: usize) -> Result<Self, BridgeError> {
        usize::try_from(address)
            .map(|address| Self::new(address, len))
            .map_err(|_| BridgeError::OutOfBounds {
                address: usize::MAX,
                len,
                size: usize::MAX,
            })
    }

    /// Writes `bytes` into the handle's range.
    ///
    /// Nothing is truncated or padded.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::OutOfBounds`] if the memory no longer covers the
    /// range.
    ///
    /// # Panics
    ///
    /// Panics if `bytes.len()` differs from the handle length.
    pub fn write<M>(&self, memory: &mut M, bytes: &[u8]) -> Result<(), BridgeError>
    where
        M: LinearMemory + ?Sized,
    {
        assert_eq!(
            bytes.len(),
            self.len,
            "buffer write must supply exactly {} bytes",
            self.len
        );
        memory.write(self.address, bytes)
    }

    /// Reads the bytes in the handle's range.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::OutOfBounds`] if the memory no longer covers the
    /// range.
    pub fn read<M>(&self, memory: &M) -> Result<Vec<u8>, BridgeError>
    where
        M: LinearMemory + ?Sized,
    {
        let mut bytes = vec![0; self.len];
        memory.read(self.address, &mut bytes)?;
        Ok(bytes)
    }

    /// Reads the range and decodes it as a board.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::InvalidOutput`] if the bytes are not a board, or
    /// any error of [`read`](Self::read).
    pub fn read_board<M>(&self, memory: &M) -> Result<Board, BridgeError>
    where
        M: LinearMemory + ?Sized,
    {
        let bytes = self.read(memory)?;
        Board::from_bytes(&bytes).map_err(BridgeError::InvalidOutput)
    }
}

#[cfg(test)]
mod tests {
    use bridoku_core::BoardError;

    use super::*;
    use crate::VecMemory;

    #[test]
    fn test_write_stays_in_range() {
        let mut memory = VecMemory::new(8);
        let handle = BufferHandle::new(2, 3);
        handle.write(&mut memory, b"xyz").unwrap();
        assert_eq!(memory.as_slice(), b"\0\0xyz\0\0\0");
        assert_eq!(handle.read(&memory).unwrap(), b"xyz");
        assert_eq!(handle.range(), 2..5);
    }

    #[test]
    #[should_panic(expected = "buffer write must supply exactly 3 bytes")]
    fn test_write_rejects_short_input() {
        let mut memory = VecMemory::new(8);
        BufferHandle::new(0, 3).write(&mut memory, b"xy").unwrap();
    }

    #[test]
    fn test_read_board() {
        let mut memory = VecMemory::new(100);
        let handle = BufferHandle::new(10, 81);
        handle.write(&mut memory, &[b'.'; 81]).unwrap();
        assert_eq!(handle.read_board(&memory).unwrap(), Board::EMPTY);

        memory.as_mut_slice()[50] = b'0';
        assert_eq!(
            handle.read_board(&memory),
            Err(BridgeError::InvalidOutput(BoardError::InvalidCharacter {
                index: 40,
                byte: b'0'
            }))
        );
    }

    #[test]
    fn test_abi_address() {
        assert_eq!(BufferHandle::new(81, 81).abi_address(), Ok(81));
        assert_eq!(
            BufferHandle::from_abi(u32::MAX, 81),
            Ok(BufferHandle::new(usize::try_from(u32::MAX).unwrap(), 81))
        );
        let handle = BufferHandle::from_abi(162, 81).unwrap();
        assert_eq!(handle.range(), 162..243);
        assert_eq!(handle.abi_address(), Ok(162));
        #[cfg(target_pointer_width = "64")]
        assert!(BufferHandle::new(1 << 32, 1).abi_address().is_err());
    }
}
