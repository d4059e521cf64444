//! Byte-addressed linear memory.
//!
//! [`LinearMemory`] is what the bridge needs from a foreign module's memory:
//! a size, bounds-checked reads and writes at byte offsets, and optional
//! growth. [`VecMemory`] is a host-owned implementation used by in-process
//! modules.

use crate::BridgeError;

/// Size of a WebAssembly page in bytes.
pub const WASM_PAGE_SIZE: usize = 0x1_0000;

/// Bytes addressable through a 32-bit ABI pointer.
pub const ADDRESS_SPACE: u64 = 1 << 32;

/// A flat, byte-addressable memory owned by one foreign module instance.
///
/// Offsets are only meaningful for the instance that owns the memory.
/// Growing never moves or clears existing bytes.
pub trait LinearMemory {
    /// Returns the current size in bytes.
    fn size(&self) -> usize;

    /// Grows the memory so that at least `min_size` bytes are addressable.
    ///
    /// Does nothing if the memory is already large enough.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::OutOfMemory`] if the memory cannot grow that far.
    fn grow_to(&mut self, min_size: usize) -> Result<(), BridgeError>;

    /// Copies `buf.len()` bytes starting at `offset` into `buf`.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::OutOfBounds`] if the range exceeds the memory.
    fn read(&self, offset: usize, buf: &mut [u8]) -> Result<(), BridgeError>;

    /// Copies `data` into memory starting at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::OutOfBounds`] if the range exceeds the memory.
    fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), BridgeError>;
}

/// A linear memory backed by a host-side `Vec<u8>`.
///
/// # Examples
///
/// ```
/// use bridoku_bridge::{LinearMemory, VecMemory};
///
/// let mut memory = VecMemory::new(16);
/// memory.write(4, b"abc")?;
/// let mut buf = [0; 3];
/// memory.read(4, &mut buf)?;
/// assert_eq!(&buf, b"abc");
/// assert!(memory.write(15, b"xy").is_err());
/// # Ok::<(), bridoku_bridge::BridgeError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VecMemory {
    bytes: Vec<u8>,
    max_size: Option<usize>,
}

impl VecMemory {
    /// Creates a zeroed memory of `size` bytes with unbounded growth.
    #[must_use]
    pub fn new(size: usize) -> Self {
        Self {
            bytes: vec![0; size],
            max_size: None,
        }
    }

    /// Caps the size this memory may grow to.
    #[must_use]
    pub fn with_max_size(mut self, max_size: usize) -> Self {
        self.max_size = Some(max_size);
        self
    }

    /// Returns the whole memory.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the whole memory mutably.
    #[must_use]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    fn range(&self, offset: usize, len: usize) -> Result<std::ops::Range<usize>, BridgeError> {
        offset
            .checked_add(len)
            .filter(|&end| end <= self.bytes.len())
            .map(|end| offset..end)
            .ok_or(BridgeError::OutOfBounds {
                address: offset,
                len,
                size: self.bytes.len(),
            })
    }
}

impl LinearMemory for VecMemory {
    fn size(&self) -> usize {
        self.bytes.len()
    }

    fn grow_to(&mut self, min_size: usize) -> Result<(), BridgeError> {
        let size = self.bytes.len();
        if min_size <= size {
            return Ok(());
        }
        if self.max_size.is_some_and(|max| min_size > max) {
            return Err(BridgeError::OutOfMemory {
                requested: min_size - size,
                available: self.max_size.unwrap_or(size).saturating_sub(size),
            });
        }
        self.bytes.resize(min_size, 0);
        Ok(())
    }

    fn read(&self, offset: usize, buf: &mut [u8]) -> Result<(), BridgeError> {
        let range = self.range(offset, buf.len())?;
        buf.copy_from_slice(&self.bytes[range]);
        Ok(())
    }

    fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), BridgeError> {
        let range = self.range(offset, data.len())?;
        self.bytes[range].copy_from_slice(data);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_write_bounds() {
        let mut memory = VecMemory::new(8);
        memory.write(0, b"12345678").unwrap();
        assert_eq!(memory.as_slice(), b"12345678");

        let mut buf = [0; 2];
        memory.read(6, &mut buf).unwrap();
        assert_eq!(&buf, b"78");

        assert_eq!(
            memory.read(7, &mut buf),
            Err(BridgeError::OutOfBounds {
                address: 7,
                len: 2,
                size: 8
            })
        );
        assert!(memory.write(usize::MAX, b"x").is_err());
        // empty accesses at the end are fine
        memory.write(8, b"").unwrap();
    }

    #[test]
    fn test_grow_preserves_bytes() {
        let mut memory = VecMemory::new(4);
        memory.write(0, b"abcd").unwrap();
        memory.grow_to(10).unwrap();
        assert_eq!(memory.size(), 10);
        assert_eq!(&memory.as_slice()[..4], b"abcd");
        assert!(memory.as_slice()[4..].iter().all(|&b| b == 0));

        memory.grow_to(2).unwrap();
        assert_eq!(memory.size(), 10);
    }

    #[test]
    fn test_grow_respects_max_size() {
        let mut memory = VecMemory::new(4).with_max_size(6);
        memory.grow_to(6).unwrap();
        assert_eq!(
            memory.grow_to(7),
            Err(BridgeError::OutOfMemory {
                requested: 1,
                available: 0
            })
        );
        assert_eq!(memory.size(), 6);
    }
}
