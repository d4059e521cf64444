//! Failure kinds of a bridge round trip.

use bridoku_core::BoardError;

/// Every way a call through the bridge can fail.
///
/// The set is closed so callers can discriminate failures by variant. The
/// allocator has always been reset by the time one of these reaches the
/// caller.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    derive_more::Display,
    derive_more::Error,
    derive_more::IsVariant,
)]
pub enum BridgeError {
    /// The board was rejected before crossing the boundary. Nothing was
    /// allocated.
    #[display("invalid input board: {_0}")]
    InvalidInput(BoardError),
    /// An entry point returned a non-zero status.
    #[display("foreign call failed with status {code}")]
    ForeignCallFailed {
        /// The status returned by the foreign module, verbatim.
        code: i32,
    },
    /// The solve entry point returned a non-zero status.
    #[display("board cannot be solved (status {code})")]
    Unsolvable {
        /// The status returned by the foreign module, verbatim.
        code: i32,
    },
    /// The allocator could not reserve the requested bytes.
    #[display("out of linear memory: requested {requested} bytes, {available} available")]
    OutOfMemory {
        /// Size of the rejected allocation.
        requested: usize,
        /// Bytes left between the cursor and the end of linear memory.
        available: usize,
    },
    /// The module could not be read, compiled, instantiated, or lacks an
    /// expected export.
    #[display("failed to load foreign module: {reason}")]
    ModuleLoadFailed {
        /// What went wrong.
        reason: String,
    },
    /// The foreign call aborted without returning a status.
    #[display("foreign call trapped: {message}")]
    Trapped {
        /// The trap description reported by the runtime.
        message: String,
    },
    /// The foreign module reported success but wrote bytes that are not a board.
    #[display("foreign module wrote an invalid board: {_0}")]
    InvalidOutput(BoardError),
    /// A memory access fell outside linear memory.
    #[display("memory access at {address}..{} is outside linear memory of {size} bytes", address + len)]
    OutOfBounds {
        /// Start offset of the access.
        address: usize,
        /// Length of the access in bytes.
        len: usize,
        /// Linear memory size at the time of the access.
        size: usize,
    },
}

impl BridgeError {
    /// Returns the foreign status code for [`ForeignCallFailed`] and
    /// [`Unsolvable`] failures.
    ///
    /// [`ForeignCallFailed`]: Self::ForeignCallFailed
    /// [`Unsolvable`]: Self::Unsolvable
    #[must_use]
    pub fn status_code(&self) -> Option<i32> {
        match self {
            Self::ForeignCallFailed { code } | Self::Unsolvable { code } => Some(*code),
            _ => None,
        }
    }

    pub(crate) fn load_failed(reason: impl Into<String>) -> Self {
        Self::ModuleLoadFailed {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            BridgeError::Unsolvable { code: 3 }.to_string(),
            "board cannot be solved (status 3)"
        );
        assert_eq!(
            BridgeError::OutOfMemory {
                requested: 81,
                available: 10
            }
            .to_string(),
            "out of linear memory: requested 81 bytes, 10 available"
        );
        assert_eq!(
            BridgeError::OutOfBounds {
                address: 65_500,
                len: 81,
                size: 65_536
            }
            .to_string(),
            "memory access at 65500..65581 is outside linear memory of 65536 bytes"
        );
    }

    #[test]
    fn test_status_code() {
        assert_eq!(BridgeError::Unsolvable { code: 2 }.status_code(), Some(2));
        assert_eq!(
            BridgeError::ForeignCallFailed { code: -1 }.status_code(),
            Some(-1)
        );
        assert_eq!(BridgeError::load_failed("x").status_code(), None);
    }

    #[test]
    fn test_board_errors_are_sources() {
        let err = BridgeError::InvalidInput(BoardError::InvalidLength { len: 3 });
        assert!(err.is_invalid_input());
        assert_eq!(
            err.source().map(ToString::to_string),
            Some("board must be 81 characters long, got 3".to_owned())
        );
    }
}
