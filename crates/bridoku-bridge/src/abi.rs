//! The integer calling convention of the foreign module.
//!
//! Only integers cross the boundary: 32-bit offsets into the module's own
//! linear memory and a 64-bit seed. Every buffer therefore has to be reserved
//! and written before a call and may only be read after the call returned
//! [`STATUS_OK`].

use log::warn;

use crate::{BridgeError, BufferHandle, LinearMemory};

/// Name of the solve entry point: `(input: i32, output: i32) -> i32`.
pub const SOLVE_EXPORT: &str = "abi_solve";
/// Name of the generate entry point: `(seed: i64, solved: i32, puzzle: i32) -> i32`.
pub const GENERATE_EXPORT: &str = "abi_generate_solved_puzzle";
/// Name of the exported linear memory.
pub const MEMORY_EXPORT: &str = "memory";

/// The status an entry point returns on success.
pub const STATUS_OK: i32 = 0;

/// A loaded foreign module: its linear memory plus the two entry points.
///
/// Implementations only forward the call and return the raw status; turning
/// statuses into failures is done by [`call_solve`] and [`call_generate`].
pub trait ForeignModule: LinearMemory {
    /// Invokes the solve entry point.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Trapped`] if the call aborts without a status.
    fn call_solve(&mut self, input: u32, output: u32) -> Result<i32, BridgeError>;

    /// Invokes the generate entry point.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Trapped`] if the call aborts without a status.
    fn call_generate(&mut self, seed: u64, solved: u32, puzzle: u32) -> Result<i32, BridgeError>;
}

/// Calls the solve entry point with two prepared buffers.
///
/// # Errors
///
/// Returns [`BridgeError::ForeignCallFailed`] carrying any non-zero status,
/// or the error of the call itself.
pub fn call_solve<M>(
    module: &mut M,
    input: BufferHandle,
    output: BufferHandle,
) -> Result<(), BridgeError>
where
    M: ForeignModule + ?Sized,
{
    let status = module.call_solve(input.abi_address()?, output.abi_address()?)?;
    check_status(SOLVE_EXPORT, status)
}

/// Calls the generate entry point with a seed and two prepared buffers.
///
/// # Errors
///
/// Returns [`BridgeError::ForeignCallFailed`] carrying any non-zero status,
/// or the error of the call itself.
pub fn call_generate<M>(
    module: &mut M,
    seed: u64,
    solved: BufferHandle,
    puzzle: BufferHandle,
) -> Result<(), BridgeError>
where
    M: ForeignModule + ?Sized,
{
    let status = module.call_generate(seed, solved.abi_address()?, puzzle.abi_address()?)?;
    check_status(GENERATE_EXPORT, status)
}

fn check_status(entry_point: &str, status: i32) -> Result<(), BridgeError> {
    if status == STATUS_OK {
        Ok(())
    } else {
        warn!("{entry_point} returned status {status}");
        Err(BridgeError::ForeignCallFailed { code: status })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Call, ScriptedModule};

    #[test]
    fn test_status_passed_through_verbatim() {
        let mut module = ScriptedModule::new(256).with_statuses([0, 7, -2]);
        let input = BufferHandle::new(0, 81);
        let output = BufferHandle::new(81, 81);

        assert_eq!(call_solve(&mut module, input, output), Ok(()));
        assert_eq!(
            call_solve(&mut module, input, output),
            Err(BridgeError::ForeignCallFailed { code: 7 })
        );
        assert_eq!(
            call_generate(&mut module, 5, input, output),
            Err(BridgeError::ForeignCallFailed { code: -2 })
        );
        assert_eq!(
            module.calls(),
            [
                Call::Solve {
                    input: 0,
                    output: 81
                },
                Call::Solve {
                    input: 0,
                    output: 81
                },
                Call::Generate {
                    seed: 5,
                    solved: 0,
                    puzzle: 81
                },
            ]
        );
    }
}
