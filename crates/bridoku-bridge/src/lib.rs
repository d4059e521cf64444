//! Host-side bridge to a compiled sudoku module.
//!
//! The sudoku logic lives in a foreign module that only understands integers:
//! byte offsets into its own linear memory and a seed. This crate moves
//! boards across that boundary. For each call it reserves buffers in the
//! module's memory, writes the board text, invokes an entry point, checks
//! the returned status, decodes the output, and then releases every buffer
//! at once.
//!
//! # Overview
//!
//! - [`memory`]: [`LinearMemory`], the byte-addressed memory of one module
//! - [`allocator`]: [`BumpAllocator`], per-call buffer reservation
//! - [`buffer`]: [`BufferHandle`], an `(address, len)` range with board I/O
//! - [`abi`]: [`ForeignModule`], the entry points and their status handling
//! - [`bridge`]: [`Bridge`], the façade used by callers
//! - [`wasm`]: [`WasmModule`], a WebAssembly module run with wasmtime
//! - [`config`]: [`BridgeConfig`], growth policy and runtime limits
//! - [`testing`]: a scripted module for exercising failure paths
//!
//! # Examples
//!
//! ```no_run
//! use bridoku_bridge::{Bridge, BridgeConfig};
//!
//! let mut bridge = Bridge::load_file("sudoku.wasm", &BridgeConfig::default())?;
//! let generated = bridge.generate_puzzle(42)?;
//! assert_eq!(bridge.solve_board(&generated.puzzle)?, generated.solved);
//! # Ok::<(), bridoku_bridge::BridgeError>(())
//! ```

pub mod abi;
pub mod allocator;
pub mod bridge;
pub mod buffer;
pub mod config;
pub mod error;
pub mod memory;
pub mod testing;
pub mod wasm;

pub use self::{
    abi::ForeignModule,
    allocator::BumpAllocator,
    bridge::Bridge,
    buffer::BufferHandle,
    config::{BridgeConfig, ConfigError, MemoryGrowth},
    error::BridgeError,
    memory::{LinearMemory, VecMemory},
    wasm::WasmModule,
};
