//! Foreign modules compiled to WebAssembly, run with wasmtime.
//!
//! A module is instantiated with no imports, so it gets no capabilities
//! beyond its own linear memory. It must export:
//!
//! - `memory`: its linear memory
//! - `abi_solve(input: i32, output: i32) -> i32`
//! - `abi_generate_solved_puzzle(seed: i64, solved: i32, puzzle: i32) -> i32`

use std::path::Path;

use log::{debug, info};
use sha2::{Digest as _, Sha256};
use wasmtime::{
    Engine, Instance, Memory, Module, Store, StoreLimits, StoreLimitsBuilder, TypedFunc,
};

use crate::{
    BridgeConfig, BridgeError, ForeignModule, LinearMemory,
    abi::{GENERATE_EXPORT, MEMORY_EXPORT, SOLVE_EXPORT},
    memory::{ADDRESS_SPACE, WASM_PAGE_SIZE},
};

struct ModuleState {
    limits: StoreLimits,
}

/// A live wasmtime instance of a foreign module.
pub struct WasmModule {
    store: Store<ModuleState>,
    memory: Memory,
    solve: TypedFunc<(i32, i32), i32>,
    generate: TypedFunc<(i64, i32, i32), i32>,
    fuel: Option<u64>,
    max_memory: Option<usize>,
    digest: String,
}

impl std::fmt::Debug for WasmModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WasmModule")
            .field("memory_size", &self.size())
            .field("fuel", &self.fuel)
            .field("digest", &self.digest)
            .finish_non_exhaustive()
    }
}

impl WasmModule {
    /// Compiles and instantiates a module from its bytes (binary or text format).
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::ModuleLoadFailed`] if the bytes do not compile,
    /// the module needs imports, or an export is missing or has the wrong
    /// signature.
    pub fn load(bytes: &[u8], config: &BridgeConfig) -> Result<Self, BridgeError> {
        let digest = format!("{:x}", Sha256::digest(bytes));
        info!(
            "loading foreign module ({} bytes, sha256 {digest})",
            bytes.len()
        );

        let mut engine_config = wasmtime::Config::new();
        engine_config.consume_fuel(config.fuel.is_some());
        let engine = Engine::new(&engine_config)
            .map_err(|e| BridgeError::load_failed(format!("failed to create engine: {e}")))?;

        let module = Module::new(&engine, bytes)
            .map_err(|e| BridgeError::load_failed(format!("failed to compile module: {e}")))?;

        let max_memory = config
            .max_memory_bytes
            .map(|max| usize::try_from(max).unwrap_or(usize::MAX));
        let mut limits = StoreLimitsBuilder::new();
        if let Some(max) = max_memory {
            limits = limits.memory_size(max);
        }
        let mut store = Store::new(
            &engine,
            ModuleState {
                limits: limits.build(),
            },
        );
        store.limiter(|state| &mut state.limits);
        if let Some(fuel) = config.fuel {
            store
                .set_fuel(fuel)
                .map_err(|e| BridgeError::load_failed(format!("failed to set fuel: {e}")))?;
        }

        let instance = Instance::new(&mut store, &module, &[])
            .map_err(|e| BridgeError::load_failed(format!("failed to instantiate module: {e}")))?;

        let memory = instance
            .get_memory(&mut store, MEMORY_EXPORT)
            .ok_or_else(|| BridgeError::load_failed(format!("missing `{MEMORY_EXPORT}` export")))?;
        let solve = instance
            .get_typed_func(&mut store, SOLVE_EXPORT)
            .map_err(|e| BridgeError::load_failed(format!("bad `{SOLVE_EXPORT}` export: {e}")))?;
        let generate = instance
            .get_typed_func(&mut store, GENERATE_EXPORT)
            .map_err(|e| {
                BridgeError::load_failed(format!("bad `{GENERATE_EXPORT}` export: {e}"))
            })?;

        let module = Self {
            store,
            memory,
            solve,
            generate,
            fuel: config.fuel,
            max_memory,
            digest,
        };
        debug!("foreign module ready, {} bytes of memory", module.size());
        Ok(module)
    }

    /// Reads a module file and loads it with [`load`](Self::load).
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::ModuleLoadFailed`] if the file cannot be read
    /// or the module cannot be loaded.
    pub fn load_file(path: impl AsRef<Path>, config: &BridgeConfig) -> Result<Self, BridgeError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| {
            BridgeError::load_failed(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::load(&bytes, config)
    }

    /// Returns the SHA-256 digest of the module bytes, hex encoded.
    #[must_use]
    pub fn digest(&self) -> &str {
        &self.digest
    }

    /// Returns the largest size linear memory may reach, in bytes.
    ///
    /// This is the smallest of the module's declared maximum, the configured
    /// store limit and the 32-bit address space.
    fn memory_limit(&self) -> usize {
        let declared = self
            .memory
            .ty(&self.store)
            .maximum()
            .and_then(|pages| usize::try_from(pages).ok())
            .map_or(usize::MAX, |pages| pages.saturating_mul(WASM_PAGE_SIZE));
        let address_space = usize::try_from(ADDRESS_SPACE).unwrap_or(usize::MAX);
        declared
            .min(self.max_memory.unwrap_or(usize::MAX))
            .min(address_space)
    }

    fn refuel(&mut self) -> Result<(), BridgeError> {
        if let Some(fuel) = self.fuel {
            self.store.set_fuel(fuel).map_err(trapped)?;
        }
        Ok(())
    }
}

fn trapped(err: wasmtime::Error) -> BridgeError {
    BridgeError::Trapped {
        message: format!("{err:#}"),
    }
}

fn out_of_bounds(memory_size: usize, address: usize, len: usize) -> BridgeError {
    BridgeError::OutOfBounds {
        address,
        len,
        size: memory_size,
    }
}

impl LinearMemory for WasmModule {
    fn size(&self) -> usize {
        self.memory.data_size(&self.store)
    }

    fn grow_to(&mut self, min_size: usize) -> Result<(), BridgeError> {
        let size = self.size();
        if min_size <= size {
            return Ok(());
        }
        let out_of_memory = BridgeError::OutOfMemory {
            requested: min_size - size,
            available: self.memory_limit().saturating_sub(size),
        };
        let pages = (min_size - size).div_ceil(WASM_PAGE_SIZE);
        let pages = u64::try_from(pages).map_err(|_| out_of_memory.clone())?;
        self.memory
            .grow(&mut self.store, pages)
            .map_err(|_| out_of_memory)?;
        debug!("grew linear memory by {pages} pages to {} bytes", self.size());
        Ok(())
    }

    fn read(&self, offset: usize, buf: &mut [u8]) -> Result<(), BridgeError> {
        self.memory
            .read(&self.store, offset, buf)
            .map_err(|_| out_of_bounds(self.size(), offset, buf.len()))
    }

    fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), BridgeError> {
        self.memory
            .write(&mut self.store, offset, data)
            .map_err(|_| out_of_bounds(self.memory.data_size(&self.store), offset, data.len()))
    }
}

impl ForeignModule for WasmModule {
    fn call_solve(&mut self, input: u32, output: u32) -> Result<i32, BridgeError> {
        self.refuel()?;
        self.solve
            .call(&mut self.store, (input.cast_signed(), output.cast_signed()))
            .map_err(trapped)
    }

    fn call_generate(&mut self, seed: u64, solved: u32, puzzle: u32) -> Result<i32, BridgeError> {
        self.refuel()?;
        self.generate
            .call(
                &mut self.store,
                (seed.cast_signed(), solved.cast_signed(), puzzle.cast_signed()),
            )
            .map_err(trapped)
    }
}
