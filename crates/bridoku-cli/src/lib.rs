//! Command-line front end for the Bridoku bridge.
//!
//! The `bridoku` binary loads a compiled sudoku module from a file, then
//! either solves a board or generates a puzzle through it and prints the
//! result as a grid.
//!
//! ```sh
//! bridoku --module sudoku.wasm solve 53..7....6..195....98....6.8...6...34..8.3..17...2...6.6....28....419..5....8..79
//! bridoku --module sudoku.wasm generate --seed 42
//! ```

use std::{
    io::{self, Write},
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};

use bridoku_bridge::{Bridge, BridgeConfig, BridgeError, ConfigError, ForeignModule, MemoryGrowth};
use bridoku_core::Board;
use clap::{Parser, Subcommand};
use log::debug;

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Args {
    /// Compiled sudoku module to load.
    #[arg(long, env = "BRIDOKU_MODULE", value_name = "PATH", global = true)]
    pub module: Option<PathBuf>,

    /// TOML file with bridge settings.
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Let the allocator grow the module's memory when it runs out.
    #[arg(long, global = true)]
    pub allow_growth: bool,

    /// Print boards as 81-character strings instead of grids.
    #[arg(long, global = true)]
    pub raw: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// What to do with the loaded module.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Solve a board given as 81 characters of `1`-`9` and `.`.
    Solve {
        /// The board to solve.
        board: String,
    },
    /// Generate a puzzle and its solution.
    Generate {
        /// Generator seed. Defaults to the current Unix time in milliseconds.
        #[arg(long)]
        seed: Option<u64>,
    },
}

/// Errors reported by the `bridoku` binary.
#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum CliError {
    /// The configuration file could not be loaded.
    #[display("{_0}")]
    Config(ConfigError),
    /// Neither `--module` nor `BRIDOKU_MODULE` named a module.
    #[display("no module given; pass --module or set BRIDOKU_MODULE")]
    #[from(skip)]
    MissingModule,
    /// The board was rejected by the module.
    #[display("cannot be solved")]
    #[from(skip)]
    CannotBeSolved {
        /// Status returned by the module.
        code: i32,
    },
    /// A bridge call failed.
    #[display("{_0}")]
    Bridge(BridgeError),
    /// Output could not be written.
    #[display("failed to write output: {_0}")]
    Io(io::Error),
}

impl Args {
    /// Builds the bridge settings from the config file and flags.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Config`] if the config file cannot be loaded.
    pub fn bridge_config(&self) -> Result<BridgeConfig, CliError> {
        let mut config = match &self.config {
            Some(path) => BridgeConfig::from_file(path)?,
            None => BridgeConfig::default(),
        };
        if self.allow_growth {
            config.memory_growth = MemoryGrowth::Allow;
        }
        Ok(config)
    }
}

/// Loads the module named by `args` and runs its command, printing to `out`.
///
/// # Errors
///
/// Returns [`CliError::MissingModule`] if no module path was given, or another
/// [`CliError`] if the configuration or the module cannot be loaded, or the
/// command fails.
pub fn run(args: &Args, out: &mut impl Write) -> Result<(), CliError> {
    let module = args.module.as_ref().ok_or(CliError::MissingModule)?;
    let config = args.bridge_config()?;
    debug!("bridge config: {config:?}");
    let mut bridge = Bridge::load_file(module, &config)?;
    execute(&mut bridge, &args.command, args.raw, out)
}

/// Runs `command` against an already loaded bridge.
///
/// # Errors
///
/// Returns [`CliError::CannotBeSolved`] if the module rejects a board, or
/// another [`CliError`] if the command fails.
pub fn execute<M>(
    bridge: &mut Bridge<M>,
    command: &Command,
    raw: bool,
    out: &mut impl Write,
) -> Result<(), CliError>
where
    M: ForeignModule,
{
    match command {
        Command::Solve { board } => {
            let solved = bridge.solve(board).map_err(|err| match err {
                BridgeError::Unsolvable { code } | BridgeError::ForeignCallFailed { code } => {
                    CliError::CannotBeSolved { code }
                }
                err => CliError::Bridge(err),
            })?;
            write_board(out, &solved, raw)?;
        }
        Command::Generate { seed } => {
            let seed = seed.unwrap_or_else(seed_from_clock);
            let generated = bridge.generate_puzzle(seed)?;
            writeln!(out, "Seed:")?;
            writeln!(out, "  {}", generated.seed)?;
            writeln!(out)?;
            writeln!(out, "Puzzle:")?;
            write_board(out, &generated.puzzle, raw)?;
            writeln!(out)?;
            writeln!(out, "Solution:")?;
            write_board(out, &generated.solved, raw)?;
        }
    }
    Ok(())
}

fn write_board(out: &mut impl Write, board: &Board, raw: bool) -> io::Result<()> {
    if raw {
        writeln!(out, "{board}")
    } else {
        writeln!(out, "{}", board.grid())
    }
}

fn seed_from_clock() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or_default()
}
