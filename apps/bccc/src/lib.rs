//! `bccc` — command-line driver for the B-to-C compiler.
//!
//! The binary is a thin wrapper around [`run_cli`], handling error display
//! and exit codes. All pipeline logic lives here in the library crate for
//! testability.
//!
//! # Exit codes
//!
//! - `0` — success
//! - `1` — any error (lexing, parsing, semantics, downstream compiler failure)
//! - `2` — missing input files

pub mod cli;
pub mod driver;

use clap::Parser;

use cli::Cli;
pub use driver::{DriverError, DriverResult};

/// Parses `argv`, runs the pipeline, and returns the process exit code.
pub fn run_cli() -> i32 {
    let cli = Cli::parse();
    init_logging(&cli);

    match driver::run(&cli) {
        Ok(code) => code,
        Err(DriverError::NoInputs) => {
            eprintln!("bccc: no input files");
            2
        }
        Err(e) => {
            eprintln!("bccc: {e}");
            1
        }
    }
}

fn init_logging(cli: &Cli) {
    let mut builder = env_logger::Builder::from_default_env();
    if std::env::var("RUST_LOG").is_err() && cli.verbose {
        builder.filter_level(log::LevelFilter::Info);
    }
    let _ = builder.try_init();
}
