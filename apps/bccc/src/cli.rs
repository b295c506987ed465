//! Command-line surface for `bccc`, mirroring the flag table in one-to-one
//! fashion rather than grouping flags into subcommands — the reference
//! driver this project is built from has no subcommands, only a flat set of
//! switches plus a list of input files.

use std::path::PathBuf;

use clap::Parser;

/// The B-to-C batch compiler.
#[derive(Parser, Debug)]
#[command(name = "bccc", version, about = "Compiles B source to a native executable via C")]
pub struct Cli {
    /// One or more B source files.
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Output executable (or, with -E, the destination C file).
    #[arg(short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Emit C to stdout; no downstream compile. Single file only.
    #[arg(short = 'S')]
    pub emit_c_stdout: bool,

    /// Emit assembly to stdout via the downstream compiler's `-S`; no
    /// linking. Single file only.
    #[arg(long = "asm")]
    pub emit_asm: bool,

    /// Compile and keep object file(s); no link.
    #[arg(short = 'c')]
    pub compile_only: bool,

    /// Emit C to the file named by `-o`. Single file only.
    #[arg(short = 'E')]
    pub emit_c_to_file: bool,

    /// Retain generated C on success.
    #[arg(long = "keep-c")]
    pub keep_c: bool,

    /// Use `<input>.c` naming for generated C (implies `--keep-c`).
    #[arg(long = "emit-c")]
    pub emit_c_named: bool,

    /// Pass a debug flag to the downstream compiler.
    #[arg(short = 'g')]
    pub debug: bool,

    /// Append `-lNAME` to the link line. Repeatable.
    #[arg(short = 'l', value_name = "NAME")]
    pub libs: Vec<String>,

    /// Pass FLAG verbatim to the downstream compiler. Repeatable.
    #[arg(short = 'X', value_name = "FLAG")]
    pub extra_flags: Vec<String>,

    /// Accepted for compatibility; warnings default on regardless.
    #[arg(long = "Wall")]
    pub wall: bool,

    #[arg(long = "Wno-all")]
    pub wno_all: bool,

    /// Accepted for compatibility; extra warnings default on regardless.
    #[arg(long = "Wextra")]
    pub wextra: bool,

    #[arg(long = "Wno-extra")]
    pub wno_extra: bool,

    #[arg(long = "Werror")]
    pub werror: bool,

    /// Byte-addressed pointer mode. Always on: the reference driver this
    /// is built from never exposes a way to select word-pointer mode from
    /// the command line, only `--byteptr` itself (already the default).
    #[arg(long = "byteptr")]
    pub byteptr: bool,

    #[arg(long = "dump-tokens")]
    pub dump_tokens: bool,

    #[arg(long = "dump-ast")]
    pub dump_ast: bool,

    #[arg(long = "dump-c")]
    pub dump_c: bool,

    /// Suppress `#line` directives in emitted C.
    #[arg(long = "no-line")]
    pub no_line: bool,

    /// Long-form diagnostics instead of two-letter codes.
    #[arg(long = "verbose-errors")]
    pub verbose_errors: bool,

    /// Verbose pipeline logging.
    #[arg(short = 'v')]
    pub verbose: bool,
}

impl Cli {
    /// Both warning classes default on; only the negating flag turns one
    /// off. `--Wall`/`--Wextra` are accepted but redundant with the default.
    pub fn wall_effective(&self) -> bool {
        !self.wno_all
    }

    pub fn wextra_effective(&self) -> bool {
        !self.wno_extra
    }

    /// True when the invocation asks for a single-file, no-link mode
    /// (`-S`, `--asm`, `-E`) — these all reject more than one input.
    pub fn is_single_file_mode(&self) -> bool {
        self.emit_c_stdout || self.emit_asm || self.emit_c_to_file
    }
}
