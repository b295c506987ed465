//! Temp-file lifecycle and downstream-compiler invocation, grounded on
//! `compile_b_to_c`/`run_gcc_multi`'s shape: lex+parse+analyze+emit to a C
//! file per input, then a single downstream compiler invocation over every
//! generated file, with temp C files retained on failure or `--keep-c` and
//! unlinked otherwise.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use bcc_base::diag::Verbosity;
use bcc_base::{Arena, Interner};
use bcc_syntax::parser::Parser as BParser;
use bcc_sema::analyze::Analyzer;
use bcc_codegen::{CompileOptions, EmitContext, PointerModel, WordWidth};

use crate::cli::Cli;

#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("cannot read '{path}': {source}")]
    ReadInput { path: PathBuf, source: std::io::Error },

    #[error("cannot write '{path}': {source}")]
    WriteOutput { path: PathBuf, source: std::io::Error },

    #[error("{0}")]
    Compile(String),

    #[error("-S, --asm, and -E only accept a single input file")]
    SingleFileModeWithMultipleInputs,

    #[error("failed to spawn downstream compiler '{compiler}': {source}")]
    SpawnCompiler { compiler: String, source: std::io::Error },

    #[error("downstream compiler exited with status {0}")]
    CompilerFailed(i32),

    #[error("no input files given")]
    NoInputs,
}

pub type DriverResult<T> = Result<T, DriverError>;

/// The path a generated C file was written to, kept around so the driver
/// can decide whether to unlink it once the downstream compile finishes.
struct GeneratedUnit {
    c_path: PathBuf,
    is_temp: bool,
}

/// Runs the full pipeline described by `cli` and returns the process exit
/// code, mirroring §6's exit-code table (0 success, 1 any error, 2 missing
/// input).
pub fn run(cli: &Cli) -> DriverResult<i32> {
    if cli.inputs.is_empty() {
        return Err(DriverError::NoInputs);
    }
    if cli.is_single_file_mode() && cli.inputs.len() > 1 {
        return Err(DriverError::SingleFileModeWithMultipleInputs);
    }

    let options = CompileOptions {
        // No CLI flag selects word-pointer mode; byte-addressed is the only
        // mode reachable from the driver, matching the reference CLI.
        pointer_model: PointerModel::Byte,
        word_width: WordWidth::Native,
        emit_line_directives: !cli.no_line,
        verbose_errors: cli.verbose_errors,
    };

    let mut units = Vec::new();
    for input in &cli.inputs {
        log::debug!("compiling {}", input.display());
        match compile_one(input, &options, cli)? {
            Some(unit) => units.push(unit),
            None => {
                // --dump-tokens, or --dump-ast without --dump-c: nothing
                // further to do for this file.
                return Ok(0);
            }
        }
    }

    if cli.emit_c_stdout || cli.emit_c_to_file {
        // The single generated unit's C has already landed where it needs
        // to (stdout, or the `-o` path); no downstream compile.
        for unit in &units {
            if unit.is_temp {
                let _ = fs::remove_file(&unit.c_path);
            }
        }
        return Ok(0);
    }

    if cli.emit_asm {
        let status = run_downstream_assemble(cli, &units[0].c_path)?;
        for unit in &units {
            if unit.is_temp {
                let _ = fs::remove_file(&unit.c_path);
            }
        }
        if status != 0 {
            return Err(DriverError::CompilerFailed(status));
        }
        return Ok(0);
    }

    let out_path = cli.output.clone().unwrap_or_else(|| PathBuf::from("a.out"));
    let cfiles: Vec<PathBuf> = units.iter().map(|u| u.c_path.clone()).collect();
    let status = run_downstream_compiler(cli, &cfiles, &out_path)?;

    for unit in &units {
        if unit.is_temp && !cli.keep_c {
            if status == 0 {
                let _ = fs::remove_file(&unit.c_path);
            } else {
                log::warn!("retaining {} for inspection after downstream failure", unit.c_path.display());
            }
        }
    }

    if status != 0 {
        return Err(DriverError::CompilerFailed(status));
    }
    Ok(0)
}

fn compile_one(input: &Path, options: &CompileOptions, cli: &Cli) -> DriverResult<Option<GeneratedUnit>> {
    let src = fs::read_to_string(input).map_err(|e| DriverError::ReadInput {
        path: input.to_path_buf(),
        source: e,
    })?;

    let arena = Arena::new();
    let mut interner = Interner::new();
    let file_sym = interner.intern(&input.display().to_string());

    if cli.dump_tokens {
        dump_tokens(&arena, &mut interner, &src, file_sym);
        return Ok(None);
    }

    log::debug!("parsing {}", input.display());
    let verbosity = if cli.verbose_errors { Verbosity::Verbose } else { Verbosity::Compact };
    let mut parser = BParser::new(&arena, &mut interner, &src, file_sym)
        .map_err(|e| DriverError::Compile(e.render(&interner, verbosity)))?;
    let program = parser
        .parse_program()
        .map_err(|e| DriverError::Compile(e.render(&interner, verbosity)))?;

    if cli.dump_ast {
        eprintln!("{:#?}", program.items);
        if !cli.dump_c {
            return Ok(None);
        }
    }

    log::debug!("analyzing {}", input.display());
    let analyzed = Analyzer::new(&arena, &mut interner)
        .analyze(&program)
        .map_err(|e| DriverError::Compile(e.render(&interner, verbosity)))?;
    for w in &analyzed.warnings {
        log::warn!("{}:{}: {}", input.display(), w.location.line, w.message);
    }

    log::debug!("emitting C for {}", input.display());
    let mut ctx = EmitContext::new(&interner, options.clone());
    let c_text = bcc_codegen::emit_program_c(&mut ctx, &analyzed.program);

    if cli.dump_c {
        print!("{c_text}");
    }

    if cli.emit_c_stdout {
        print!("{c_text}");
        return Ok(None);
    }

    let (c_path, is_temp) = if cli.emit_c_to_file {
        let path = cli.output.clone().unwrap_or_else(|| PathBuf::from("a.out.c"));
        (path, false)
    } else if cli.emit_c_named {
        let mut path = input.to_path_buf().into_os_string();
        path.push(".c");
        (PathBuf::from(path), false)
    } else {
        let tmp = tempfile::Builder::new()
            .prefix("bcc_")
            .suffix(".c")
            .tempfile()
            .map_err(|e| DriverError::WriteOutput { path: PathBuf::from("<tmp>"), source: e })?;
        let (_, path) = tmp.keep().map_err(|e| DriverError::WriteOutput {
            path: PathBuf::from("<tmp>"),
            source: e.error,
        })?;
        (path, true)
    };

    fs::write(&c_path, &c_text).map_err(|e| DriverError::WriteOutput {
        path: c_path.clone(),
        source: e,
    })?;

    Ok(Some(GeneratedUnit { c_path, is_temp }))
}

fn dump_tokens(arena: &Arena, interner: &mut Interner, src: &str, file: bcc_base::Symbol) {
    use bcc_syntax::lexer::Lexer;
    use bcc_syntax::token::TokenKind;
    let mut lexer = Lexer::new(arena, interner, src, file);
    loop {
        match lexer.next_token() {
            Ok(tok) => {
                let done = tok.kind == TokenKind::Eof;
                println!("{:?} @ {}:{}", tok.kind, tok.location.line, tok.location.col);
                if done {
                    break;
                }
            }
            Err(e) => {
                eprintln!("{}", e.render(interner, Verbosity::Compact));
                break;
            }
        }
    }
}

/// Runs the downstream compiler in `-S` mode over a single generated C
/// file, writing assembly to our own stdout (`-o -`) rather than linking.
fn run_downstream_assemble(cli: &Cli, cfile: &Path) -> DriverResult<i32> {
    let compiler = "cc";
    let mut cmd = Command::new(compiler);
    cmd.arg("-std=c99");
    if cli.wall_effective() {
        cmd.arg("-Wall");
    }
    if cli.wextra_effective() {
        cmd.arg("-Wextra");
    }
    if cli.werror {
        cmd.arg("-Werror");
    }
    if cli.debug {
        cmd.arg("-g");
    }
    cmd.arg("-S").arg(cfile).arg("-o").arg("-");
    for flag in &cli.extra_flags {
        cmd.arg(flag);
    }

    log::info!("{compiler} {:?}", cmd);
    let status = cmd.status().map_err(|e| DriverError::SpawnCompiler {
        compiler: compiler.to_string(),
        source: e,
    })?;
    Ok(status.code().unwrap_or(1))
}

fn run_downstream_compiler(cli: &Cli, cfiles: &[PathBuf], out_path: &Path) -> DriverResult<i32> {
    let compiler = "cc";
    let mut cmd = Command::new(compiler);
    cmd.arg("-std=c99");
    if !cli.compile_only {
        cmd.arg("-O2");
    }
    if cli.wall_effective() {
        cmd.arg("-Wall");
    }
    if cli.wextra_effective() {
        cmd.arg("-Wextra");
    }
    if cli.werror {
        cmd.arg("-Werror");
    }
    if cli.debug {
        cmd.arg("-g");
    }
    if cli.compile_only {
        cmd.arg("-c");
    } else {
        cmd.arg("-o").arg(out_path);
    }
    for cfile in cfiles {
        cmd.arg(cfile);
    }
    for flag in &cli.extra_flags {
        cmd.arg(flag);
    }
    if !cli.compile_only {
        cmd.arg("-ldl").arg("-lm");
    }
    for lib in &cli.libs {
        cmd.arg(format!("-l{lib}"));
    }

    log::info!("{compiler} {:?}", cmd);
    let status = cmd.status().map_err(|e| DriverError::SpawnCompiler {
        compiler: compiler.to_string(),
        source: e,
    })?;
    Ok(status.code().unwrap_or(1))
}
