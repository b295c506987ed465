//! Temp-file lifecycle tests: retained-on-failure, deleted-on-success,
//! `--keep-c`. These substitute a stub "compiler" script ahead of the real
//! `cc` on `PATH` so the tests don't need a working C toolchain — only that
//! *some* executable named `cc` exists and exits with a chosen status.

use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;

use bccc::cli::Cli;

fn base_cli(inputs: Vec<PathBuf>) -> Cli {
    Cli {
        inputs,
        output: None,
        emit_c_stdout: false,
        emit_asm: false,
        compile_only: false,
        emit_c_to_file: false,
        keep_c: false,
        emit_c_named: false,
        debug: false,
        libs: Vec::new(),
        extra_flags: Vec::new(),
        wall: true,
        wno_all: false,
        wextra: false,
        wno_extra: false,
        werror: false,
        byteptr: true,
        dump_tokens: false,
        dump_ast: false,
        dump_c: false,
        no_line: false,
        verbose_errors: false,
        verbose: false,
    }
}

/// Installs a stub `cc` on `PATH` that exits with `exit_code`, writing a
/// marker file so tests can see it ran without needing a real toolchain.
struct StubCompiler {
    _dir: tempfile::TempDir,
    old_path: Option<String>,
}

impl StubCompiler {
    fn install(exit_code: i32) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let script_path = dir.path().join("cc");
        std::fs::write(&script_path, format!("#!/bin/sh\nexit {exit_code}\n")).unwrap();
        let mut perms = std::fs::metadata(&script_path).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&script_path, perms).unwrap();

        let old_path = std::env::var("PATH").ok();
        let new_path = format!("{}:{}", dir.path().display(), old_path.clone().unwrap_or_default());
        std::env::set_var("PATH", new_path);

        StubCompiler { _dir: dir, old_path }
    }

    /// Installs a stub `cc` that records its argv (one arg per line) into
    /// `log_path` before exiting 0.
    fn install_recording(log_path: &std::path::Path) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let script_path = dir.path().join("cc");
        std::fs::write(
            &script_path,
            format!("#!/bin/sh\nfor a in \"$@\"; do echo \"$a\" >> {}; done\nexit 0\n", log_path.display()),
        )
        .unwrap();
        let mut perms = std::fs::metadata(&script_path).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&script_path, perms).unwrap();

        let old_path = std::env::var("PATH").ok();
        let new_path = format!("{}:{}", dir.path().display(), old_path.clone().unwrap_or_default());
        std::env::set_var("PATH", new_path);

        StubCompiler { _dir: dir, old_path }
    }
}

impl Drop for StubCompiler {
    fn drop(&mut self) {
        if let Some(p) = &self.old_path {
            std::env::set_var("PATH", p);
        }
    }
}

fn write_source(dir: &tempfile::TempDir, name: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, "main() { extrn printf; printf(\"hi*n\"); }").unwrap();
    path
}

fn bcc_temp_files() -> std::collections::HashSet<PathBuf> {
    std::fs::read_dir(std::env::temp_dir())
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.file_name().unwrap().to_string_lossy().starts_with("bcc_"))
        .collect()
}

#[test]
fn generated_c_is_deleted_on_success_without_keep_c() {
    let _stub = StubCompiler::install(0);
    let dir = tempfile::tempdir().unwrap();
    let src = write_source(&dir, "a.b");
    let before = bcc_temp_files();

    let mut cli = base_cli(vec![src]);
    cli.output = Some(dir.path().join("a.out"));
    let code = bccc::driver::run(&cli).unwrap();
    assert_eq!(code, 0);

    let after = bcc_temp_files();
    assert_eq!(before, after, "temp C files created by this run should be cleaned up on success");
}

#[test]
fn keep_c_retains_generated_file_on_success() {
    let _stub = StubCompiler::install(0);
    let dir = tempfile::tempdir().unwrap();
    let src = write_source(&dir, "b.b");
    let c_out = dir.path().join("b.b.c");

    let mut cli = base_cli(vec![src.clone()]);
    cli.output = Some(dir.path().join("b.out"));
    cli.emit_c_named = true;

    let code = bccc::driver::run(&cli).unwrap();
    assert_eq!(code, 0);
    assert!(c_out.exists(), "--emit-c naming should leave the .c file behind");
}

#[test]
fn asm_flag_invokes_assemble_mode_and_skips_linking() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("argv.log");
    let _stub = StubCompiler::install_recording(&log_path);
    let src = write_source(&dir, "d.b");
    let out_path = dir.path().join("d.out");

    let mut cli = base_cli(vec![src]);
    cli.output = Some(out_path.clone());
    cli.emit_asm = true;

    let code = bccc::driver::run(&cli).unwrap();
    assert_eq!(code, 0);
    assert!(!out_path.exists(), "--asm must not produce a linked executable");

    let argv = std::fs::read_to_string(&log_path).unwrap();
    assert!(argv.lines().any(|a| a == "-S"), "downstream compiler must be invoked with -S:\n{argv}");
    assert!(argv.lines().any(|a| a == "-o"), "downstream compiler must be given -o:\n{argv}");
    assert!(!argv.lines().any(|a| a == out_path.to_string_lossy()), "must not link to the -o executable path:\n{argv}");
}

#[test]
fn downstream_failure_is_surfaced_as_an_error() {
    let _stub = StubCompiler::install(1);
    let dir = tempfile::tempdir().unwrap();
    let src = write_source(&dir, "c.b");

    let mut cli = base_cli(vec![src]);
    cli.output = Some(dir.path().join("c.out"));
    let result = bccc::driver::run(&cli);
    assert!(matches!(result, Err(bccc::DriverError::CompilerFailed(1))));
}
