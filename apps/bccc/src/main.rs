//! `bccc` binary entry point — parses CLI arguments, runs the pipeline, and
//! exits with the code the pipeline returns.

fn main() {
    std::process::exit(bccc::run_cli());
}
