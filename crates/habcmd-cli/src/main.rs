//! CLI entrypoint for `habcmd`.
//!
//! The binary delegates to [`habcmd_cli::run`], which loads configuration,
//! parses the command line, and drives the `hab` tool.

use std::io::{self, StderrLock, StdoutLock};
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut stdout: StdoutLock<'_> = io::stdout().lock();
    let mut stderr: StderrLock<'_> = io::stderr().lock();
    habcmd_cli::run(std::env::args_os(), &mut stdout, &mut stderr)
}
