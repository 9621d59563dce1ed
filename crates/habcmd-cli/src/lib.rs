//! Command-line runtime for `habcmd`.
//!
//! The module owns argument parsing, configuration bootstrapping, telemetry
//! setup, and dispatch onto the [`habcmd::Hab`] orchestrator. The interface
//! is exercised both from the binary entrypoint and from tests where the
//! configuration loader and the process executor can be substituted.

use std::ffi::OsString;
use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use habcmd::{CommandError, Executor, Hab, ProcessExecutor};
use thiserror::Error;

mod cli;
mod config;
mod dispatch;
pub mod telemetry;

use cli::Cli;
use config::{ConfigLoader, OrthoConfigLoader, split_config_arguments};
use dispatch::{Outcome, dispatch};
pub use telemetry::TelemetryError;

/// Exit code reported when `installed` finds no matching package.
const NOT_INSTALLED: u8 = 1;
/// Exit code reported for malformed command lines, matching clap.
const USAGE_ERROR: u8 = 2;

/// Runs the CLI using the provided arguments and IO handles.
#[must_use]
pub fn run<I, W, E>(args: I, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
{
    run_with_executor(args, ProcessExecutor, stdout, stderr)
}

/// Runs the CLI against a caller-supplied executor instead of spawning `hab`.
#[must_use]
pub fn run_with_executor<I, X, W, E>(args: I, executor: X, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    X: Executor,
    W: Write,
    E: Write,
{
    run_with_loader(args, executor, &OrthoConfigLoader, stdout, stderr)
}

pub(crate) fn run_with_loader<I, X, L, W, E>(
    args: I,
    executor: X,
    loader: &L,
    stdout: &mut W,
    stderr: &mut E,
) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    X: Executor,
    L: ConfigLoader,
    W: Write,
    E: Write,
{
    let args: Vec<OsString> = args.into_iter().collect();
    let split = split_config_arguments(&args);

    let cli = match Cli::try_parse_from(&split.cli_arguments) {
        Ok(cli) => cli,
        Err(error) => return report_usage(&error, stdout, stderr),
    };

    let config = match loader.load(&split.config_arguments) {
        Ok(config) => config,
        Err(error) => return report_failure(&error, stderr),
    };

    if let Err(error) = telemetry::initialise(&config) {
        return report_failure(&AppError::Telemetry(error), stderr);
    }

    let hab = Hab::new(executor, cli.offline || config.offline()).with_binary(config.hab_binary());
    let outcome = dispatch(&hab, cli.command);
    match outcome.and_then(|outcome| emit(outcome, stdout)) {
        Ok(code) => code,
        Err(error) => report_failure(&error, stderr),
    }
}

fn emit<W: Write>(outcome: Outcome, stdout: &mut W) -> Result<ExitCode, AppError> {
    let code = match outcome {
        Outcome::Output(output) => {
            stdout.write_all(output.as_bytes()).map_err(AppError::Io)?;
            ExitCode::SUCCESS
        }
        Outcome::Installed(installed) => {
            writeln!(stdout, "{installed}").map_err(AppError::Io)?;
            if installed {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(NOT_INSTALLED)
            }
        }
    };
    stdout.flush().map_err(AppError::Io)?;
    Ok(code)
}

fn report_usage<W, E>(error: &clap::Error, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    W: Write,
    E: Write,
{
    let rendered = error.render().to_string();
    if error.use_stderr() {
        let _ = write!(stderr, "{rendered}");
        ExitCode::from(USAGE_ERROR)
    } else {
        let _ = write!(stdout, "{rendered}");
        ExitCode::SUCCESS
    }
}

fn report_failure<E: Write>(error: &AppError, stderr: &mut E) -> ExitCode {
    if let Some(output) = error.command_output() {
        let _ = stderr.write_all(output.as_bytes());
        if !output.is_empty() && !output.ends_with('\n') {
            let _ = writeln!(stderr);
        }
    }
    let _ = writeln!(stderr, "{error}");
    let _ = stderr.flush();
    ExitCode::FAILURE
}

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("failed to load configuration: {0}")]
    LoadConfiguration(Arc<ortho_config::OrthoError>),
    #[error("failed to initialise telemetry: {0}")]
    Telemetry(TelemetryError),
    #[error("{operation} failed: {source}")]
    Command {
        operation: &'static str,
        source: CommandError,
    },
    #[error("failed to write output: {0}")]
    Io(io::Error),
}

impl AppError {
    fn command_output(&self) -> Option<&str> {
        match self {
            Self::Command { source, .. } => source.output(),
            _ => None,
        }
    }
}
