//! Maps parsed commands onto orchestrator operations.

use habcmd::{HabCmd, Hartifact, VersionedPackage, binding_mode, binds};
use tracing::info;

use crate::AppError;
use crate::cli::{CliCommand, SvcAction};

const DISPATCH_TARGET: &str = "habcmd_cli::dispatch";

/// Result of a successful operation.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Outcome {
    /// Output of the wrapped tool, printed verbatim.
    Output(String),
    /// Answer of the installed probe.
    Installed(bool),
}

pub(crate) fn dispatch(hab: &dyn HabCmd, command: CliCommand) -> Result<Outcome, AppError> {
    match command {
        CliCommand::Install {
            ident,
            hartifact,
            channel,
        } => {
            log_operation("install", &ident);
            let channel = channel.as_deref();
            let result = match hartifact {
                Some(path) => hab.install_package(&Hartifact::new(path, ident), channel),
                None => hab.install_package(&ident, channel),
            };
            output("install", result)
        }
        CliCommand::Installed { ident } => {
            log_operation("installed", &ident);
            hab.is_installed(&ident)
                .map(Outcome::Installed)
                .map_err(|source| AppError::Command {
                    operation: "installed",
                    source,
                })
        }
        CliCommand::Binlink { ident, exe } => {
            log_operation("binlink", &ident);
            output("binlink", hab.binlink_package(&ident, &exe))
        }
        CliCommand::Svc { action } => dispatch_service(hab, action),
    }
}

fn dispatch_service(hab: &dyn HabCmd, action: SvcAction) -> Result<Outcome, AppError> {
    match action {
        SvcAction::Load {
            ident,
            binds: bind_specs,
            binding_mode: mode,
        } => {
            log_operation("load", &ident);
            let options = [binds(bind_specs), binding_mode(mode.unwrap_or_default())];
            output("load", hab.load_service(&ident, &options))
        }
        SvcAction::Unload { ident } => {
            log_operation("unload", &ident);
            output("unload", hab.unload_service(&ident))
        }
        SvcAction::Start { ident } => {
            log_operation("start", &ident);
            output("start", hab.start_service(&ident))
        }
        SvcAction::Stop { ident } => {
            log_operation("stop", &ident);
            output("stop", hab.stop_service(&ident))
        }
    }
}

fn log_operation(operation: &str, pkg: &dyn VersionedPackage) {
    info!(
        target: DISPATCH_TARGET,
        operation,
        ident = %habcmd::habpkg::ident(pkg),
        "running hab operation"
    );
}

fn output(
    operation: &'static str,
    result: Result<String, habcmd::CommandError>,
) -> Result<Outcome, AppError> {
    result
        .map(Outcome::Output)
        .map_err(|source| AppError::Command { operation, source })
}
