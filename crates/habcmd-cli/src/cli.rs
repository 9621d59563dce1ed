//! CLI argument definitions for `habcmd`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use habcmd::HabPkg;

/// Command-line interface driving the `hab` tool.
#[derive(Parser, Debug)]
#[command(
    name = "habcmd",
    about = "Install Habitat packages and manage supervised services",
    disable_help_subcommand = true
)]
pub(crate) struct Cli {
    /// Installs packages with the offline install feature.
    #[arg(long)]
    pub(crate) offline: bool,
    /// The operation to run.
    #[command(subcommand)]
    pub(crate) command: CliCommand,
}

/// Package-level operations plus the `svc` group.
#[derive(Subcommand, Debug, Clone)]
pub(crate) enum CliCommand {
    /// Installs a package and its dependencies.
    Install {
        /// Package identifier (`origin/name[/version[/release]]`).
        #[arg(value_name = "IDENT")]
        ident: HabPkg,
        /// Installs from a local `.hart` file containing IDENT.
        #[arg(long, value_name = "PATH")]
        hartifact: Option<PathBuf>,
        /// Depot channel to install from.
        #[arg(long, value_name = "CHANNEL")]
        channel: Option<String>,
    },
    /// Reports whether a package is installed; exits 1 when it is not.
    Installed {
        /// Package identifier.
        #[arg(value_name = "IDENT")]
        ident: HabPkg,
    },
    /// Binlinks an executable from an installed package.
    Binlink {
        /// Package identifier.
        #[arg(value_name = "IDENT")]
        ident: HabPkg,
        /// Executable to expose system-wide.
        #[arg(value_name = "EXE")]
        exe: String,
    },
    /// Runs service lifecycle commands.
    Svc {
        /// The lifecycle action to perform.
        #[command(subcommand)]
        action: SvcAction,
    },
}

/// Service lifecycle actions.
#[derive(Subcommand, Debug, Clone)]
pub(crate) enum SvcAction {
    /// Loads (or reloads) a package as a service.
    Load {
        /// Package identifier.
        #[arg(value_name = "IDENT")]
        ident: HabPkg,
        /// Service bind, repeatable (`name:service.group`).
        #[arg(long = "bind", value_name = "SPEC")]
        binds: Vec<String>,
        /// Binding mode (`strict` or `relaxed`).
        #[arg(long, value_name = "MODE")]
        binding_mode: Option<String>,
    },
    /// Unloads the service loaded for IDENT's origin and name.
    Unload {
        /// Package identifier.
        #[arg(value_name = "IDENT")]
        ident: HabPkg,
    },
    /// Starts the service loaded for IDENT's origin and name.
    Start {
        /// Package identifier.
        #[arg(value_name = "IDENT")]
        ident: HabPkg,
    },
    /// Stops the service loaded for IDENT's origin and name.
    Stop {
        /// Package identifier.
        #[arg(value_name = "IDENT")]
        ident: HabPkg,
    },
}
