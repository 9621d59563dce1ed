//! Typed command orchestration for the Habitat `hab` tool.
//!
//! The `habcmd` crate drives the external `hab` binary to install packages,
//! probe installation state, binlink executables, and manage the lifecycle of
//! supervised services. It turns each operation into a precisely ordered
//! argument list, applies per-operation timeout and environment policy, and
//! hands the invocation to an [`Executor`].
//!
//! # Architecture
//!
//! - [`habpkg`] models package references: [`HabPkg`] depot coordinates and
//!   [`Hartifact`] local archives.
//! - [`command`] defines the [`Executor`] contract and the production
//!   [`ProcessExecutor`], which enforces timeouts by killing the child.
//! - [`hab`] holds the [`Hab`] orchestrator, its [`HabCmd`] operation set,
//!   the timeout table, and composable [`LoadOption`]s for `svc load`.
//!
//! # Example
//!
//! ```rust,no_run
//! use habcmd::{Hab, HabCmd, HabPkg, ProcessExecutor};
//!
//! let hab = Hab::new(ProcessExecutor, false);
//! let pkg: HabPkg = "core/redis/4.0.14/20190319155852".parse()?;
//! if !hab.is_installed(&pkg)? {
//!     hab.install_package(&pkg, None)?;
//! }
//! hab.start_service(&pkg)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod command;
pub mod error;
pub mod hab;
pub mod habpkg;

#[cfg(test)]
mod tests;

pub use self::command::{Executor, Invocation, ProcessExecutor};
pub use self::error::{CommandError, PackageParseError};
pub use self::hab::{Hab, HabCmd, LoadOption, Operation, binding_mode, binds};
pub use self::habpkg::{HabPkg, Hartifact, Installable, VersionedPackage};
