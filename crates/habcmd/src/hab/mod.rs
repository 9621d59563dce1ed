//! Lifecycle orchestration over the `hab` command-line tool.
//!
//! [`Hab`] turns package and service operations into `hab` invocations. Each
//! call starts from a fresh copy of the standard environment overrides,
//! attaches the timeout for its [`Operation`], and delegates to an
//! [`Executor`]. The orchestrator keeps no state between calls beyond its
//! executor, the program name, and the offline flag, so one instance can be
//! shared across threads.
//!
//! # Example
//!
//! ```rust,no_run
//! use habcmd::command::ProcessExecutor;
//! use habcmd::hab::{Hab, HabCmd, binds, binding_mode};
//! use habcmd::habpkg::HabPkg;
//!
//! let hab = Hab::new(ProcessExecutor, false);
//! let pkg = HabPkg::fully_qualified("core", "redis", "4.0.14", "20190319155852");
//!
//! hab.install_package(&pkg, Some("stable"))?;
//! hab.load_service(&pkg, &[binds(["cache:redis.default"]), binding_mode("relaxed")])?;
//! # Ok::<(), habcmd::CommandError>(())
//! ```

use std::time::Duration;

use tracing::debug;

use crate::command::{Executor, Invocation};
use crate::error::CommandError;
use crate::habpkg::{Installable, VersionedPackage, ident, short_ident};

mod options;

pub use self::options::{LoadOption, binding_mode, binds};

/// Tracing target for orchestrator operations.
const HAB_TARGET: &str = "habcmd::hab";

/// Program invoked when no override is configured.
pub const HAB_BINARY: &str = "hab";

/// Environment overrides applied to every invocation: no ANSI colour codes
/// and no progress bars.
pub const STANDARD_ENV: [(&str, &str); 2] =
    [("HAB_NOCOLORING", "true"), ("HAB_NONINTERACTIVE", "true")];

/// Feature flag enabling offline installs; set only on offline installs.
pub const OFFLINE_INSTALL_ENV: &str = "HAB_FEAT_OFFLINE_INSTALL";

/// Timeout for `pkg install`. Installs cascade into dependencies and can take
/// considerable time.
pub const TIMEOUT_INSTALL_PACKAGE: Duration = Duration::from_secs(1200);

/// Timeout for the `pkg path` probe, which is expected to be fast.
pub const TIMEOUT_IS_INSTALLED: Duration = Duration::from_secs(60);

/// Timeout for every other command.
pub const TIMEOUT_DEFAULT: Duration = Duration::from_secs(300);

/// Timeout category of an orchestrator operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// `pkg install`.
    Install,
    /// `pkg path`, used as an installed probe.
    IsInstalled,
    /// Binlink and every service operation.
    General,
}

impl Operation {
    /// Maximum duration allowed for the operation.
    #[must_use]
    pub const fn timeout(self) -> Duration {
        match self {
            Self::Install => TIMEOUT_INSTALL_PACKAGE,
            Self::IsInstalled => TIMEOUT_IS_INSTALLED,
            Self::General => TIMEOUT_DEFAULT,
        }
    }
}

/// Package and service operations provided by the `hab` tool.
///
/// No operation retries; callers own retry policy.
pub trait HabCmd {
    /// Installs a package and its dependencies from a depot or a hartifact.
    ///
    /// An empty channel is treated as no channel.
    ///
    /// # Errors
    ///
    /// Returns a [`CommandError`] carrying the captured output when the
    /// install fails or times out.
    fn install_package(
        &self,
        pkg: &dyn Installable,
        channel: Option<&str>,
    ) -> Result<String, CommandError>;

    /// Reports whether the package is installed.
    ///
    /// Any probe failure reads as "not installed": a misconfigured tool and
    /// an absent package are indistinguishable through this call.
    ///
    /// # Errors
    ///
    /// The bundled implementation never fails; the `Result` leaves room for
    /// implementations that can tell the two apart.
    fn is_installed(&self, pkg: &dyn VersionedPackage) -> Result<bool, CommandError>;

    /// Binlinks `exe` from the package, overwriting any existing link.
    ///
    /// # Errors
    ///
    /// Returns a [`CommandError`] carrying the captured output on failure.
    fn binlink_package(
        &self,
        pkg: &dyn VersionedPackage,
        exe: &str,
    ) -> Result<String, CommandError>;

    /// Loads the package as a service, reloading it if already loaded.
    ///
    /// # Errors
    ///
    /// Returns a [`CommandError`] carrying the captured output on failure.
    fn load_service(
        &self,
        svc: &dyn VersionedPackage,
        options: &[LoadOption],
    ) -> Result<String, CommandError>;

    /// Unloads the service currently loaded for the package's origin and name.
    ///
    /// # Errors
    ///
    /// Returns a [`CommandError`] carrying the captured output on failure.
    fn unload_service(&self, svc: &dyn VersionedPackage) -> Result<String, CommandError>;

    /// Starts the loaded service for the package's origin and name.
    ///
    /// # Errors
    ///
    /// Returns a [`CommandError`] carrying the captured output on failure.
    fn start_service(&self, svc: &dyn VersionedPackage) -> Result<String, CommandError>;

    /// Stops the loaded service for the package's origin and name.
    ///
    /// # Errors
    ///
    /// Returns a [`CommandError`] carrying the captured output on failure.
    fn stop_service(&self, svc: &dyn VersionedPackage) -> Result<String, CommandError>;
}

/// Runs `hab` through an [`Executor`] with the standard options.
#[derive(Debug, Clone)]
pub struct Hab<E> {
    executor: E,
    offline_mode: bool,
    binary: String,
}

impl<E> Hab<E> {
    /// Creates an orchestrator. When `offline_mode` is set, installs use the
    /// tool's offline install feature.
    #[must_use]
    pub fn new(executor: E, offline_mode: bool) -> Self {
        Self {
            executor,
            offline_mode,
            binary: String::from(HAB_BINARY),
        }
    }

    /// Overrides the program invoked in place of `hab`.
    #[must_use]
    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Returns true when installs run offline.
    #[must_use]
    pub const fn offline_mode(&self) -> bool {
        self.offline_mode
    }

    /// Program invoked for every operation.
    #[must_use]
    pub fn binary(&self) -> &str {
        &self.binary
    }

    /// Returns a reference to the executor.
    #[must_use]
    pub const fn executor(&self) -> &E {
        &self.executor
    }

    /// Starts an invocation from a fresh copy of the standard options.
    fn invocation(&self, operation: Operation) -> Invocation {
        STANDARD_ENV
            .iter()
            .fold(Invocation::new(&self.binary), |invocation, (key, value)| {
                invocation.with_env(*key, *value)
            })
            .with_timeout(operation.timeout())
    }

    fn service_invocation(&self, action: &str, svc: &dyn VersionedPackage) -> Invocation {
        self.invocation(Operation::General)
            .with_args(["svc", action])
            .with_arg(short_ident(svc))
    }
}

impl<E: Executor> HabCmd for Hab<E> {
    fn install_package(
        &self,
        pkg: &dyn Installable,
        channel: Option<&str>,
    ) -> Result<String, CommandError> {
        let install_ident = pkg.install_ident();
        let mut invocation = self
            .invocation(Operation::Install)
            .with_args(["pkg", "install"])
            .with_arg(install_ident.as_str());

        if self.offline_mode {
            invocation = invocation
                .with_arg("--offline")
                .with_env(OFFLINE_INSTALL_ENV, "true");
        }

        if let Some(name) = channel.filter(|candidate| !candidate.is_empty()) {
            invocation = invocation.with_args(["--channel", name]);
        }

        debug!(
            target: HAB_TARGET,
            install_ident = %install_ident,
            channel,
            offline = self.offline_mode,
            "installing package"
        );
        self.executor.combined_output(&invocation)
    }

    fn is_installed(&self, pkg: &dyn VersionedPackage) -> Result<bool, CommandError> {
        let pkg_ident = ident(pkg);
        let invocation = self
            .invocation(Operation::IsInstalled)
            .with_args(["pkg", "path"])
            .with_arg(pkg_ident.as_str());

        match self.executor.run(&invocation) {
            Ok(()) => Ok(true),
            Err(err) => {
                debug!(
                    target: HAB_TARGET,
                    ident = %pkg_ident,
                    error = %err,
                    "package path probe failed, treating package as absent"
                );
                Ok(false)
            }
        }
    }

    fn binlink_package(
        &self,
        pkg: &dyn VersionedPackage,
        exe: &str,
    ) -> Result<String, CommandError> {
        let invocation = self
            .invocation(Operation::General)
            .with_args(["pkg", "binlink", "--force"])
            .with_arg(ident(pkg))
            .with_arg(exe);
        self.executor.combined_output(&invocation)
    }

    fn load_service(
        &self,
        svc: &dyn VersionedPackage,
        options: &[LoadOption],
    ) -> Result<String, CommandError> {
        let base = vec![
            String::from("svc"),
            String::from("load"),
            String::from("--force"),
            ident(svc),
            String::from("--strategy"),
            String::from("none"),
        ];
        let args = options::apply(base, options);
        debug!(target: HAB_TARGET, ?args, "loading service");

        let invocation = self.invocation(Operation::General).with_args(args);
        self.executor.combined_output(&invocation)
    }

    fn unload_service(&self, svc: &dyn VersionedPackage) -> Result<String, CommandError> {
        self.executor
            .combined_output(&self.service_invocation("unload", svc))
    }

    fn start_service(&self, svc: &dyn VersionedPackage) -> Result<String, CommandError> {
        self.executor
            .combined_output(&self.service_invocation("start", svc))
    }

    fn stop_service(&self, svc: &dyn VersionedPackage) -> Result<String, CommandError> {
        self.executor
            .combined_output(&self.service_invocation("stop", svc))
    }
}
