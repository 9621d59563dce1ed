//! Executor contract for running external programs.
//!
//! An [`Invocation`] captures everything needed to run a program once: the
//! program name, its ordered arguments, environment overrides, and a
//! deadline. An [`Executor`] runs invocations, either capturing combined
//! output or reporting bare success.
//!
//! The abstraction enables test doubles that record invocations without
//! spawning real processes. The production implementation is
//! [`ProcessExecutor`].

use std::time::Duration;

use crate::error::CommandError;

mod process;

pub use self::process::ProcessExecutor;

/// A single planned execution of an external program.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use habcmd::command::Invocation;
///
/// let invocation = Invocation::new("hab")
///     .with_env("HAB_NOCOLORING", "true")
///     .with_timeout(Duration::from_secs(60))
///     .with_args(["pkg", "path", "core/redis"]);
///
/// assert_eq!(invocation.program(), "hab");
/// assert_eq!(invocation.args(), ["pkg", "path", "core/redis"]);
/// assert_eq!(invocation.env_var("HAB_NOCOLORING"), Some("true"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    program: String,
    args: Vec<String>,
    env: Vec<(String, String)>,
    timeout: Option<Duration>,
}

impl Invocation {
    /// Creates an invocation of `program` with no arguments, no environment
    /// overrides, and no deadline.
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: Vec::new(),
            timeout: None,
        }
    }

    /// Appends a single argument.
    #[must_use]
    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Appends arguments in iteration order.
    #[must_use]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Adds an environment override on top of the inherited environment.
    #[must_use]
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Sets the deadline after which the executor kills the process.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Program to execute.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments in the order they are passed to the program.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Environment overrides in the order they were added.
    #[must_use]
    pub fn env(&self) -> &[(String, String)] {
        &self.env
    }

    /// Looks up the last override registered for `key`.
    #[must_use]
    pub fn env_var(&self, key: &str) -> Option<&str> {
        self.env
            .iter()
            .rev()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    /// Deadline for the execution, if one was set.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

/// Trait abstracting external program execution for testability.
///
/// Implementations must enforce the invocation's timeout themselves and must
/// not leave the child running past its deadline: on expiry they return
/// [`CommandError::Timeout`] promptly.
///
/// # Example
///
/// ```
/// use habcmd::command::{Executor, Invocation};
/// use habcmd::CommandError;
///
/// struct EchoExecutor;
///
/// impl Executor for EchoExecutor {
///     fn combined_output(&self, invocation: &Invocation) -> Result<String, CommandError> {
///         Ok(invocation.args().join(" "))
///     }
///
///     fn run(&self, _invocation: &Invocation) -> Result<(), CommandError> {
///         Ok(())
///     }
/// }
///
/// let output = EchoExecutor
///     .combined_output(&Invocation::new("hab").with_args(["svc", "status"]))?;
/// assert_eq!(output, "svc status");
/// # Ok::<(), CommandError>(())
/// ```
pub trait Executor {
    /// Runs the invocation and returns its interleaved stdout and stderr.
    ///
    /// # Errors
    ///
    /// Returns a [`CommandError`] if the program cannot be spawned, times
    /// out, or exits with a non-zero status. The latter two carry whatever
    /// output was captured.
    fn combined_output(&self, invocation: &Invocation) -> Result<String, CommandError>;

    /// Runs the invocation, discarding its output.
    ///
    /// # Errors
    ///
    /// Returns a [`CommandError`] if the program cannot be spawned, times
    /// out, or exits with a non-zero status.
    fn run(&self, invocation: &Invocation) -> Result<(), CommandError>;
}

impl<E: Executor + ?Sized> Executor for &E {
    fn combined_output(&self, invocation: &Invocation) -> Result<String, CommandError> {
        (**self).combined_output(invocation)
    }

    fn run(&self, invocation: &Invocation) -> Result<(), CommandError> {
        (**self).run(invocation)
    }
}
