//! Domain errors raised while driving the `hab` command-line tool.
//!
//! All errors use `thiserror`-derived enums with structured context so callers
//! can inspect the failure programmatically. I/O errors are wrapped in `Arc`
//! to satisfy the `result_large_err` Clippy lint and keep the errors
//! cloneable.

use std::sync::Arc;

use thiserror::Error;

/// Errors arising from running an external command.
#[derive(Debug, Clone, Error)]
pub enum CommandError {
    /// The program could not be started.
    #[error("failed to start '{program}': {source}")]
    Spawn {
        /// Program that was launched.
        program: String,
        /// Underlying I/O error.
        #[source]
        source: Arc<std::io::Error>,
    },

    /// The program did not complete within its deadline and was killed.
    #[error("'{program}' timed out after {timeout_ms} ms")]
    Timeout {
        /// Program that was launched.
        program: String,
        /// Deadline that expired, in milliseconds.
        timeout_ms: u64,
        /// Output captured before the process was killed.
        output: String,
    },

    /// The program exited with a non-zero status code.
    #[error("'{program}' exited with non-zero status {status}")]
    NonZeroExit {
        /// Program that was launched.
        program: String,
        /// Process exit status, or `-1` when terminated by a signal.
        status: i32,
        /// Combined stdout and stderr of the process.
        output: String,
    },

    /// An I/O error occurred while supervising the process.
    #[error("I/O error while running '{program}': {source}")]
    Io {
        /// Program that was launched.
        program: String,
        /// Underlying I/O error.
        #[source]
        source: Arc<std::io::Error>,
    },
}

impl CommandError {
    /// Returns the program the failing invocation targeted.
    #[must_use]
    pub fn program(&self) -> &str {
        match self {
            Self::Spawn { program, .. }
            | Self::Timeout { program, .. }
            | Self::NonZeroExit { program, .. }
            | Self::Io { program, .. } => program,
        }
    }

    /// Returns the output captured from the process, when any was collected.
    ///
    /// Operators rely on this text to diagnose failures reported by the
    /// wrapped tool, so callers should print it verbatim.
    #[must_use]
    pub fn output(&self) -> Option<&str> {
        match self {
            Self::Timeout { output, .. } | Self::NonZeroExit { output, .. } => {
                Some(output.as_str())
            }
            Self::Spawn { .. } | Self::Io { .. } => None,
        }
    }
}

/// Errors raised while parsing a package identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PackageParseError {
    /// The identifier did not split into `origin/name[/version[/release]]`.
    #[error("package identifier '{ident}' must have between 2 and 4 segments")]
    SegmentCount {
        /// Identifier that was parsed.
        ident: String,
    },

    /// One of the identifier segments was empty.
    #[error("package identifier '{ident}' contains an empty segment")]
    EmptySegment {
        /// Identifier that was parsed.
        ident: String,
    },
}
