//! Shared configuration for the `habcmd` toolchain.
//!
//! Configuration is layered by `ortho_config`: built-in defaults, then a
//! `habcmd.toml` file (or the file named by `--config-path` /
//! `HABCMD_CONFIG_PATH`), then `HABCMD_*` environment variables, then
//! command-line flags.

use std::sync::Arc;

use ortho_config::OrthoError;
pub use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

mod defaults;
mod logging;

pub use defaults::{
    DEFAULT_HAB_BINARY, DEFAULT_LOG_FILTER, default_hab_binary, default_log_filter,
    default_log_filter_string, default_log_format,
};
pub use logging::{LogFormat, LogFormatParseError};

/// Result type returned by configuration loading.
pub type ConfigResult = Result<Config, Arc<OrthoError>>;

/// Runtime configuration for `habcmd`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "HABCMD")]
pub struct Config {
    /// `tracing` filter expression applied to log output.
    #[ortho_config(default = default_log_filter_string())]
    #[serde(default = "default_log_filter_string")]
    pub log_filter: String,
    /// Output format for log records.
    #[ortho_config(default = default_log_format())]
    #[serde(default = "default_log_format")]
    pub log_format: LogFormat,
    /// Installs use the `hab` offline install feature when set.
    ///
    /// Read from the file and environment only; the `habcmd` command line
    /// owns the `--offline` flag.
    #[ortho_config(default = false, skip_cli)]
    #[serde(default)]
    pub offline: bool,
    /// Program invoked in place of `hab`.
    #[ortho_config(default = default_hab_binary())]
    #[serde(default = "default_hab_binary")]
    pub hab_binary: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
            offline: false,
            hab_binary: default_hab_binary(),
        }
    }
}

impl Config {
    /// Filter expression for the tracing subscriber.
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Output format for log records.
    pub fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Whether installs run offline.
    pub fn offline(&self) -> bool {
        self.offline
    }

    /// Program invoked in place of `hab`.
    pub fn hab_binary(&self) -> &str {
        &self.hab_binary
    }
}
