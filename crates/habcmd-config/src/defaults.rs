use crate::logging::LogFormat;

/// Default log filter expression used by the binary.
///
/// Operation output goes to stdout, so only warnings reach stderr unless
/// the operator asks for more.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Program invoked when no `hab` binary override is configured.
pub const DEFAULT_HAB_BINARY: &str = "hab";

/// Default log filter expression used by the binary.
pub fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

/// Default logging format for the binary.
pub fn default_log_format() -> LogFormat {
    LogFormat::Compact
}

/// Owned `hab` program name used where allocation is required.
pub fn default_hab_binary() -> String {
    DEFAULT_HAB_BINARY.to_string()
}
