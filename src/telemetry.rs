//! Tracing subscriber installation for binaries.

use tracing_subscriber::EnvFilter;

/// Filter variable consulted before `RUST_LOG`.
pub const LOG_FILTER_VAR: &str = "TASKLIST_LOG";

/// Default filter directive when no variable is set.
pub const DEFAULT_DIRECTIVE: &str = "info";

/// Boxed error returned when a global subscriber is already installed.
pub type TelemetryError = Box<dyn std::error::Error + Send + Sync>;

/// Installs a formatting subscriber writing to stderr.
///
/// The filter comes from `TASKLIST_LOG`, then `RUST_LOG`, then
/// [`DEFAULT_DIRECTIVE`].
///
/// # Errors
///
/// Returns an error when the filter is malformed or a global subscriber is
/// already installed.
pub fn init() -> Result<(), TelemetryError> {
    let directive = filter_directive(|name| std::env::var(name).ok());
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_new(directive)?)
        .try_init()
}

fn filter_directive(lookup: impl Fn(&str) -> Option<String>) -> String {
    [LOG_FILTER_VAR, EnvFilter::DEFAULT_ENV]
        .into_iter()
        .find_map(|name| lookup(name).filter(|value| !value.trim().is_empty()))
        .unwrap_or_else(|| DEFAULT_DIRECTIVE.to_owned())
}
