//! Diagnostic logging for the shell.
//!
//! Logs go to stderr so stdout carries only help rows and operation results.
//! A session installs the subscriber once; every command line read from
//! stdin then logs through it.

use std::io::{self, IsTerminal};

use once_cell::sync::OnceCell;
use opshell_config::{Config, LogFormat};
use tracing::{Subscriber, subscriber::SetGlobalDefaultError};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;

static SUBSCRIBER_INSTALLED: OnceCell<()> = OnceCell::new();

/// Failures raised before the first command runs.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// `log_filter` is not a valid `EnvFilter` directive list.
    #[error("invalid log filter '{filter}': {message}")]
    Filter {
        /// Directive list as configured.
        filter: String,
        /// Parser diagnostic.
        message: String,
    },
    /// Another global subscriber was installed first.
    #[error("failed to install the log subscriber: {0}")]
    Subscriber(SetGlobalDefaultError),
}

/// Routes shell diagnostics to stderr in the configured format.
///
/// Only the first call installs anything.
pub(crate) fn initialise(config: &Config) -> Result<(), TelemetryError> {
    SUBSCRIBER_INSTALLED
        .get_or_try_init(|| install_subscriber(config))
        .map(|_| ())
}

fn install_subscriber(config: &Config) -> Result<(), TelemetryError> {
    let raw = config.log_filter();
    let filter = EnvFilter::try_new(raw).map_err(|error| TelemetryError::Filter {
        filter: raw.to_owned(),
        message: error.to_string(),
    })?;

    // ANSI colour only when a person is watching stderr.
    let to_stderr = |directives: EnvFilter| {
        fmt::Subscriber::builder()
            .with_env_filter(directives)
            .with_target(true)
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_writer(io::stderr)
            .with_ansi(io::stderr().is_terminal())
            .with_timer(fmt::time::UtcTime::rfc_3339())
    };

    let subscriber: Box<dyn Subscriber + Send + Sync> = match config.log_format() {
        LogFormat::Json => Box::new(to_stderr(filter).json().flatten_event(true).finish()),
        LogFormat::Compact => Box::new(to_stderr(filter).compact().finish()),
    };

    tracing::subscriber::set_global_default(subscriber).map_err(TelemetryError::Subscriber)
}
