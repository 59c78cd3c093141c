//! Error types for the shell runtime.

use std::io;
use std::sync::Arc;

use opshell_core::DispatchError;
use opshell_node::NodeError;
use thiserror::Error;

use crate::telemetry::TelemetryError;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("failed to load configuration: {0}")]
    LoadConfiguration(Arc<ortho_config::OrthoError>),
    #[error("failed to initialise telemetry: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
    #[error("'{command}' takes no arguments")]
    UnexpectedArguments { command: &'static str },
    #[error("'{command}' failed: {source}")]
    Lifecycle {
        command: &'static str,
        #[source]
        source: NodeError,
    },
    #[error("failed to read command line: {0}")]
    ReadInput(#[source] io::Error),
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] io::Error),
}

impl AppError {
    /// Process exit status reported for this error.
    pub(crate) fn exit_status(&self) -> u8 {
        match self {
            Self::Dispatch(error) => u8::try_from(error.exit_status()).unwrap_or(1),
            _ => 1,
        }
    }
}
