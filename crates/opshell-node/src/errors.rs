//! Failures raised by node operations.

use opshell_core::InvocationError;
use thiserror::Error;

/// Errors raised while a node executes an operation.
#[derive(Debug, Error)]
pub enum NodeError {
    /// No flow is registered under the requested name.
    #[error("flow '{name}' is not registered")]
    UnknownFlow {
        /// Name the operator asked for.
        name: String,
    },

    /// Draining mode refuses new flows.
    #[error("flows draining mode is enabled; '{name}' was not started")]
    Draining {
        /// Name of the refused flow.
        name: String,
    },

    /// The node has been stopped.
    #[error("node is shut down")]
    ShutDown,

    /// Shared state was poisoned by a panicking writer.
    #[error("node state is unavailable")]
    StateUnavailable,

    /// The node clock could not be rendered.
    #[error("failed to format node time")]
    Clock(#[from] time::error::Format),
}

impl NodeError {
    /// Returns true when the operator can act on the failure.
    #[must_use]
    pub const fn is_client_relevant(&self) -> bool {
        matches!(
            self,
            Self::UnknownFlow { .. } | Self::Draining { .. } | Self::ShutDown
        )
    }
}

impl From<NodeError> for InvocationError {
    fn from(error: NodeError) -> Self {
        let message = error.to_string();
        if error.is_client_relevant() {
            Self::client(message)
        } else {
            Self::internal(message).with_source(error)
        }
    }
}
