//! Error types for command resolution and dispatch.
//!
//! Failures fall into three groups: resolution (the command line does not
//! name a callable operation), invocation (the target raised an error), and
//! output (the sink rejected a row or value). All of them propagate to the
//! shell layer; nothing is retried here.

use std::error::Error as StdError;
use std::io;

use thiserror::Error;

use crate::coercion::CoercionError;

/// Failure raised by an operation while executing on its target.
///
/// Errors marked client relevant describe a problem the operator can act on
/// (an unknown flow id, a node in draining mode). Everything else is internal
/// and may be masked before reaching the operator.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct InvocationError {
    message: String,
    client_relevant: bool,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl InvocationError {
    /// Creates an error the operator can act on.
    pub fn client(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            client_relevant: true,
            source: None,
        }
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            client_relevant: false,
            source: None,
        }
    }

    /// Attaches the underlying cause.
    #[must_use]
    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Returns the message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns true when the error is meant for the operator.
    #[must_use]
    pub const fn is_client_relevant(&self) -> bool {
        self.client_relevant
    }
}

/// Errors surfaced at the dispatcher boundary.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The token sequence held no operation name.
    #[error("no operation name was given")]
    EmptyCommand,

    /// No operation is registered under the given name.
    #[error("unknown operation '{operation}'{hint}")]
    UnknownOperation {
        /// Name the operator typed.
        operation: String,
        /// Registered names that start with the typed name.
        suggestions: Vec<String>,
        /// Rendered suggestion suffix, empty when there are none.
        hint: String,
    },

    /// The operation exists but no overload takes the supplied arity.
    #[error("'{operation}' does not take {supplied} argument(s); expected {expected}")]
    ArityMismatch {
        /// Operation name.
        operation: String,
        /// Number of argument tokens supplied.
        supplied: usize,
        /// Rendered signatures of the available overloads.
        expected: String,
    },

    /// An argument token could not be coerced into its parameter type.
    #[error("invalid value for parameter '{parameter}' of '{operation}': {source}")]
    InvalidArgument {
        /// Operation name.
        operation: String,
        /// Parameter whose value was rejected.
        parameter: String,
        /// Coercion failure.
        #[source]
        source: CoercionError,
    },

    /// The operation ran and failed on the target.
    #[error("'{operation}' failed: {source}")]
    Invocation {
        /// Operation name.
        operation: String,
        /// Error raised by the target.
        #[source]
        source: InvocationError,
    },

    /// The sink rejected a help row; the listing was abandoned.
    #[error("failed to emit help row for '{command}': {source}")]
    HelpRendering {
        /// Command column of the rejected row.
        command: String,
        /// Sink failure.
        #[source]
        source: io::Error,
    },

    /// The sink rejected the result of an invocation.
    #[error("failed to emit command result: {0}")]
    Output(#[source] io::Error),
}

impl DispatchError {
    /// Returns the exit status for this error.
    ///
    /// Resolution and invocation failures return status 1. Output failures
    /// return status 2.
    #[must_use]
    pub const fn exit_status(&self) -> i32 {
        match self {
            Self::EmptyCommand
            | Self::UnknownOperation { .. }
            | Self::ArityMismatch { .. }
            | Self::InvalidArgument { .. }
            | Self::Invocation { .. } => 1,
            Self::HelpRendering { .. } | Self::Output(_) => 2,
        }
    }

    /// Returns true when the command line did not resolve to an operation.
    #[must_use]
    pub const fn is_resolution_failure(&self) -> bool {
        matches!(
            self,
            Self::EmptyCommand
                | Self::UnknownOperation { .. }
                | Self::ArityMismatch { .. }
                | Self::InvalidArgument { .. }
        )
    }

    /// Creates an unknown operation error with optional suggestions.
    pub fn unknown_operation(operation: impl Into<String>, suggestions: Vec<String>) -> Self {
        let hint = if suggestions.is_empty() {
            String::new()
        } else {
            format!("; did you mean {}?", suggestions.join(", "))
        };
        Self::UnknownOperation {
            operation: operation.into(),
            suggestions,
            hint,
        }
    }

    /// Creates an arity mismatch error listing the available overloads.
    pub fn arity_mismatch<I, S>(operation: impl Into<String>, supplied: usize, overloads: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        let expected = overloads
            .into_iter()
            .map(|overload| overload.to_string())
            .collect::<Vec<_>>()
            .join(" or ");
        Self::ArityMismatch {
            operation: operation.into(),
            supplied,
            expected,
        }
    }

    /// Creates an invalid argument error.
    pub fn invalid_argument(
        operation: impl Into<String>,
        parameter: impl Into<String>,
        source: CoercionError,
    ) -> Self {
        Self::InvalidArgument {
            operation: operation.into(),
            parameter: parameter.into(),
            source,
        }
    }

    /// Creates an invocation error.
    pub fn invocation(operation: impl Into<String>, source: InvocationError) -> Self {
        Self::Invocation {
            operation: operation.into(),
            source,
        }
    }

    /// Creates a help rendering error.
    pub fn help_rendering(command: impl Into<String>, source: io::Error) -> Self {
        Self::HelpRendering {
            command: command.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_operation_lists_suggestions() {
        let error = DispatchError::unknown_operation(
            "killflow",
            vec![String::from("killFlow"), String::from("killFlows")],
        );
        assert_eq!(
            error.to_string(),
            "unknown operation 'killflow'; did you mean killFlow, killFlows?"
        );
    }

    #[test]
    fn unknown_operation_without_suggestions_has_no_hint() {
        let error = DispatchError::unknown_operation("bogus", Vec::new());
        assert_eq!(error.to_string(), "unknown operation 'bogus'");
        assert!(error.is_resolution_failure());
    }

    #[test]
    fn arity_mismatch_joins_overloads() {
        let error = DispatchError::arity_mismatch("killFlow", 0, ["killFlow(id: String)"]);
        assert_eq!(
            error.to_string(),
            "'killFlow' does not take 0 argument(s); expected killFlow(id: String)"
        );
    }

    #[test]
    fn exit_status_separates_output_failures() {
        let invocation = DispatchError::invocation("nodeInfo", InvocationError::client("stopped"));
        assert_eq!(invocation.exit_status(), 1);
        assert!(!invocation.is_resolution_failure());

        let output = DispatchError::Output(io::Error::other("closed"));
        assert_eq!(output.exit_status(), 2);
    }

    #[test]
    fn invocation_error_keeps_source() {
        let error = InvocationError::internal("lock poisoned").with_source(io::Error::other("io"));
        assert!(StdError::source(&error).is_some());
        assert!(!error.is_client_relevant());
    }
}
