//! The `run` command: help on empty input, one invocation otherwise.
//!
//! The dispatcher owns the primary and extended operation tables of the node
//! it fronts. With no tokens it renders the help listing; with tokens it binds
//! its [`CallParser`] to the union of both tables and hands the command line
//! over. The denylist applies only to help, so hidden operations remain
//! invocable by name.

use serde_json::Value;
use tracing::{debug, info, info_span, warn};

use crate::coercion::JsonTypeCoercer;
use crate::descriptor::DisplayedRow;
use crate::errors::DispatchError;
use crate::listing::HelpPolicy;
use crate::parser::{CallParser, PositionalCallParser};
use crate::registry::OperationTable;
use crate::sink::OutputSink;

/// Tracing target for dispatch operations.
pub const DISPATCH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::dispatch");

/// Logged in place of the command line when `run` is given no tokens.
pub const NO_ARGUMENTS: &str = "<no arguments>";

/// What a completed dispatch did.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// The help listing was emitted.
    Help {
        /// Number of rows emitted.
        rows: usize,
    },
    /// One operation was invoked.
    Invoked {
        /// Operation name as typed.
        operation: String,
        /// Value returned by the target.
        value: Value,
    },
}

/// Entry point turning a token sequence into help output or one invocation.
#[derive(Debug, Clone)]
pub struct Dispatcher<T: ?Sized, P = PositionalCallParser<JsonTypeCoercer>> {
    primary: OperationTable<T>,
    extended: OperationTable<T>,
    policy: HelpPolicy,
    parser: P,
}

impl<T: ?Sized> Dispatcher<T> {
    /// Creates a dispatcher with the positional parser and the default help
    /// policy.
    #[must_use]
    pub fn new(primary: OperationTable<T>, extended: OperationTable<T>) -> Self {
        Self::with_parser(
            primary,
            extended,
            PositionalCallParser::new(JsonTypeCoercer),
        )
    }
}

impl<T: ?Sized, P: CallParser<T>> Dispatcher<T, P> {
    /// Creates a dispatcher with a custom call parser.
    #[must_use]
    pub fn with_parser(primary: OperationTable<T>, extended: OperationTable<T>, parser: P) -> Self {
        Self {
            primary,
            extended,
            policy: HelpPolicy::default(),
            parser,
        }
    }

    /// Replaces the help policy.
    #[must_use]
    pub fn with_policy(mut self, policy: HelpPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Returns the help policy.
    #[must_use]
    pub const fn policy(&self) -> &HelpPolicy {
        &self.policy
    }

    /// Returns the primary operation table.
    #[must_use]
    pub const fn primary(&self) -> &OperationTable<T> {
        &self.primary
    }

    /// Returns the extended operation table.
    #[must_use]
    pub const fn extended(&self) -> &OperationTable<T> {
        &self.extended
    }

    /// Builds the filtered, augmented help listing.
    #[must_use]
    pub fn help_listing(&self) -> Vec<DisplayedRow> {
        let primary = self.primary.catalog();
        let extended = self.extended.catalog();
        self.policy.listing([&primary, &extended])
    }

    /// Handles one `run` command line.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::HelpRendering`] when the sink rejects a help
    /// row (the remaining rows are not emitted), any resolution or invocation
    /// error raised by the parser, or [`DispatchError::Output`] when the sink
    /// rejects the result.
    pub fn dispatch<S>(
        &self,
        tokens: &[String],
        target: &T,
        sink: &mut S,
    ) -> Result<DispatchOutcome, DispatchError>
    where
        S: OutputSink + ?Sized,
    {
        let command = if tokens.is_empty() {
            NO_ARGUMENTS.to_owned()
        } else {
            tokens.join(" ")
        };
        info!(target: DISPATCH_TARGET, command = %command, "executing command \"run\"");

        let Some((operation, _)) = tokens.split_first() else {
            return self.emit_help(sink);
        };

        let span = info_span!(target: DISPATCH_TARGET, "executing", operation = %operation);
        let _entered = span.enter();

        let union = self.primary.union(&self.extended);
        let value = self
            .parser
            .resolve_and_invoke(&union, tokens, target)
            .inspect_err(|error| {
                warn!(target: DISPATCH_TARGET, %error, "command failed");
            })?;
        sink.emit_value(&value).map_err(DispatchError::Output)?;
        Ok(DispatchOutcome::Invoked {
            operation: operation.clone(),
            value,
        })
    }

    fn emit_help<S>(&self, sink: &mut S) -> Result<DispatchOutcome, DispatchError>
    where
        S: OutputSink + ?Sized,
    {
        let rows = self.help_listing();
        for row in &rows {
            sink.emit_row(row)
                .map_err(|source| DispatchError::help_rendering(row.command(), source))?;
        }
        debug!(target: DISPATCH_TARGET, rows = rows.len(), "help listing emitted");
        Ok(DispatchOutcome::Help { rows: rows.len() })
    }
}
