//! Command execution for `run` and `session`.
//!
//! `shutdown` and `gracefulShutdown` are answered by the shell itself through
//! the node's lifecycle capability. Every other command line goes to the
//! dispatcher.

use std::io::{self, BufRead, Write};

use opshell_core::{Dispatcher, OutputSink, StaticEntry};
use opshell_node::{NodeError, NodeLifecycle, ShutdownReport};
use tracing::{info, warn};

use crate::AppError;
use crate::output::TerminalSink;

/// Tracing target for shell-native actions and sessions.
pub(crate) const SHELL_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::shell");

/// Commands handled by the shell instead of the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ShellAction {
    Shutdown,
    GracefulShutdown,
}

impl ShellAction {
    pub(crate) fn from_command(command: &str) -> Option<Self> {
        [Self::Shutdown, Self::GracefulShutdown]
            .into_iter()
            .find(|action| action.entry().command() == command)
    }

    pub(crate) const fn entry(self) -> StaticEntry {
        match self {
            Self::Shutdown => StaticEntry::SHUTDOWN,
            Self::GracefulShutdown => StaticEntry::GRACEFUL_SHUTDOWN,
        }
    }

    fn perform<N: NodeLifecycle + ?Sized>(self, node: &N) -> Result<ShutdownReport, NodeError> {
        match self {
            Self::Shutdown => node.shutdown(),
            Self::GracefulShutdown => node.graceful_shutdown(),
        }
    }
}

/// Whether the shell keeps accepting commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    Continue,
    Stop,
}

pub(crate) struct Shell<'a, N: ?Sized> {
    dispatcher: &'a Dispatcher<N>,
    node: &'a N,
}

impl<'a, N: NodeLifecycle + ?Sized> Shell<'a, N> {
    pub(crate) const fn new(dispatcher: &'a Dispatcher<N>, node: &'a N) -> Self {
        Self { dispatcher, node }
    }

    /// Executes one command line.
    pub(crate) fn execute<S>(&self, tokens: &[String], sink: &mut S) -> Result<Step, AppError>
    where
        S: OutputSink + ?Sized,
    {
        let action = tokens
            .first()
            .map(String::as_str)
            .and_then(ShellAction::from_command);
        let Some(action) = action else {
            self.dispatcher.dispatch(tokens, self.node, sink)?;
            return Ok(Step::Continue);
        };

        let command = action.entry().command();
        if tokens.len() > 1 {
            return Err(AppError::UnexpectedArguments { command });
        }
        let report = action
            .perform(self.node)
            .map_err(|source| AppError::Lifecycle { command, source })?;
        info!(target: SHELL_TARGET, command, ?report, "shell action completed");

        let value = serde_json::to_value(report)
            .map_err(|error| AppError::WriteOutput(io::Error::from(error)))?;
        sink.emit_value(&value).map_err(AppError::WriteOutput)?;
        Ok(Step::Stop)
    }

    /// Reads command lines until end of input or a shutdown action.
    ///
    /// Failed commands are reported on `stderr` and the session continues.
    /// Returns the number of failed commands.
    pub(crate) fn run_session<R, W, E>(
        &self,
        input: R,
        sink: &mut TerminalSink<W>,
        stderr: &mut E,
    ) -> Result<usize, AppError>
    where
        R: BufRead,
        W: Write,
        E: Write,
    {
        let mut failures = 0_usize;
        for line in input.lines() {
            let text = line.map_err(AppError::ReadInput)?;
            let tokens: Vec<String> = text.split_whitespace().map(str::to_owned).collect();
            if tokens.is_empty() {
                continue;
            }

            sink.reset();
            match self.execute(&tokens, sink) {
                Ok(Step::Continue) => {}
                Ok(Step::Stop) => break,
                Err(error) => {
                    failures += 1;
                    warn!(target: SHELL_TARGET, %error, "session command failed");
                    writeln!(stderr, "error: {error}").map_err(AppError::WriteOutput)?;
                }
            }
        }
        info!(target: SHELL_TARGET, failures, "session ended");
        Ok(failures)
    }
}
