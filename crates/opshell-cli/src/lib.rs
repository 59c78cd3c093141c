//! Command-line runtime for the node operations shell.
//!
//! The module owns argument parsing, configuration bootstrapping, telemetry
//! and rendering. It fronts an in-process node, executing one command line
//! per `run` or a stream of them per `session`. IO streams and the
//! configuration loader can be substituted so the runtime is exercised from
//! tests as well as from the binary.

use std::ffi::OsString;
use std::io::{BufRead, Write};
use std::process::ExitCode;

use clap::Parser;
use opshell_config::Config;
use opshell_node::{LocalNode, node_dispatcher};
use tracing::debug;

mod cli;
mod config;
mod errors;
pub mod output;
mod shell;
mod telemetry;

#[cfg(test)]
mod tests;

use cli::{Cli, CliCommand};
pub(crate) use config::{ConfigLoader, OrthoConfigLoader};
use config::split_config_arguments;
pub(crate) use errors::AppError;
pub use output::{OutputFormat, ResolvedOutputFormat};
use output::TerminalSink;
use shell::{SHELL_TARGET, Shell};

const SUCCESS: u8 = 0;
const FAILURE: u8 = 1;

/// Flows the in-process node accepts through `startFlowDynamic`.
pub const STANDARD_FLOWS: &[&str] = &["CashIssueFlow", "CashPaymentFlow", "CashExitFlow"];

/// Bundles the IO streams provided to the shell runtime.
pub(crate) struct IoStreams<'a, R: BufRead, W: Write, E: Write> {
    pub(crate) stdin: R,
    pub(crate) stdout: &'a mut W,
    pub(crate) stderr: &'a mut E,
    stdout_is_terminal: bool,
}

impl<'a, R: BufRead, W: Write, E: Write> IoStreams<'a, R, W, E> {
    pub(crate) const fn new(
        stdin: R,
        stdout: &'a mut W,
        stderr: &'a mut E,
        stdout_is_terminal: bool,
    ) -> Self {
        Self {
            stdin,
            stdout,
            stderr,
            stdout_is_terminal,
        }
    }
}

/// Runs the shell using the provided arguments and IO handles.
#[must_use]
pub fn run<I, R, W, E>(
    args: I,
    stdin: R,
    stdout: &mut W,
    stderr: &mut E,
    stdout_is_terminal: bool,
) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    R: BufRead,
    W: Write,
    E: Write,
{
    let mut io = IoStreams::new(stdin, stdout, stderr, stdout_is_terminal);
    ExitCode::from(run_with_loader(args, &mut io, &OrthoConfigLoader))
}

/// Runs the shell with a custom configuration loader, returning the exit
/// status.
pub(crate) fn run_with_loader<I, R, W, E, L>(
    args: I,
    io: &mut IoStreams<'_, R, W, E>,
    loader: &L,
) -> u8
where
    I: IntoIterator<Item = OsString>,
    R: BufRead,
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    let arguments: Vec<OsString> = args.into_iter().collect();
    let split = split_config_arguments(&arguments);
    let cli = match Cli::try_parse_from(&split.command_arguments) {
        Ok(cli) => cli,
        Err(error) => return report_usage(&error, io),
    };

    match loader
        .load(&split.config_arguments)
        .and_then(|config| execute(cli, &config, io))
    {
        Ok(status) => status,
        Err(error) => {
            writeln!(io.stderr, "error: {error}").ok();
            error.exit_status()
        }
    }
}

fn report_usage<R, W, E>(error: &clap::Error, io: &mut IoStreams<'_, R, W, E>) -> u8
where
    R: BufRead,
    W: Write,
    E: Write,
{
    let rendered = error.render();
    let written = if error.use_stderr() {
        write!(io.stderr, "{rendered}")
    } else {
        write!(io.stdout, "{rendered}")
    };
    if written.is_err() {
        return FAILURE;
    }
    u8::try_from(error.exit_code()).unwrap_or(FAILURE)
}

fn build_node(config: &Config) -> LocalNode {
    STANDARD_FLOWS
        .iter()
        .fold(LocalNode::new(config.node_name()), |node, flow| {
            node.with_flow(*flow)
        })
}

fn execute<R, W, E>(
    cli: Cli,
    config: &Config,
    io: &mut IoStreams<'_, R, W, E>,
) -> Result<u8, AppError>
where
    R: BufRead,
    W: Write,
    E: Write,
{
    telemetry::initialise(config)?;

    let node = build_node(config);
    let dispatcher = node_dispatcher::<LocalNode>();
    let format = cli.output.resolve(io.stdout_is_terminal);
    debug!(
        target: SHELL_TARGET,
        node = config.node_name(),
        ?format,
        "shell ready"
    );

    let shell = Shell::new(&dispatcher, &node);
    let mut sink = TerminalSink::new(&mut *io.stdout, format, &dispatcher.help_listing());
    match cli.command {
        CliCommand::Run { tokens } => {
            shell.execute(&tokens, &mut sink)?;
            Ok(SUCCESS)
        }
        CliCommand::Session => {
            let failures = shell.run_session(&mut io.stdin, &mut sink, &mut *io.stderr)?;
            Ok(if failures == 0 { SUCCESS } else { FAILURE })
        }
    }
}
