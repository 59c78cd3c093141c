//! CLI argument definitions for the operations shell.

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;

/// Command-line interface for the node operations shell.
#[derive(Parser, Debug)]
#[command(name = "opshell", disable_help_subcommand = true)]
pub(crate) struct Cli {
    /// Controls how help listings and results are rendered.
    #[arg(long, value_enum, default_value_t = OutputFormat::Auto)]
    pub(crate) output: OutputFormat,
    /// The shell command to execute.
    #[command(subcommand)]
    pub(crate) command: CliCommand,
}

/// Shell commands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub(crate) enum CliCommand {
    /// Invokes one node operation, or lists them when no tokens are given.
    Run {
        /// Operation name followed by its arguments.
        #[arg(
            value_name = "TOKEN",
            num_args = 0..,
            trailing_var_arg = true,
            allow_hyphen_values = true
        )]
        tokens: Vec<String>,
    },
    /// Reads command lines from standard input until end of input or shutdown.
    Session,
}
