//! CLI entrypoint for the node operations shell.
//!
//! The binary delegates to [`opshell_cli::run`], which loads configuration,
//! parses the shell command, and executes it against the in-process node.

use std::io::{self, IsTerminal, StderrLock, StdinLock, StdoutLock};
use std::process::ExitCode;

fn main() -> ExitCode {
    let stdout_is_terminal = io::stdout().is_terminal();
    let stdin: StdinLock<'static> = io::stdin().lock();
    let mut stdout: StdoutLock<'_> = io::stdout().lock();
    let mut stderr: StderrLock<'_> = io::stderr().lock();
    opshell_cli::run(
        std::env::args_os(),
        stdin,
        &mut stdout,
        &mut stderr,
        stdout_is_terminal,
    )
}
