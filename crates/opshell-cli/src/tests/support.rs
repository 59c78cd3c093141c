//! Shared helpers for driving the shell runtime in tests.

use std::ffi::OsString;

use opshell_config::Config;

use crate::{AppError, ConfigLoader, IoStreams, run_with_loader};

/// Loader returning a fixed configuration, ignoring the file system and
/// environment.
pub(super) struct FixedLoader(pub(super) Config);

impl ConfigLoader for FixedLoader {
    fn load(&self, _args: &[OsString]) -> Result<Config, AppError> {
        Ok(self.0.clone())
    }
}

/// Captured result of one shell invocation.
#[derive(Debug, Default)]
pub(super) struct Transcript {
    pub(super) status: u8,
    pub(super) stdout: String,
    pub(super) stderr: String,
}

/// Runs the shell with `args` (program name excluded) and `stdin`.
pub(super) fn invoke(args: &[&str], stdin: &str, terminal: bool) -> Transcript {
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let arguments = std::iter::once("opshell")
        .chain(args.iter().copied())
        .map(OsString::from);
    let status = {
        let mut io = IoStreams::new(stdin.as_bytes(), &mut stdout, &mut stderr, terminal);
        run_with_loader(arguments, &mut io, &FixedLoader(Config::default()))
    };
    Transcript {
        status,
        stdout: String::from_utf8(stdout).expect("stdout is UTF-8"),
        stderr: String::from_utf8(stderr).expect("stderr is UTF-8"),
    }
}
